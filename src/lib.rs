pub mod domain;
pub mod errors;
pub mod models;
pub mod parsers;
pub mod processing;
pub mod repository;

/// Default cosine-similarity threshold for exemption matching.
pub const SIMILARITY_THRESHOLD: f32 = 0.8;

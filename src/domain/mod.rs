pub mod course;
pub mod transcript;

//! Parsers turning uploaded student documents into typed records.

pub mod transcript;

use thiserror::Error;

use crate::domain::course::CourseRecord;

pub mod catalog;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Source of the internal course catalog.
pub trait CatalogReader {
    /// List every internal course in catalog order.
    fn list_courses(&self) -> RepositoryResult<Vec<CourseRecord>>;
}

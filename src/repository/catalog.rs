use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::course::CourseRecord;
use crate::repository::{CatalogReader, RepositoryResult};

/// Catalog entry as stored on disk.
#[derive(Deserialize)]
struct StoredCourse {
    code: String,
    #[serde(default)]
    content: Option<String>,
}

impl From<StoredCourse> for CourseRecord {
    fn from(course: StoredCourse) -> Self {
        CourseRecord {
            code: course.code,
            text: course.content.unwrap_or_default(),
        }
    }
}

/// Internal catalog kept in a JSON array of `{ "code", "content" }` objects.
///
/// A code listed more than once keeps its first position and its last content.
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogReader for JsonCatalogRepository {
    fn list_courses(&self) -> RepositoryResult<Vec<CourseRecord>> {
        let raw = fs::read_to_string(&self.path)?;
        let courses: Vec<StoredCourse> = serde_json::from_str(&raw)?;

        let mut positions: HashMap<String, usize> = HashMap::with_capacity(courses.len());
        let mut records: Vec<CourseRecord> = Vec::with_capacity(courses.len());
        for course in courses {
            let record = CourseRecord::from(course);
            match positions.get(&record.code) {
                Some(&index) => {
                    log::warn!("Catalog lists course {} more than once", record.code);
                    records[index].text = record.text;
                }
                None => {
                    positions.insert(record.code.clone(), records.len());
                    records.push(record);
                }
            }
        }

        Ok(records)
    }
}

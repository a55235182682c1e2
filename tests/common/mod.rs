//! Helpers for integration tests.

use std::io::Write;

use course_matcher::processing::embedding::Embedder;
use tempfile::NamedTempFile;

/// Deterministic embedder counting letters `a`..=`z` in each text.
///
/// Identical texts produce identical vectors, and a text without any ASCII
/// letters produces the zero vector.
pub struct LetterCountEmbedder;

impl Embedder for LetterCountEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, String> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut counts = vec![0.0_f32; 26];
                for byte in text.to_ascii_lowercase().bytes() {
                    if byte.is_ascii_lowercase() {
                        counts[usize::from(byte - b'a')] += 1.0;
                    }
                }
                counts
            })
            .collect())
    }
}

/// Temporary catalog JSON file removed on drop.
pub struct TestCatalog {
    file: NamedTempFile,
}

impl TestCatalog {
    pub fn new(json: &str) -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create catalog file.");
        file.write_all(json.as_bytes())
            .expect("Failed to write catalog file.");
        TestCatalog { file }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

pub const CATALOG_JSON: &str = r#"[
    {"code": "BIL101", "content": "Programming fundamentals"},
    {"code": "BIL102", "content": "Data structures"},
    {"code": "MAT101", "content": "Calculus"}
]"#;

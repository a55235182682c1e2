use serde::{Deserialize, Serialize};

/// A course identified by its institution code together with its syllabus text.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CourseRecord {
    pub code: String,
    pub text: String,
}

impl CourseRecord {
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }
}

/// An external course submitted for matching.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExternalCourse {
    pub ext_code: String,
    pub ext_content: String,
}

impl From<ExternalCourse> for CourseRecord {
    fn from(course: ExternalCourse) -> Self {
        CourseRecord {
            code: course.ext_code,
            text: course.ext_content,
        }
    }
}

/// Similarity of one external course to one internal course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub int_code: String,
    pub percent: f64,
    pub exempt: bool,
}

/// Ranked candidates for one external course, best match first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseMatch {
    pub ext_code: String,
    pub candidates: Vec<MatchCandidate>,
}

/// Result of scoring one ad-hoc pair of texts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairSimilarity {
    pub score: f32,
    pub percent: f64,
    pub exceeds_threshold: bool,
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum CourseStatus {
    /// Marked `Z` on the transcript.
    #[serde(rename = "Z")]
    Compulsory,
    /// Marked `S` on the transcript.
    #[serde(rename = "S")]
    Elective,
}

/// One course row read from a student transcript.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TranscriptCourse {
    pub code: String,
    pub name: String,
    pub status: CourseStatus,
    pub language: Option<String>,
    pub theory: Option<f64>,
    pub practice: Option<f64>,
    pub national_credit: Option<f64>,
    pub ects: Option<f64>,
    pub points: Option<f64>,
    pub grade: Option<String>,
    pub comments: Vec<String>,
}

use serde::{Deserialize, Serialize};

use crate::domain::course::{CourseMatch, ExternalCourse, PairSimilarity};
use crate::domain::transcript::TranscriptCourse;

pub mod embedding;
pub mod matching;
pub mod similarity;

/// Requests accepted on the service socket.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub enum ZMQMessage {
    AutoMatch(AutoMatchRequest),
    BulkSimilarity(BulkSimilarityRequest),
    ParseTranscript(String),
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct AutoMatchRequest {
    pub items: Vec<ExternalCourse>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct BulkSimilarityRequest {
    pub pairs: Vec<(String, String)>,
}

/// Replies sent back for each [`ZMQMessage`].
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub enum ZMQReply {
    AutoMatch { results: Vec<CourseMatch> },
    BulkSimilarity { results: Vec<PairSimilarity> },
    Transcript { courses: Vec<TranscriptCourse> },
    Error { message: String },
}

use std::sync::Arc;
use std::time::Instant;

use crate::domain::course::CourseRecord;
use crate::errors::{MatchError, MatchResult};
use crate::parsers::transcript::parse_transcript;
use crate::processing::embedding::Embedder;
use crate::processing::similarity::SimilarityEngine;
use crate::processing::{AutoMatchRequest, BulkSimilarityRequest, ZMQMessage, ZMQReply};

/// Dispatch one request to its handler and build the reply.
pub async fn process_message<E>(msg: ZMQMessage, engine: Arc<SimilarityEngine<E>>) -> ZMQReply
where
    E: Embedder + 'static,
{
    match msg {
        ZMQMessage::AutoMatch(request) => process_auto_match_message(request, engine).await,
        ZMQMessage::BulkSimilarity(request) => {
            process_bulk_similarity_message(request, engine).await
        }
        ZMQMessage::ParseTranscript(text) => process_transcript_message(&text),
    }
}

/// Answer one request arriving on a REP socket.
///
/// Receive failures are logged and leave the socket ready for the next
/// request. A send failure is returned: the REP socket cannot receive again
/// until a reply has gone out.
pub async fn serve_request<E>(
    responder: &zmq::Socket,
    engine: &Arc<SimilarityEngine<E>>,
) -> Result<(), zmq::Error>
where
    E: Embedder + 'static,
{
    let msg = match responder.recv_bytes(0) {
        Ok(msg) => msg,
        Err(e) => {
            log::error!("Failed to receive message: {e}");
            return Ok(());
        }
    };

    let reply = process_raw_message(&msg, Arc::clone(engine)).await;

    let payload = match serde_json::to_vec(&reply) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to serialize reply: {e}");
            br#"{"Error":{"message":"failed to serialize reply"}}"#.to_vec()
        }
    };
    responder.send(payload, 0)
}

/// Decode a JSON request and process it; undecodable input gets an error reply.
pub async fn process_raw_message<E>(msg: &[u8], engine: Arc<SimilarityEngine<E>>) -> ZMQReply
where
    E: Embedder + 'static,
{
    match serde_json::from_slice::<ZMQMessage>(msg) {
        Ok(parsed) => process_message(parsed, engine).await,
        Err(e) => {
            log::error!("Failed to parse JSON: {e}");
            ZMQReply::Error {
                message: format!("invalid request: {e}"),
            }
        }
    }
}

/// Match every external course of the request against the internal catalog.
pub async fn process_auto_match_message<E>(
    request: AutoMatchRequest,
    engine: Arc<SimilarityEngine<E>>,
) -> ZMQReply
where
    E: Embedder + 'static,
{
    let start = Instant::now();
    let externals: Vec<CourseRecord> = request.items.into_iter().map(CourseRecord::from).collect();
    let size = externals.len();
    log::info!("Received auto-match for {size} courses");

    match run_blocking(move || engine.match_courses(&externals)).await {
        Ok(results) => {
            log::info!(
                "auto-match size={size} finished in {:.1} ms",
                start.elapsed().as_secs_f64() * 1000.0
            );
            ZMQReply::AutoMatch { results }
        }
        Err(error) => {
            log::error!("auto-match size={size} failed: {error}");
            ZMQReply::Error {
                message: error.to_string(),
            }
        }
    }
}

pub async fn process_bulk_similarity_message<E>(
    request: BulkSimilarityRequest,
    engine: Arc<SimilarityEngine<E>>,
) -> ZMQReply
where
    E: Embedder + 'static,
{
    let start = Instant::now();
    let size = request.pairs.len();
    log::info!("Received bulk similarity for {size} pairs");

    match run_blocking(move || engine.bulk_similarity(&request.pairs)).await {
        Ok(results) => {
            log::info!(
                "bulk-similarity size={size} finished in {:.1} ms",
                start.elapsed().as_secs_f64() * 1000.0
            );
            ZMQReply::BulkSimilarity { results }
        }
        Err(error) => {
            log::error!("bulk-similarity size={size} failed: {error}");
            ZMQReply::Error {
                message: error.to_string(),
            }
        }
    }
}

pub fn process_transcript_message(text: &str) -> ZMQReply {
    let courses = parse_transcript(text);
    if courses.is_empty() {
        log::warn!("No courses found in transcript of {} bytes", text.len());
    } else {
        log::info!("Parsed {} courses from transcript", courses.len());
    }
    ZMQReply::Transcript { courses }
}

/// Run an engine call on the blocking pool so encoding does not stall the runtime.
async fn run_blocking<F, T>(job: F) -> MatchResult<T>
where
    F: FnOnce() -> MatchResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|error| MatchError::Embedding(format!("matching task failed: {error}")))?
}

#[cfg(test)]
mod tests {
    use super::{process_transcript_message, run_blocking};
    use crate::errors::MatchError;
    use crate::processing::ZMQReply;

    #[test]
    fn transcript_reply_lists_parsed_courses() {
        let reply = process_transcript_message("BIL101 Programlamaya Giriş Z Tr 3 0 3 5 12 AA");

        match reply {
            ZMQReply::Transcript { courses } => {
                assert_eq!(courses.len(), 1);
                assert_eq!(courses[0].code, "BIL101");
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocking_job_result_is_returned() {
        let result = run_blocking(|| Ok(42)).await;

        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn panicking_job_becomes_an_embedding_error() {
        let result: Result<(), MatchError> = run_blocking(|| panic!("encoder crashed")).await;

        assert!(matches!(result, Err(MatchError::Embedding(_))));
    }
}

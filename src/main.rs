use std::sync::Arc;

use course_matcher::errors::{MatchError, MatchResult};
use course_matcher::models::config::ServerConfig;
use course_matcher::processing::embedding::FastEmbedder;
use course_matcher::processing::matching::serve_request;
use course_matcher::processing::similarity::SimilarityEngine;
use course_matcher::repository::CatalogReader;
use course_matcher::repository::catalog::JsonCatalogRepository;

/// Load the catalog and embed it; the engine is only handed out once ready.
fn build_engine(config: &ServerConfig) -> MatchResult<SimilarityEngine<FastEmbedder>> {
    let repo = JsonCatalogRepository::new(&config.catalog_path);
    let catalog = repo.list_courses().map_err(|e| {
        MatchError::Configuration(format!(
            "Failed to load catalog {}: {e}",
            config.catalog_path
        ))
    })?;
    log::info!("Internal course catalog loaded: {} courses", catalog.len());

    let embedder = FastEmbedder::try_new(&config.model_name, config.show_download_progress)
        .map_err(MatchError::Configuration)?;

    SimilarityEngine::new(embedder, config.default_threshold, catalog)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let engine_config = config.clone();
    let engine = match tokio::task::spawn_blocking(move || build_engine(&engine_config)).await {
        Ok(Ok(engine)) => Arc::new(engine),
        Ok(Err(e)) => {
            log::error!("Failed to build similarity engine: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("Similarity engine initialization panicked: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "Similarity engine ready: model={}, courses={}, dimension={}, threshold={}",
        engine.embedder().model_name(),
        engine.internal_codes().len(),
        engine.dimension(),
        engine.threshold()
    );

    let context = zmq::Context::new();
    let responder = match context.socket(zmq::REP) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("Cannot create zmq socket: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = responder.bind(&config.zmq_address) {
        log::error!("Cannot bind to {}: {e}", config.zmq_address);
        std::process::exit(1);
    }
    log::info!("Listening on {}", config.zmq_address);

    loop {
        if let Err(e) = serve_request(&responder, &engine).await {
            log::error!("Failed to send reply, shutting down: {e}");
            std::process::exit(1);
        }
    }
}

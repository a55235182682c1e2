//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::SIMILARITY_THRESHOLD;

#[derive(Clone, Debug, Deserialize)]
/// Settings for the matching service.
pub struct ServerConfig {
    /// JSON file holding the internal course catalog.
    pub catalog_path: String,
    /// Embedding model name, e.g. `all-MiniLM-L6-v2`.
    pub model_name: String,
    /// Minimum cosine similarity for an exemption, in `(0, 1]`.
    pub default_threshold: f32,
    pub zmq_address: String,
    pub show_download_progress: bool,
}

impl ServerConfig {
    /// Load `config.yaml` (if present) overlaid with environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Like [`ServerConfig::load`] but reads the optional file named `file`.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("catalog_path", "internal_courses.json")?
            .set_default("model_name", "all-MiniLM-L6-v2")?
            .set_default("default_threshold", f64::from(SIMILARITY_THRESHOLD))?
            .set_default("zmq_address", "tcp://127.0.0.1:5555")?
            .set_default("show_download_progress", false)?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::ServerConfig;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ServerConfig::load_from("does-not-exist/config").expect("config should load");

        assert!(!config.catalog_path.is_empty());
        assert!(config.default_threshold > 0.0 && config.default_threshold <= 1.0);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file should be created");
        writeln!(
            file,
            "catalog_path: data/courses.json\ndefault_threshold: 0.75\nzmq_address: tcp://0.0.0.0:6000"
        )
        .expect("config should be written");

        let path = file.path().to_str().expect("utf-8 temp path");
        let config = ServerConfig::load_from(path).expect("config should load");

        assert_eq!(config.catalog_path, "data/courses.json");
        assert_eq!(config.default_threshold, 0.75);
        assert_eq!(config.zmq_address, "tcp://0.0.0.0:6000");
    }
}

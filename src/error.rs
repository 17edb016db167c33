use thiserror::Error;

/// Errors produced by the scan pipeline.
///
/// `Runtime` and `Docker` are fatal to a scan; `Lookup` is the one per-package
/// error the orchestrator tolerates by skipping the affected package.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("vulnerability lookup failed for {package}: {reason}")]
    Lookup { package: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

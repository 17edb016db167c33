//! Container runtime capability.
//!
//! The scan pipeline never talks to a runtime client directly; everything it
//! needs from one is expressed by the [`ImageRuntime`] trait so tests can
//! substitute a fake and alternative backends can be dropped in without
//! touching the orchestrator. [`DockerRuntime`] is the Docker implementation.

mod docker;

pub use docker::DockerRuntime;

use crate::error::ScanError;
use async_trait::async_trait;

/// Metadata about a locally available image.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub id: String,
    pub created: String,
    pub size_bytes: i64,
}

impl ImageInfo {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Capability to acquire images and run one-shot commands against them.
#[async_trait]
pub trait ImageRuntime: Send + Sync {
    /// Pulls the image from its registry. Idempotent: pulling an image that is
    /// already present locally succeeds.
    async fn pull_image(&self, image: &str) -> Result<(), ScanError>;

    /// Returns metadata for a locally available image.
    async fn inspect_image(&self, image: &str) -> Result<ImageInfo, ScanError>;

    /// Runs a shell command in a disposable container created from the image
    /// and returns its combined output.
    ///
    /// The container is destroyed before this returns, on every exit path.
    async fn run_command(&self, image: &str, command: &str) -> Result<String, ScanError>;
}

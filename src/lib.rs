pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod model;
pub mod report;
pub mod runtime;
pub mod scanner;

pub use config::Config;
pub use db::{InMemoryDatabase, MatchPolicy, VulnerabilityDatabase};
pub use error::ScanError;
pub use model::{Finding, Package, ScanReport, Severity, Vulnerability};
pub use runtime::{DockerRuntime, ImageInfo, ImageRuntime};
pub use scanner::ImageScanner;

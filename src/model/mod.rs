//! Core data types for packages, vulnerabilities, and scan reports.
//!
//! This module contains the fundamental types used throughout imagescan:
//!
//! - [`Package`] - A package discovered inside an image
//! - [`Severity`] - Ordinal vulnerability severity
//! - [`Vulnerability`] - A known vulnerability record
//! - [`Finding`] - A scanned package with at least one matched vulnerability
//! - [`ScanReport`] - The complete result of one scan
//!
//! # Example
//!
//! ```
//! use imagescan::Package;
//!
//! let package = Package::parse("openssl 1.1.1");
//! assert_eq!(package.name, "openssl");
//! assert_eq!(package.version, "1.1.1");
//! ```

mod package;
mod report;
mod vulnerability;

pub use package::*;
pub use report::*;
pub use vulnerability::*;

//! Scan orchestration.
//!
//! Drives the single-pass pipeline: acquire image, extract the package
//! inventory, match each package against the corpus, finalize the report.
//! Any acquisition or extraction failure aborts the scan; a failed lookup for
//! one package is logged and skipped, which is the pipeline's only
//! partial-failure tolerance point. No retries anywhere; the caller re-runs
//! the whole pipeline to retry.

use tracing::{info, warn};

use crate::db::{MatchPolicy, VulnerabilityDatabase};
use crate::error::ScanError;
use crate::inventory::InventoryExtractor;
use crate::model::{Package, ScanReport};
use crate::report::ReportBuilder;
use crate::runtime::ImageRuntime;

pub struct ImageScanner {
    runtime: Box<dyn ImageRuntime>,
    database: Box<dyn VulnerabilityDatabase>,
    policy: MatchPolicy,
}

impl ImageScanner {
    pub fn new(runtime: Box<dyn ImageRuntime>, database: Box<dyn VulnerabilityDatabase>) -> Self {
        Self {
            runtime,
            database,
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs one complete scan of `image`.
    ///
    /// # Errors
    ///
    /// Returns an error on image pull, inspection, or inventory extraction
    /// failure. No partial report is produced on these paths.
    pub async fn scan(&self, image: &str) -> Result<ScanReport, ScanError> {
        let mut builder = ReportBuilder::new(image);

        info!(image, "pulling image");
        self.runtime.pull_image(image).await?;

        let details = self.runtime.inspect_image(image).await?;
        info!(
            id = %details.id,
            created = %details.created,
            size_mb = format!("{:.2}", details.size_mb()),
            "image details"
        );

        info!(image, "listing packages");
        let extractor = InventoryExtractor::new(self.runtime.as_ref());
        let raw_packages = extractor.extract(image).await?;
        info!(count = raw_packages.len(), "scanning packages for vulnerabilities");

        for line in &raw_packages {
            let pkg = Package::parse(line);
            match self.database.check_package(&pkg).await {
                Ok(vulns) => {
                    let vulns = self.policy.apply(&pkg, vulns);
                    builder.add_finding(&pkg, vulns);
                }
                Err(e) => {
                    warn!(package = %pkg.name, error = %e, "vulnerability lookup failed, skipping package");
                }
            }
        }

        builder.set_package_counts(raw_packages.len());
        Ok(builder.finish())
    }
}

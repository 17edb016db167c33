//! Report accumulation, summary rendering, and JSON persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tabled::{settings::Style, Table, Tabled};

use crate::error::ScanError;
use crate::model::{Finding, Package, ScanReport, Vulnerability};

/// Accumulates findings into a [`ScanReport`] during one scan.
///
/// The builder trusts its caller: the orchestrator guarantees findings arrive
/// in inventory order and that counts are set exactly once, at the end.
pub struct ReportBuilder {
    report: ScanReport,
}

impl ReportBuilder {
    /// Starts a report for `image`. The scan timestamp is taken now, so the
    /// persisted filename embeds the scan's start time.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            report: ScanReport::new(image),
        }
    }

    /// Appends a finding for `pkg`. Empty vulnerability lists are ignored: a
    /// package with no matches is not a finding.
    pub fn add_finding(&mut self, pkg: &Package, vulnerabilities: Vec<Vulnerability>) {
        if vulnerabilities.is_empty() {
            return;
        }
        self.report.findings.push(Finding {
            package_name: pkg.name.clone(),
            current_version: pkg.version.clone(),
            vulnerabilities,
        });
    }

    /// Finalizes the counts: `total` is the number of packages listed
    /// (duplicates included), the vulnerable count is derived from findings.
    pub fn set_package_counts(&mut self, total: usize) {
        self.report.total_packages = total;
        self.report.vulnerable_packages = self.report.findings.len();
    }

    pub fn finish(self) -> ScanReport {
        self.report
    }
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Vulnerability")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Fixed In")]
    fixed_in: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Renders the human-readable scan summary.
///
/// Findings are enumerated in report order, one row per vulnerability.
/// Rendering is read-only, so calling this twice yields identical text.
pub fn render_summary(report: &ScanReport) -> String {
    let mut summary = String::new();
    summary.push_str(&format!("\nScan summary for {}\n", report.image_name));
    summary.push_str(&format!(
        "Scan completed at: {}\n",
        report.scan_time.to_rfc3339()
    ));
    summary.push_str(&format!(
        "Total packages found: {}\n",
        report.total_packages
    ));
    summary.push_str(&format!(
        "Vulnerable packages found: {}\n\n",
        report.vulnerable_packages
    ));

    if report.findings.is_empty() {
        summary.push_str("No vulnerabilities found.\n");
        return summary;
    }

    let rows: Vec<FindingRow> = report
        .findings
        .iter()
        .flat_map(|finding| {
            finding.vulnerabilities.iter().map(|vuln| FindingRow {
                package: finding.package_name.clone(),
                version: format_version(&finding.current_version),
                id: vuln.id.clone(),
                severity: vuln.severity.to_string(),
                fixed_in: format_version(&vuln.fixed_in),
                description: truncate(&vuln.description, 60),
            })
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    summary.push_str("Vulnerable packages:\n");
    summary.push_str(&table);
    summary.push('\n');
    summary
}

fn format_version(version: &str) -> String {
    if version.is_empty() {
        "-".to_string()
    } else {
        version.to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

/// Default report filename, embedding the scan's start time.
pub fn default_report_path(report: &ScanReport) -> PathBuf {
    PathBuf::from(format!(
        "scan-report-{}.json",
        report.scan_time.format("%Y%m%d-%H%M%S")
    ))
}

/// Writes the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails; the caller
/// treats this as a warning, not a scan failure.
pub fn save_report(report: &ScanReport, path: &Path) -> Result<(), ScanError> {
    let json = serde_json::to_vec_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

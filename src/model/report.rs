use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Vulnerability;

/// A scanned package with at least one matched vulnerability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub package_name: String,
    pub current_version: String,
    pub vulnerabilities: Vec<Vulnerability>,
}

/// The accumulated result of one image scan.
///
/// Invariants, maintained by the orchestrator: `vulnerable_packages` equals
/// `findings.len()` and never exceeds `total_packages`. The report is treated
/// as sealed once it has been rendered or serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub image_name: String,
    pub scan_time: DateTime<Utc>,
    pub total_packages: usize,
    pub vulnerable_packages: usize,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            scan_time: Utc::now(),
            total_packages: 0,
            vulnerable_packages: 0,
            findings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::new("ubuntu:latest");
        report.findings.push(Finding {
            package_name: "openssl".to_string(),
            current_version: "1.1.1".to_string(),
            vulnerabilities: vec![Vulnerability {
                id: "CVE-2023-0001".to_string(),
                package: "openssl".to_string(),
                version: "1.1.1".to_string(),
                fixed_in: "1.1.2".to_string(),
                severity: Severity::High,
                description: "Sample OpenSSL vulnerability".to_string(),
                references: vec![],
            }],
        });
        report.total_packages = 3;
        report.vulnerable_packages = report.findings.len();
        report
    }

    #[test]
    fn test_json_field_names_are_consistent_camel_case() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert!(json.get("imageName").is_some());
        assert!(json.get("scanTime").is_some());
        assert!(json.get("totalPackages").is_some());
        assert!(json.get("vulnerablePackages").is_some());
        assert!(json.get("findings").is_some());

        let finding = &json["findings"][0];
        assert!(finding.get("packageName").is_some());
        assert!(finding.get("currentVersion").is_some());
        assert!(finding.get("vulnerabilities").is_some());
    }

    #[test]
    fn test_round_trip_preserves_identity_counts_and_order() {
        let mut report = sample_report();
        report.findings.push(Finding {
            package_name: "bash".to_string(),
            current_version: "5.2.21".to_string(),
            vulnerabilities: vec![],
        });
        report.vulnerable_packages = report.findings.len();

        let bytes = serde_json::to_vec(&report).unwrap();
        let parsed: ScanReport = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.image_name, report.image_name);
        assert_eq!(parsed.total_packages, report.total_packages);
        assert_eq!(parsed.findings.len(), report.findings.len());
        for (a, b) in parsed.findings.iter().zip(&report.findings) {
            assert_eq!(a, b);
        }
    }
}

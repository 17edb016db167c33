use serde::{Deserialize, Serialize};

/// Ordinal severity classification: `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A known vulnerability record, as sourced from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    /// Advisory identifier, e.g. a CVE id.
    pub id: String,
    /// Name of the affected package.
    pub package: String,
    /// Version the record was reported against.
    pub version: String,
    /// First version that carries the fix.
    pub fixed_in: String,
    pub severity: Severity,
    pub description: String,
    pub references: Vec<String>,
}

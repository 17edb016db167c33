use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use super::VulnerabilityDatabase;
use crate::error::ScanError;
use crate::model::{Package, Severity, Vulnerability};
use async_trait::async_trait;

/// In-memory vulnerability corpus keyed by package name.
///
/// Entries can be seeded programmatically or loaded from a JSON file holding
/// an array of vulnerability records. When a source file is set,
/// `update_database` reloads it wholesale.
pub struct InMemoryDatabase {
    entries: RwLock<HashMap<String, Vec<Vulnerability>>>,
    source: Option<PathBuf>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            source: None,
        }
    }

    /// Creates a database seeded with a handful of well-known entries.
    /// Useful for demos and tests; real scans should load a corpus file.
    pub fn with_sample_entries() -> Self {
        let db = Self::new();
        db.insert(Vulnerability {
            id: "CVE-2023-0001".to_string(),
            package: "openssl".to_string(),
            version: "1.1.1".to_string(),
            fixed_in: "1.1.2".to_string(),
            severity: Severity::High,
            description: "Sample OpenSSL vulnerability".to_string(),
            references: vec!["https://cve.mitre.org/cve-2023-0001".to_string()],
        });
        db.insert(Vulnerability {
            id: "CVE-2023-5678".to_string(),
            package: "apt".to_string(),
            version: "2.7.14".to_string(),
            fixed_in: "2.7.15".to_string(),
            severity: Severity::Medium,
            description: "Potential package verification bypass in apt".to_string(),
            references: vec!["https://cve.mitre.org/cve-2023-5678".to_string()],
        });
        db.insert(Vulnerability {
            id: "CVE-2023-9012".to_string(),
            package: "bash".to_string(),
            version: "5.2.21".to_string(),
            fixed_in: "5.2.22".to_string(),
            severity: Severity::Critical,
            description: "Command injection vulnerability in bash".to_string(),
            references: vec!["https://cve.mitre.org/cve-2023-9012".to_string()],
        });
        db
    }

    /// Loads a corpus from a JSON file containing an array of vulnerability
    /// records, grouped by affected package name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let entries = load_entries(path)?;
        debug!(path = %path.display(), packages = entries.len(), "loaded vulnerability corpus");
        Ok(Self {
            entries: RwLock::new(entries),
            source: Some(path.to_path_buf()),
        })
    }

    /// Adds one vulnerability record under its affected package name.
    pub fn insert(&self, vuln: Vulnerability) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(vuln.package.clone()).or_default().push(vuln);
    }

    /// Number of distinct package names with at least one entry.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn load_entries(path: &Path) -> Result<HashMap<String, Vec<Vulnerability>>, ScanError> {
    let content = fs::read_to_string(path)?;
    let vulns: Vec<Vulnerability> = serde_json::from_str(&content)?;

    let mut entries: HashMap<String, Vec<Vulnerability>> = HashMap::new();
    for vuln in vulns {
        entries.entry(vuln.package.clone()).or_default().push(vuln);
    }
    Ok(entries)
}

#[async_trait]
impl VulnerabilityDatabase for InMemoryDatabase {
    async fn check_package(&self, pkg: &Package) -> Result<Vec<Vulnerability>, ScanError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&pkg.name).cloned().unwrap_or_default())
    }

    async fn update_database(&self) -> Result<(), ScanError> {
        let Some(source) = &self.source else {
            // Nothing to refresh from; programmatically seeded corpora are
            // updated through `insert`.
            return Ok(());
        };
        let fresh = load_entries(source)?;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        *entries = fresh;
        Ok(())
    }
}

//! Vulnerability corpus capability and match policy.
//!
//! The corpus is a queryable mapping from package name to known
//! vulnerability records, behind the [`VulnerabilityDatabase`] trait so
//! alternative backends (file, network service) can be substituted without
//! touching the orchestrator. [`InMemoryDatabase`] is the bundled backend.

mod memory;

pub use memory::InMemoryDatabase;

use crate::error::ScanError;
use crate::model::{Package, Vulnerability};
use async_trait::async_trait;

/// Capability to look up known vulnerabilities by package.
#[async_trait]
pub trait VulnerabilityDatabase: Send + Sync {
    /// Returns every known vulnerability whose affected package name equals
    /// `pkg.name` (case-sensitive). No match is an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Fails only on underlying corpus I/O failure.
    async fn check_package(&self, pkg: &Package) -> Result<Vec<Vulnerability>, ScanError>;

    /// Refreshes the corpus. Completed refreshes are visible to subsequent
    /// lookups.
    async fn update_database(&self) -> Result<(), ScanError>;
}

/// How lookup results are narrowed before they become findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Report every known vulnerability for the package name, regardless of
    /// the installed version. This is the historical behavior and the
    /// default.
    #[default]
    NameOnly,
    /// Drop vulnerabilities whose fix version is at or below the installed
    /// version. Versions that cannot be compared are kept.
    VersionAware,
}

impl MatchPolicy {
    /// Applies the policy to a lookup result for `pkg`.
    pub fn apply(self, pkg: &Package, vulns: Vec<Vulnerability>) -> Vec<Vulnerability> {
        match self {
            MatchPolicy::NameOnly => vulns,
            MatchPolicy::VersionAware => vulns
                .into_iter()
                .filter(|v| !is_patched(&pkg.version, &v.fixed_in))
                .collect(),
        }
    }
}

/// Returns true when `current` is known to already include the fix shipped in
/// `fixed_in`. Indeterminate comparisons return false so the vulnerability is
/// still reported.
fn is_patched(current: &str, fixed_in: &str) -> bool {
    if current.is_empty() || fixed_in.is_empty() {
        return false;
    }

    let current = current.trim_start_matches('v');
    let fixed_in = fixed_in.trim_start_matches('v');

    if let (Ok(cur), Ok(fix)) = (
        semver::Version::parse(current),
        semver::Version::parse(fixed_in),
    ) {
        return cur >= fix;
    }

    compare_numeric_segments(current, fixed_in)
        .map(|ord| ord != std::cmp::Ordering::Less)
        .unwrap_or(false)
}

/// Lenient fallback for non-semver version strings: compares dotted segments
/// by their leading numeric prefix. Missing segments compare as zero; a
/// segment with no numeric prefix makes the comparison indeterminate.
fn compare_numeric_segments(a: &str, b: &str) -> Option<std::cmp::Ordering> {
    let parse = |s: &str| -> Option<Vec<u64>> {
        s.split('.')
            .map(|seg| {
                let digits: String = seg.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u64>().ok()
            })
            .collect()
    };

    let left = parse(a)?;
    let right = parse(b)?;

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        if l != r {
            return Some(l.cmp(&r));
        }
    }

    Some(std::cmp::Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn vuln(fixed_in: &str) -> Vulnerability {
        Vulnerability {
            id: "CVE-2023-0001".to_string(),
            package: "openssl".to_string(),
            version: "1.1.1".to_string(),
            fixed_in: fixed_in.to_string(),
            severity: Severity::High,
            description: "test".to_string(),
            references: vec![],
        }
    }

    #[test]
    fn test_is_patched_semver() {
        assert!(is_patched("1.1.2", "1.1.2"));
        assert!(is_patched("1.2.0", "1.1.2"));
        assert!(!is_patched("1.1.1", "1.1.2"));
    }

    #[test]
    fn test_is_patched_two_segment_versions() {
        assert!(is_patched("5.3", "5.2"));
        assert!(!is_patched("5.1", "5.2"));
    }

    #[test]
    fn test_is_patched_indeterminate_keeps_vulnerability() {
        assert!(!is_patched("", "1.1.2"));
        assert!(!is_patched("1.1.1", ""));
        assert!(!is_patched("abc", "def"));
    }

    #[test]
    fn test_name_only_policy_returns_everything() {
        let pkg = Package::new("openssl", "9.9.9");
        let kept = MatchPolicy::NameOnly.apply(&pkg, vec![vuln("1.1.2")]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_version_aware_policy_drops_patched() {
        let pkg = Package::new("openssl", "1.1.3");
        let kept = MatchPolicy::VersionAware.apply(&pkg, vec![vuln("1.1.2")]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_version_aware_policy_keeps_unpatched_and_unparseable() {
        let pkg = Package::new("openssl", "1.1.1");
        let kept = MatchPolicy::VersionAware.apply(&pkg, vec![vuln("1.1.2"), vuln("unknown")]);
        assert_eq!(kept.len(), 2);
    }
}

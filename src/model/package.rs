use serde::{Deserialize, Serialize};

/// An installed package discovered inside an image.
///
/// Identity for vulnerability matching is `name` alone; `version` is carried
/// for display and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parses one raw inventory line of the form `"<name> <version>"`.
    ///
    /// A line with no separable version token yields a package with an empty
    /// version rather than being dropped, so it still counts toward the
    /// package total.
    pub fn parse(line: &str) -> Self {
        match line.trim().split_once(' ') {
            Some((name, version)) => Self::new(name, version.trim()),
            None => Self::new(line.trim(), ""),
        }
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_version() {
        let pkg = Package::parse("openssl 1.1.1");
        assert_eq!(pkg.name, "openssl");
        assert_eq!(pkg.version, "1.1.1");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let pkg = Package::parse("  bash 5.2.21  ");
        assert_eq!(pkg.name, "bash");
        assert_eq!(pkg.version, "5.2.21");
    }

    #[test]
    fn test_parse_single_token_has_empty_version() {
        let pkg = Package::parse("busybox");
        assert_eq!(pkg.name, "busybox");
        assert_eq!(pkg.version, "");
    }

    #[test]
    fn test_parse_keeps_epoch_versions() {
        let pkg = Package::parse("tar 1:1.34+dfsg-1");
        assert_eq!(pkg.name, "tar");
        assert_eq!(pkg.version, "1:1.34+dfsg-1");
    }

    #[test]
    fn test_display() {
        assert_eq!(Package::parse("openssl 1.1.1").to_string(), "openssl 1.1.1");
        assert_eq!(Package::parse("busybox").to_string(), "busybox");
    }
}

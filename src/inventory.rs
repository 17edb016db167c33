//! Package inventory extraction.
//!
//! Lists the software installed inside an image by running a fixed query
//! command in a disposable container and splitting its output into one raw
//! `"<name> <version>"` string per line.

use crate::error::ScanError;
use crate::runtime::ImageRuntime;

/// Shell command run inside the image to list installed packages.
///
/// Prefers a Debian-style query and falls back to RPM; emits nothing when
/// neither package manager is present.
pub const INVENTORY_COMMAND: &str =
    "dpkg-query -W -f='${Package} ${Version}\\n' 2>/dev/null || rpm -qa 2>/dev/null";

pub struct InventoryExtractor<'a> {
    runtime: &'a dyn ImageRuntime,
}

impl<'a> InventoryExtractor<'a> {
    pub fn new(runtime: &'a dyn ImageRuntime) -> Self {
        Self { runtime }
    }

    /// Extracts the ordered raw package listing from the image.
    ///
    /// An image with no packages yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the disposable container cannot be created or run.
    pub async fn extract(&self, image: &str) -> Result<Vec<String>, ScanError> {
        let output = self.runtime.run_command(image, INVENTORY_COMMAND).await?;
        Ok(parse_inventory(&output))
    }
}

/// Splits raw inventory output on newlines, trimming each line and dropping
/// blanks. Order is preserved for deterministic report ordering.
pub fn parse_inventory(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inventory_splits_lines_in_order() {
        let output = "openssl 1.1.1\nbash 5.2.21\ncoreutils 9.1\n";
        assert_eq!(
            parse_inventory(output),
            vec!["openssl 1.1.1", "bash 5.2.21", "coreutils 9.1"]
        );
    }

    #[test]
    fn test_parse_inventory_drops_blank_lines() {
        let output = "openssl 1.1.1\n\n   \n\t\nbash 5.2.21\n";
        assert_eq!(parse_inventory(output), vec!["openssl 1.1.1", "bash 5.2.21"]);
    }

    #[test]
    fn test_parse_inventory_trims_carriage_returns() {
        // tty-attached container output arrives with CRLF line endings
        let output = "openssl 1.1.1\r\nbash 5.2.21\r\n";
        assert_eq!(parse_inventory(output), vec!["openssl 1.1.1", "bash 5.2.21"]);
    }

    #[test]
    fn test_parse_inventory_empty_output() {
        assert!(parse_inventory("").is_empty());
        assert!(parse_inventory("\n\n").is_empty());
    }
}

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use imagescan::{
    config::Config,
    db::{InMemoryDatabase, MatchPolicy},
    model::{ScanReport, Severity},
    report::{default_report_path, render_summary, save_report},
    runtime::DockerRuntime,
    scanner::ImageScanner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const FAIL_ON_MATCHED: u8 = 2;
}

#[derive(Parser)]
#[command(name = "imagescan")]
#[command(
    author,
    version,
    about = "Scan a container image for vulnerable packages"
)]
struct Cli {
    /// Image to scan (name:tag or name@digest)
    image: String,

    /// Write the JSON report to this path instead of the default
    /// scan-report-<timestamp>.json
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip writing the JSON report
    #[arg(long)]
    no_save: bool,

    /// Load the vulnerability corpus from a JSON file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Only report vulnerabilities the installed version is not yet
    /// patched against
    #[arg(long)]
    version_aware: bool,

    /// Exit with an error if vulnerabilities at or above this severity
    /// are found
    #[arg(long, value_enum)]
    fail_on: Option<FailLevel>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl FailLevel {
    fn threshold(self) -> Severity {
        match self {
            FailLevel::Low => Severity::Low,
            FailLevel::Medium => Severity::Medium,
            FailLevel::High => Severity::High,
            FailLevel::Critical => Severity::Critical,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = Config::load().unwrap_or_default();

    let runtime = DockerRuntime::connect().context("failed to create Docker client")?;

    let database_path = cli.database.or(config.database_path);
    let database = match &database_path {
        Some(path) => InMemoryDatabase::from_json_file(path)
            .with_context(|| format!("failed to load corpus from {}", path.display()))?,
        None => InMemoryDatabase::with_sample_entries(),
    };

    let policy = if cli.version_aware || config.version_aware {
        MatchPolicy::VersionAware
    } else {
        MatchPolicy::NameOnly
    };

    let scanner = ImageScanner::new(Box::new(runtime), Box::new(database)).with_policy(policy);
    let report = scanner
        .scan(&cli.image)
        .await
        .with_context(|| format!("scan of {} failed", cli.image))?;

    // The console summary always prints, whatever happens to the file write.
    println!("{}", render_summary(&report));

    if !cli.no_save && config.save_report {
        let path = cli
            .output
            .unwrap_or_else(|| config.report_dir.join(default_report_path(&report)));
        match save_report(&report, &path) {
            Ok(()) => println!("Detailed report saved to: {}", path.display()),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to save report"),
        }
    }

    Ok(determine_exit_code(&report, cli.fail_on))
}

fn determine_exit_code(report: &ScanReport, fail_on: Option<FailLevel>) -> u8 {
    let Some(level) = fail_on else {
        return exit_codes::SUCCESS;
    };
    let threshold = level.threshold();

    let triggered = report
        .findings
        .iter()
        .flat_map(|f| &f.vulnerabilities)
        .any(|v| v.severity >= threshold);

    if triggered {
        exit_codes::FAIL_ON_MATCHED
    } else {
        exit_codes::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagescan::model::{Finding, Vulnerability};

    fn report_with_severity(severity: Severity) -> ScanReport {
        let mut report = ScanReport::new("ubuntu:latest");
        report.findings.push(Finding {
            package_name: "openssl".to_string(),
            current_version: "1.1.1".to_string(),
            vulnerabilities: vec![Vulnerability {
                id: "CVE-2023-0001".to_string(),
                package: "openssl".to_string(),
                version: "1.1.1".to_string(),
                fixed_in: "1.1.2".to_string(),
                severity,
                description: "test".to_string(),
                references: vec![],
            }],
        });
        report.total_packages = 1;
        report.vulnerable_packages = 1;
        report
    }

    #[test]
    fn test_exit_code_without_fail_on() {
        let report = report_with_severity(Severity::Critical);
        assert_eq!(determine_exit_code(&report, None), exit_codes::SUCCESS);
    }

    #[test]
    fn test_exit_code_triggers_at_threshold() {
        let report = report_with_severity(Severity::High);
        assert_eq!(
            determine_exit_code(&report, Some(FailLevel::High)),
            exit_codes::FAIL_ON_MATCHED
        );
        assert_eq!(
            determine_exit_code(&report, Some(FailLevel::Medium)),
            exit_codes::FAIL_ON_MATCHED
        );
    }

    #[test]
    fn test_exit_code_below_threshold() {
        let report = report_with_severity(Severity::Medium);
        assert_eq!(
            determine_exit_code(&report, Some(FailLevel::High)),
            exit_codes::SUCCESS
        );
    }

    #[test]
    fn test_exit_code_clean_report() {
        let report = ScanReport::new("scratch:latest");
        assert_eq!(
            determine_exit_code(&report, Some(FailLevel::Low)),
            exit_codes::SUCCESS
        );
    }
}

//! cvedup CLI
//!
//! Collapses repeated CVE scan findings for the same resource in a CSV export

mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cvedup_core::{DedupConfig, Deduplicator, KeyPolicy};
use cvedup_formats::{read_table, write_table};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cvedup")]
#[command(
    version,
    about = "Deduplicate CSV based on CVE Titles and Resource ID",
    long_about = None
)]
struct Cli {
    /// Input CSV file path
    #[arg(value_name = "INPUT_CSV")]
    input: PathBuf,

    /// Output CSV file path
    #[arg(value_name = "OUTPUT_CSV")]
    output: PathBuf,

    /// Key policy: resource-only, or resource-title to keep distinct CVEs
    /// on one resource apart and track merged Resource IDs
    #[arg(short, long)]
    policy: Option<KeyPolicy>,

    /// Config file with column names and markers (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show statistics without writing output
    #[arg(long)]
    dry_run: bool,

    /// Output statistics in JSON format
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(&cli)
}

fn resolve_config(cli: &Cli) -> Result<DedupConfig> {
    let mut config = match &cli.config {
        Some(path) => config::load(path)?,
        None => DedupConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let policy = config.policy;

    info!("Starting CVE deduplication");
    info!("  Input: {:?}", cli.input);
    if !cli.dry_run {
        info!("  Output: {:?}", cli.output);
    }
    info!("  Policy: {}", policy);

    let deduplicator = Deduplicator::new(config)?;

    let table = read_table(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let (deduped, stats) = deduplicator
        .run(table)
        .with_context(|| format!("Failed to deduplicate {}", cli.input.display()))?;

    let output = if cli.dry_run {
        None
    } else {
        write_table(&deduped, &cli.output)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        Some(cli.output.as_path())
    };

    if cli.json {
        let report = report::json_report(&cli.input, output, policy, &stats);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if let Some(path) = output {
            println!("Deduplicated CSV saved as: {}", path.display());
        }
        report::print_summary_report(&cli.input, output, policy, &stats);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvedup_core::Error as CoreError;
    use cvedup_formats::Error as FormatError;
    use std::path::Path;
    use tempfile::TempDir;

    const FINDINGS: &str = "\
Title,Resource ID,GIS ID,Severity
CVE-2021-1,r1sha256xx,g1,high
CVE-2021-1,r1sha256yy,g2,high
Info,r2,g3,low
CVE-2021-2,r1sha256zz,g4,medium
";

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["cvedup"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn path_str(p: &Path) -> &str {
        p.to_str().unwrap()
    }

    #[test]
    fn test_requires_input_and_output() {
        assert!(Cli::try_parse_from(["cvedup"]).is_err());
        assert!(Cli::try_parse_from(["cvedup", "in.csv"]).is_err());
        assert!(Cli::try_parse_from(["cvedup", "in.csv", "out.csv"]).is_ok());
    }

    #[test]
    fn test_policy_flag_parses() {
        let parsed = cli(&["in.csv", "out.csv", "--policy", "resource-title"]);
        assert_eq!(parsed.policy, Some(KeyPolicy::ResourceTitle));
        assert!(Cli::try_parse_from(["cvedup", "a", "b", "--policy", "bogus"]).is_err());
    }

    #[test]
    fn test_run_resource_only() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("findings.csv");
        let output = dir.path().join("deduped.csv");
        std::fs::write(&input, FINDINGS).unwrap();

        run(&cli(&[path_str(&input), path_str(&output)])).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Title,Resource ID,GIS ID,Severity\n\
Info,r2,g3,low\n\
CVE-2021-1,r1sha256xx,\"g1, g2, g4\",high\n"
        );
    }

    #[test]
    fn test_run_resource_title() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("findings.csv");
        let output = dir.path().join("deduped.csv");
        std::fs::write(&input, FINDINGS).unwrap();

        run(&cli(&[
            path_str(&input),
            path_str(&output),
            "--policy",
            "resource-title",
        ]))
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Title,Resource ID,GIS ID,Severity,Appended Resource IDs\n\
Info,r2,g3,low,\n\
CVE-2021-1,r1sha256xx,\"g1, g2\",high,\"r1sha256xx, r1sha256yy\"\n\
CVE-2021-2,r1sha256zz,g4,medium,r1sha256zz\n"
        );
    }

    #[test]
    fn test_config_file_with_policy_override() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("findings.csv");
        let output = dir.path().join("deduped.csv");
        let config = dir.path().join("dedupe.yaml");
        std::fs::write(&input, FINDINGS).unwrap();
        std::fs::write(&config, "policy: resource-title\nseparator: \"|\"\n").unwrap();

        run(&cli(&[
            path_str(&input),
            path_str(&output),
            "--config",
            path_str(&config),
            "--policy",
            "resource-only",
        ]))
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("CVE-2021-1,r1sha256xx,g1|g2|g4,high"));
        assert!(!written.contains("Appended Resource IDs"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("findings.csv");
        let output = dir.path().join("deduped.csv");
        std::fs::write(&input, FINDINGS).unwrap();

        run(&cli(&[path_str(&input), path_str(&output), "--dry-run", "--json"])).unwrap();

        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("absent.csv");
        let output = dir.path().join("deduped.csv");

        let err = run(&cli(&[path_str(&input), path_str(&output)])).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FormatError>(),
            Some(FormatError::InputNotFound { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_column_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("findings.csv");
        let output = dir.path().join("deduped.csv");
        std::fs::write(&input, "Title,GIS ID\nCVE-1,g1\n").unwrap();

        let err = run(&cli(&[path_str(&input), path_str(&output)])).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::MissingField { .. })
        ));
        assert!(!output.exists());
    }
}

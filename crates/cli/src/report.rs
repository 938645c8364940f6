//! Run summaries for the CLI

use cvedup_core::{DedupStats, KeyPolicy};
use serde_json::{json, Value};
use std::path::Path;

/// Print a formatted summary report
pub fn print_summary_report(
    input: &Path,
    output: Option<&Path>,
    policy: KeyPolicy,
    stats: &DedupStats,
) {
    println!("\n{}", "═".repeat(60));
    println!("CVE Deduplication Complete");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());

    if let Some(output_path) = output {
        println!("Output:             {}", output_path.display());
    } else {
        println!("Output:             (dry run - no output written)");
    }

    println!("Key policy:         {}", policy);
    println!("Total rows:         {}", format_with_commas(stats.total_rows));
    println!("Non-CVE rows:       {}", format_with_commas(stats.passthrough_rows));
    println!("CVE rows:           {}", format_with_commas(stats.cve_rows));

    if stats.merged_rows > 0 {
        println!(
            "Merged away:        {} ({:.1}% of CVE rows)",
            format_with_commas(stats.merged_rows),
            stats.dedup_rate()
        );
    }

    println!("Final dataset:      {}", format_with_commas(stats.output_rows()));
    println!("{}", "═".repeat(60));
}

/// Machine-readable report for `--json`
pub fn json_report(
    input: &Path,
    output: Option<&Path>,
    policy: KeyPolicy,
    stats: &DedupStats,
) -> Value {
    json!({
        "input": input.to_string_lossy(),
        "output": output.map(|p| p.to_string_lossy().to_string()),
        "policy": policy.to_string(),
        "total_rows": stats.total_rows,
        "passthrough_rows": stats.passthrough_rows,
        "cve_rows": stats.cve_rows,
        "unique_keys": stats.unique_keys,
        "merged_rows": stats.merged_rows,
        "output_rows": stats.output_rows(),
        "deduplication_rate": stats.dedup_rate(),
        "dry_run": output.is_none(),
    })
}

/// Format number with thousand separators
fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(1234), "1,234");
        assert_eq!(format_with_commas(1234567), "1,234,567");
        assert_eq!(format_with_commas(42), "42");
        assert_eq!(format_with_commas(0), "0");
    }

    #[test]
    fn test_json_report() {
        let stats = DedupStats {
            total_rows: 5,
            passthrough_rows: 1,
            cve_rows: 4,
            unique_keys: 2,
            merged_rows: 2,
        };

        let report = json_report(
            Path::new("in.csv"),
            Some(Path::new("out.csv")),
            KeyPolicy::ResourceTitle,
            &stats,
        );

        assert_eq!(report["input"], "in.csv");
        assert_eq!(report["output"], "out.csv");
        assert_eq!(report["policy"], "resource-title");
        assert_eq!(report["output_rows"], 3);
        assert_eq!(report["deduplication_rate"], 50.0);
        assert_eq!(report["dry_run"], false);
    }

    #[test]
    fn test_json_report_dry_run() {
        let report = json_report(
            Path::new("in.csv"),
            None,
            KeyPolicy::ResourceOnly,
            &DedupStats::default(),
        );

        assert!(report["output"].is_null());
        assert_eq!(report["dry_run"], true);
        assert_eq!(report["deduplication_rate"], 0.0);
    }
}

//! Plain-text processing report.
//!
//! The report is the authoritative record of what a run dropped and why. It
//! is written next to the filtered dataset as `results.txt`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use pnf_model::{ProcessingStats, ValidationPolicy};

/// File name of the report, placed in the output file's directory.
pub const REPORT_FILE_NAME: &str = "results.txt";

/// Width of the separator lines framing each section.
pub const SEPARATOR_WIDTH: usize = 80;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Path of the report belonging to `output`.
pub fn report_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(REPORT_FILE_NAME),
        _ => PathBuf::from(REPORT_FILE_NAME),
    }
}

/// Render the report for one run.
///
/// The timestamp is passed in so that rendering stays deterministic.
pub fn render_report<Tz>(
    stats: &ProcessingStats,
    policy: ValidationPolicy,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let heavy = "=".repeat(SEPARATOR_WIDTH);
    let light = "-".repeat(SEPARATOR_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        "PROCESSING REPORT".to_string(),
        format!("Run at: {}", generated_at.format(TIMESTAMP_FORMAT)),
        format!("Validation policy: {policy}"),
        heavy.clone(),
        format!("Total clients:          {}", stats.total_clients),
        format!("Successfully processed: {}", stats.successful_clients),
        format!("Skipped clients:        {}", stats.skipped_client_count()),
    ];
    if policy.is_salvage() {
        lines.push(format!(
            "Skipped pregnancies:    {}",
            stats.skipped_pregnancy_count()
        ));
    }

    push_section(
        &mut lines,
        &light,
        "Skipped clients",
        stats
            .skipped_clients
            .iter()
            .map(|skipped| format!("- Client {}: {}", skipped.client_id, skipped.reason)),
    );
    if policy.is_salvage() {
        push_section(
            &mut lines,
            &light,
            "Skipped pregnancies",
            stats.skipped_pregnancies.iter().map(|skipped| {
                format!(
                    "- Client {}, pregnancy {}: {}",
                    skipped.client_id, skipped.pregnancy_id, skipped.reason
                )
            }),
        );
    }
    lines.push(heavy);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_section(
    lines: &mut Vec<String>,
    separator: &str,
    title: &str,
    entries: impl Iterator<Item = String>,
) {
    lines.push(separator.to_string());
    lines.push(title.to_string());
    lines.push(separator.to_string());
    let start = lines.len();
    lines.extend(entries);
    if lines.len() == start {
        lines.push("(none)".to_string());
    }
}

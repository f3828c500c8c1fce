//! Reading the input dataset and writing the run's output files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Read and parse the input document.
pub fn read_dataset(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read input {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse input {} as JSON", path.display()))
}

/// Pretty-print the filtered clients, keeping key order as produced.
pub fn render_dataset(records: &[Value]) -> Result<String> {
    let mut text = serde_json::to_string_pretty(records).context("serialize filtered dataset")?;
    text.push('\n');
    Ok(text)
}

/// Write the dataset and the report.
///
/// Both documents are first written to temporary siblings and only renamed
/// into place once both writes succeeded, so a failed run leaves neither
/// file behind.
pub fn write_outputs(output: &Path, dataset: &str, report_path: &Path, report: &str) -> Result<()> {
    if output == report_path {
        bail!("output {} would be overwritten by the report", output.display());
    }
    let dataset_tmp = staging_path(output);
    let report_tmp = staging_path(report_path);

    fs::write(&dataset_tmp, dataset)
        .with_context(|| format!("write output {}", output.display()))?;
    if let Err(error) = fs::write(&report_tmp, report) {
        let _ = fs::remove_file(&dataset_tmp);
        let _ = fs::remove_file(&report_tmp);
        return Err(error).with_context(|| format!("write report {}", report_path.display()));
    }
    if let Err(error) = fs::rename(&dataset_tmp, output) {
        let _ = fs::remove_file(&dataset_tmp);
        let _ = fs::remove_file(&report_tmp);
        return Err(error).with_context(|| format!("write output {}", output.display()));
    }
    if let Err(error) = fs::rename(&report_tmp, report_path) {
        let _ = fs::remove_file(output);
        let _ = fs::remove_file(&report_tmp);
        return Err(error).with_context(|| format!("write report {}", report_path.display()));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

use std::path::PathBuf;

use pnf_model::{ProcessingStats, ValidationPolicy};

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: PathBuf,
    pub policy: ValidationPolicy,
    pub stats: ProcessingStats,
    /// Nothing was written.
    pub dry_run: bool,
}

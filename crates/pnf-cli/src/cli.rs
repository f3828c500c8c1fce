//! CLI argument definitions for the dataset filter.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pnf_model::ValidationPolicy;

#[derive(Parser)]
#[command(
    name = "perinatal-filter",
    version,
    about = "Strip personal data from client datasets and validate their structure",
    long_about = "Filter a JSON array of client records down to whitelisted, non-identifying \
                  fields.\n\n\
                  Clients and pregnancies that are structurally incomplete are left out and \
                  listed in results.txt next to the output file."
)]
pub struct Cli {
    /// Input JSON file containing an array of client records.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output JSON file for the filtered dataset.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Validation policy (overrides the config file).
    ///
    /// `strict` rejects a client as soon as one of its pregnancies is invalid;
    /// `salvage` drops only the invalid pregnancies.
    #[arg(long = "policy", value_enum)]
    pub policy: Option<PolicyArg>,

    /// TOML file overriding the built-in whitelists and required fields.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Process and summarise without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Include record ids in debug logs.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Strict,
    Salvage,
}

impl From<PolicyArg> for ValidationPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Strict => ValidationPolicy::StrictWholeClient,
            PolicyArg::Salvage => ValidationPolicy::SalvagePerPregnancy,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positional_paths_and_policy() {
        let cli = Cli::parse_from([
            "perinatal-filter",
            "in.json",
            "out.json",
            "--policy",
            "strict",
        ]);
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert_eq!(
            cli.policy.map(ValidationPolicy::from),
            Some(ValidationPolicy::StrictWholeClient)
        );
        assert!(!cli.dry_run);
    }

    #[test]
    fn requires_both_paths() {
        assert!(Cli::try_parse_from(["perinatal-filter", "in.json"]).is_err());
    }
}

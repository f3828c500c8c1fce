use anyhow::{Context, Result, bail};
use tracing::info_span;

use pnf_cli::io::{read_dataset, render_dataset, write_outputs};
use pnf_core::Pipeline;
use pnf_model::FilterConfig;
use pnf_report::{render_report, report_path};

use crate::cli::Cli;
use crate::types::RunResult;

pub fn run_filter(cli: &Cli) -> Result<RunResult> {
    let report_file = report_path(&cli.output);
    if cli.output == report_file {
        bail!(
            "output {} collides with the report file name; choose another output name",
            cli.output.display()
        );
    }
    let mut config = match &cli.config {
        Some(path) => FilterConfig::load(path).context("load filter configuration")?,
        None => FilterConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config = config.with_policy(policy.into());
    }
    let policy = config.policy;
    let span = info_span!("filter", policy = %policy);
    let _guard = span.enter();

    println!("Loading {}", cli.input.display());
    let input = read_dataset(&cli.input)?;

    println!("Processing clients ({policy} policy)");
    let output = Pipeline::new(&config)
        .with_id_logging(cli.log_data)
        .run(input)
        .context("process input dataset")?;

    let dataset = render_dataset(&output.records)?;
    let report = render_report(&output.stats, policy, &chrono::Local::now());

    if cli.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Writing {}", cli.output.display());
        write_outputs(&cli.output, &dataset, &report_file, &report)?;
    }

    Ok(RunResult {
        input: cli.input.clone(),
        output: cli.output.clone(),
        report: report_file,
        policy,
        stats: output.stats,
        dry_run: cli.dry_run,
    })
}

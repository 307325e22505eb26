//! `harvest`: crawls the channels in a source list and writes one file of
//! relabeled proxy configurations per bucket.

mod cli;
mod settings;
mod sources;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use harvest_engine::{HarvestReport, Harvester, OutputWriter};
use harvest_logging::{harvest_error, harvest_info, harvest_warn};
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    harvest_logging::initialize(cli.log_destination(), cli.log_level());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            harvest_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let file = settings::load_settings(cli.config.as_deref())?;
    let plan = settings::resolve(&cli, file);

    let sources = sources::load_sources(&plan.sources)?;
    let harvester = Harvester::new(plan.harvest).context("Invalid settings")?;
    let writer = OutputWriter::new(&plan.output_dir, plan.suffix);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let report = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                harvest_warn!("Interrupted; finishing with what was collected");
                on_interrupt.cancel();
            }
        });
        harvester.run(sources, &cancel).await
    });

    log_summary(&report);
    writer
        .write_all(&report.outputs)
        .with_context(|| format!("Failed to write outputs to {:?}", plan.output_dir))?;
    Ok(())
}

fn log_summary(report: &HarvestReport) {
    let configs: usize = report
        .sources
        .iter()
        .filter_map(|source| source.result.as_ref().ok())
        .map(|stats| stats.configs)
        .sum();
    harvest_info!(
        "Harvested {} configs from {} sources ({} failed)",
        configs,
        report.sources.len(),
        report.failed_sources()
    );
    for output in &report.outputs {
        harvest_info!("{}: {} unique lines", output.bucket, output.line_count());
    }
}

use std::io::{self, IsTerminal};

use anyhow::Result;
use covers_core::pipeline;
use covers_core::{HttpClient, ScrapeError};
use tracing::{debug, info};

use crate::app::{config_manager, config_runtime, exit_handler, progress_manager, terminal};
use crate::{ProcessExit, output};

pub(crate) async fn run_covers() -> Result<ProcessExit> {
    let (args, cli_sources) = config_runtime::parse_cli_with_sources();
    let resolved = config_manager::resolve_config(args, &cli_sources)?;

    let default_level = config_runtime::resolve_default_log_level(&resolved.args);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    let no_color = terminal::is_no_color_requested(resolved.args.no_color);
    terminal::init_tracing(default_level, force_cli_log_level, no_color);

    let config = resolved.scrape;
    debug!(?config, "Resolved configuration");
    info!("Covers scraper starting");

    let client = HttpClient::with_settings(&config.http).map_err(ScrapeError::from)?;
    let use_bar = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        resolved.args.quiet,
        terminal::is_dumb_terminal(),
    );

    let mut bar = None;
    let report = pipeline::run_with_client(&client, &config, |total| {
        let (created, progress) = progress_manager::create_progress(use_bar, total);
        bar = created;
        progress
    })
    .await?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match &report.downloads {
        None => println!(
            "{}",
            output::dry_run_summary_line(report.urls.len(), &config.manifest_path)
        ),
        Some(stats) => {
            info!(
                downloaded = stats.downloaded(),
                skipped = stats.skipped(),
                failed = stats.failed(),
                bytes = stats.bytes(),
                "Download complete"
            );
            output::print_completion_summary(stats);
        }
    }

    Ok(exit_handler::determine_exit_outcome(&report))
}

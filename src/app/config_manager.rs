//! Configuration lifecycle: load file config, merge CLI, build the run config.

use anyhow::Result;
use covers_core::ScrapeConfig;

use crate::app::config_runtime::{self, CliValueSources};
use crate::app_config::load_default_file_config;
use crate::cli::Args;

/// Merged arguments plus the library configuration derived from them.
pub(crate) struct ResolvedConfig {
    pub(crate) args: Args,
    pub(crate) scrape: ScrapeConfig,
}

/// Load file config, merge CLI overrides, and build the [`ScrapeConfig`].
pub(crate) fn resolve_config(args: Args, cli_sources: &CliValueSources) -> Result<ResolvedConfig> {
    let loaded_config = load_default_file_config()?;
    let file_config = loaded_config.config.as_ref();
    let args = config_runtime::apply_config_defaults(args, cli_sources, file_config)?;
    let http = config_runtime::resolve_http_settings(&args, file_config);
    let scrape = config_runtime::build_scrape_config(&args, http)?;
    Ok(ResolvedConfig { args, scrape })
}

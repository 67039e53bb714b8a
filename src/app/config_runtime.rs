use anyhow::{Context, Result, bail};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use covers_core::fetch::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, HttpSettings};
use covers_core::pipeline::parse_base_url;
use covers_core::{MAX_CONCURRENCY, RunMode, ScrapeConfig};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Args;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) concurrency: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let command = Args::command();
    let matches = command.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    let sources = CliValueSources {
        concurrency: is_commandline_value(&matches, "concurrency"),
        verbose: is_commandline_value(&matches, "verbose"),
        quiet: is_commandline_value(&matches, "quiet"),
    };
    (args, sources)
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills arguments the user did not pass from the config file.
pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Args> {
    if let Some(file_config) = file_config {
        if args.listing_url.is_none() {
            args.listing_url.clone_from(&file_config.listing_url);
        }
        if args.base_url.is_none() {
            args.base_url.clone_from(&file_config.base_url);
        }
        if args.output_dir.is_none() {
            args.output_dir.clone_from(&file_config.output_dir);
        }
        if args.manifest_path.is_none() {
            args.manifest_path.clone_from(&file_config.manifest_path);
        }
        if args.timeout_secs.is_none() {
            args.timeout_secs = file_config.timeout_secs;
        }

        if !cli_sources.concurrency
            && let Some(concurrency) = file_config.concurrency
        {
            args.concurrency = concurrency;
        }

        if !cli_sources.verbose
            && !cli_sources.quiet
            && let Some(verbosity) = file_config.verbosity
        {
            apply_config_verbosity(&mut args, verbosity);
        }
    }

    if !(1..=MAX_CONCURRENCY).contains(&usize::from(args.concurrency)) {
        bail!(
            "Invalid effective concurrency value: {}. Expected range: 1..={MAX_CONCURRENCY}",
            args.concurrency
        );
    }

    Ok(args)
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    match verbosity {
        VerbositySetting::Default => {
            args.quiet = false;
            args.verbose = 0;
        }
        VerbositySetting::Verbose => {
            args.quiet = false;
            args.verbose = 1;
        }
        VerbositySetting::Quiet => {
            args.quiet = true;
            args.verbose = 0;
        }
        VerbositySetting::Debug => {
            args.quiet = false;
            args.verbose = 2;
        }
    }
}

/// Resolves timeouts and User-Agent; the CLI `--timeout` wins over the file.
pub(crate) fn resolve_http_settings(args: &Args, file_config: Option<&FileConfig>) -> HttpSettings {
    let connect_timeout_secs = file_config
        .and_then(|config| config.connect_timeout_secs)
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
    let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let user_agent = file_config.and_then(|config| config.user_agent.as_deref());
    HttpSettings::new(connect_timeout_secs, timeout_secs, user_agent)
}

/// Builds the library run configuration from merged arguments.
pub(crate) fn build_scrape_config(args: &Args, http: HttpSettings) -> Result<ScrapeConfig> {
    let mut config = ScrapeConfig {
        concurrency: usize::from(args.concurrency),
        http,
        mode: run_mode(args),
        ..ScrapeConfig::default()
    };

    if let Some(listing_url) = &args.listing_url {
        config.listing_url.clone_from(listing_url);
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = parse_base_url(base_url).context("Invalid --base-url")?;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir.clone_from(output_dir);
    }
    if let Some(manifest_path) = &args.manifest_path {
        config.manifest_path.clone_from(manifest_path);
    }

    Ok(config)
}

fn run_mode(args: &Args) -> RunMode {
    if args.from_manifest {
        RunMode::FromManifest
    } else if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Full
    }
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

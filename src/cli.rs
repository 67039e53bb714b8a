//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use covers_core::DEFAULT_CONCURRENCY;

/// Download every Game Informer magazine cover.
///
/// Scrapes the cover gallery, writes the full-resolution image URLs to a
/// JSON manifest, and saves each image once into a flat output directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "covers")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Gallery listing page to scrape
    #[arg(long, value_name = "URL")]
    pub listing_url: Option<String>,

    /// Origin used to resolve relative links and build canonical URLs
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory images are saved into (default: ./output)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path of the URL manifest (default: ./urls.json)
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest_path: Option<PathBuf>,

    /// Maximum concurrent downloads (1-32)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub concurrency: u8,

    /// Whole-request timeout in seconds (1-3600)
    #[arg(long = "timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: Option<u64>,

    /// Skip scraping and download the URLs already in the manifest
    #[arg(long, conflicts_with = "dry_run")]
    pub from_manifest: bool,

    /// Scrape and write the manifest without downloading images
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

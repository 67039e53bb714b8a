//! CLI entry point for the covers scraper.

use std::process::ExitCode;

use covers_core::ScrapeError;

mod app;
mod app_config;
mod cli;
mod output;

/// Process outcome, mapped to the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every image downloaded or skipped.
    Success,
    /// A fatal error stopped the run before or during scraping.
    Failure,
    /// The run finished but at least one image failed.
    Partial,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_covers().await {
        Ok(exit) => exit.into(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            if let Some(scrape_error) = error.downcast_ref::<ScrapeError>() {
                eprintln!("  Hint: {}", output::fatal_error_hint(scrape_error));
            }
            ProcessExit::Failure.into()
        }
    }
}

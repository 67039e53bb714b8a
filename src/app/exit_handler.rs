//! Exit code logic for the covers process.
//!
//! Single responsibility: map a finished run to the process exit outcome.
//! Fatal scrape errors never reach this point; `main` maps them to
//! [`ProcessExit::Failure`].

use covers_core::RunReport;

use crate::ProcessExit;

/// Determines the process exit outcome from a finished run.
pub(crate) fn determine_exit_outcome(report: &RunReport) -> ProcessExit {
    if report.has_download_failures() {
        ProcessExit::Partial
    } else {
        ProcessExit::Success
    }
}

#[cfg(test)]
mod tests {
    use super::determine_exit_outcome;
    use crate::ProcessExit;
    use covers_core::{DownloadError, DownloadOutcome, DownloadStats, RunReport};
    use std::path::PathBuf;

    fn downloaded() -> Result<DownloadOutcome, DownloadError> {
        Ok(DownloadOutcome::Downloaded {
            path: PathBuf::from("output/a.jpg.webp"),
            bytes: 3,
        })
    }

    fn failed() -> Result<DownloadOutcome, DownloadError> {
        Err(DownloadError::no_filename("https://gameinformer.com/covers/"))
    }

    fn report_with(stats: DownloadStats) -> RunReport {
        RunReport {
            downloads: Some(stats),
            ..RunReport::default()
        }
    }

    #[test]
    fn test_exit_outcome_success_when_no_failures() {
        let mut stats = DownloadStats::new();
        stats.record("https://a.example/a.jpg.webp", &downloaded());
        assert_eq!(determine_exit_outcome(&report_with(stats)), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_success_when_nothing_to_do() {
        assert_eq!(
            determine_exit_outcome(&report_with(DownloadStats::new())),
            ProcessExit::Success
        );
    }

    #[test]
    fn test_exit_outcome_success_for_dry_run() {
        assert_eq!(
            determine_exit_outcome(&RunReport::default()),
            ProcessExit::Success
        );
    }

    #[test]
    fn test_exit_outcome_partial_when_mixed() {
        let mut stats = DownloadStats::new();
        stats.record("https://a.example/a.jpg.webp", &downloaded());
        stats.record("https://gameinformer.com/covers/", &failed());
        assert_eq!(determine_exit_outcome(&report_with(stats)), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_partial_when_all_failed() {
        let mut stats = DownloadStats::new();
        stats.record("https://gameinformer.com/covers/", &failed());
        assert_eq!(determine_exit_outcome(&report_with(stats)), ProcessExit::Partial);
    }
}

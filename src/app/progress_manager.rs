//! Progress bar for the download phase.

use std::sync::Arc;

use covers_core::{DownloadError, DownloadOutcome, ProgressCallback, filename_for_url};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner} [{bar:30}] {pos}/{len} {msg}";

/// Creates the download progress bar when requested.
///
/// Returns the bar (so the caller can finish it) and a callback that
/// advances it after each URL. When `use_bar` is false both are `None`.
pub(crate) fn create_progress(
    use_bar: bool,
    total: usize,
) -> (Option<ProgressBar>, Option<ProgressCallback>) {
    if !use_bar || total == 0 {
        return (None, None);
    }

    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let callback_bar = bar.clone();
    let callback: ProgressCallback = Arc::new(
        move |url: &str, result: &Result<DownloadOutcome, DownloadError>| {
            let name = filename_for_url(url).unwrap_or_else(|| url.to_string());
            callback_bar.set_message(progress_message(&name, result.as_ref().ok()));
            callback_bar.inc(1);
        },
    );

    (Some(bar), Some(callback))
}

fn progress_message(name: &str, outcome: Option<&DownloadOutcome>) -> String {
    match outcome {
        Some(DownloadOutcome::Downloaded { .. }) => format!("saved {name}"),
        Some(DownloadOutcome::Skipped { .. }) => format!("skipped {name}"),
        None => format!("failed {name}"),
    }
}

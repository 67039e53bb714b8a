//! CLI output formatting and display helpers.

use std::path::Path;

use covers_core::pipeline::ErrorCategory;
use covers_core::{DownloadStats, ScrapeError};

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Final one-line summary printed after a download batch.
pub(crate) fn completion_summary_line(stats: &DownloadStats) -> String {
    let mut line = format!(
        "Done! Downloaded {} new images, skipped {} existing images.",
        stats.downloaded(),
        stats.skipped()
    );
    if stats.failed() > 0 {
        line.push_str(&format!(" {} failed.", stats.failed()));
    }
    line
}

/// Prints the summary line and, when some images failed, one line per failure.
pub(crate) fn print_completion_summary(stats: &DownloadStats) {
    println!("{}", completion_summary_line(stats));
    let width = terminal_width();
    for line in render_failure_lines(stats, width) {
        println!("{line}");
    }
}

pub(crate) fn render_failure_lines(stats: &DownloadStats, width: usize) -> Vec<String> {
    if stats.failures().is_empty() {
        return Vec::new();
    }
    let mut lines = vec![truncate_to_width("Failed downloads:", width)];
    for failure in stats.failures() {
        let name = failure.filename.as_deref().unwrap_or(failure.url.as_str());
        lines.push(truncate_to_width(
            &format!("- {name}: {}", failure.error),
            width,
        ));
    }
    lines.push(truncate_to_width(
        "Run again (or with --from-manifest) to retry; existing files are skipped.",
        width,
    ));
    lines
}

/// Line printed after a dry run.
pub(crate) fn dry_run_summary_line(url_count: usize, manifest_path: &Path) -> String {
    format!(
        "Dry run: saved {url_count} URLs to {} without downloading.",
        manifest_path.display()
    )
}

/// Suggested next step for a fatal error.
pub(crate) fn fatal_error_hint(error: &ScrapeError) -> &'static str {
    match error.category() {
        ErrorCategory::Network => {
            "Check your network connection and that the listing page is reachable."
        }
        ErrorCategory::Structure => {
            "The gallery page layout has changed; the container or link classes need updating."
        }
        ErrorCategory::Filesystem => {
            "Check that the output directory and manifest path are writable."
        }
        ErrorCategory::Configuration => "Check the command-line flags and config file values.",
    }
}

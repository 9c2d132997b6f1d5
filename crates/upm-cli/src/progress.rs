//! Progress bar utilities for CLI operations

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use upm_core::Progress;

/// Progress bar over mapping batches
///
/// Hidden when stderr is not a terminal or `quiet` is set.
pub fn create_batch_progress(total: usize, quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: &str, quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Apply one orchestrator progress report to `pb`
pub fn record(pb: &ProgressBar, progress: Progress) {
    pb.set_length(progress.batches_total as u64);
    pb.set_position(progress.batches_completed as u64);
    pb.set_message(format!("(last: batch {})", progress.batch_index + 1));
}

use std::sync::{Mutex, PoisonError};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str =
    "     Size: {total_bytes} {percent:>3}% [{bar:40.cyan/blue}] {eta} {bytes_per_sec}     ";

/// Receives byte-level progress for one transfer at a time.
pub trait ProgressSink: Sync {
    /// A new transfer of `total_bytes` bytes has started.
    fn start(&self, total_bytes: u64);

    /// `bytes` more bytes were transferred.
    fn advance(&self, bytes: u64);

    /// The current transfer is done.
    fn finish(&self);
}

/// Discards all progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl ProgressSink for Silent {
    fn start(&self, _total_bytes: u64) {}

    fn advance(&self, _bytes: u64) {}

    fn finish(&self) {}
}

/// Draws a byte progress bar on stderr.
#[derive(Default)]
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut bar);
    }
}

impl ProgressSink for TerminalProgress {
    fn start(&self, total_bytes: u64) {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let new_bar = ProgressBar::with_draw_target(Some(total_bytes), ProgressDrawTarget::stderr())
            .with_style(style);

        self.with_bar(|bar| {
            if let Some(old) = bar.replace(new_bar) {
                old.finish_and_clear();
            }
        });
    }

    fn advance(&self, bytes: u64) {
        self.with_bar(|bar| {
            if let Some(bar) = bar {
                bar.inc(bytes);
            }
        });
    }

    fn finish(&self) {
        self.with_bar(|bar| {
            if let Some(bar) = bar.take() {
                bar.finish_and_clear();
            }
        });
    }
}

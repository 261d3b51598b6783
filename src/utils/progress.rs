use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const ROW_TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} rows ({per_sec}, {eta} left)";
const WALK_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed}]";
const TICK: Duration = Duration::from_millis(120);

/// Terminal feedback for a run; every call is a no-op under `--quiet`
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Bar over the catalog rows of an extract or insert run
    pub fn rows(total: u64, message: &str, silent: bool) -> Self {
        let style = ProgressStyle::with_template(ROW_TEMPLATE)
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        Self::start(silent, message, || ProgressBar::new(total).with_style(style))
    }

    /// Spinner for directory walks, where the image count is not known upfront
    pub fn spinner(message: &str, silent: bool) -> Self {
        let style = ProgressStyle::with_template(WALK_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        Self::start(silent, message, || ProgressBar::new_spinner().with_style(style))
    }

    fn start(silent: bool, message: &str, make: impl FnOnce() -> ProgressBar) -> Self {
        if silent {
            return Self { bar: None };
        }
        let bar = make();
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK);
        Self { bar: Some(bar) }
    }

    pub fn increment(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }
}

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a fact is being fetched; hidden when not on a terminal
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} {elapsed}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());
        Self { pb }
    }

    /// Remove the spinner line so the outcome can be printed in its place
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

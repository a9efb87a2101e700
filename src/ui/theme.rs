//! Palette for collector output, keyed by what is being shown rather than by color

use crate::collector::CollectOutcome;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Banners and section titles
    pub title: Style,
    /// Horizontal rules and field labels
    pub frame: Style,
    pub added: Style,
    /// Duplicate and blank facts
    pub rejected: Style,
    pub failure: Style,
    pub record_id: Style,
    pub timestamp: Style,
    pub fact_text: Style,
}

impl Theme {
    /// Colors only when writing to a terminal
    pub fn for_terminal(is_term: bool) -> Self {
        if !is_term {
            return Self::monochrome();
        }
        Self {
            title: Style::new().cyan().bold(),
            frame: Style::new().bright_black(),
            added: Style::new().green().bold(),
            rejected: Style::new().yellow(),
            failure: Style::new().red().bold(),
            record_id: Style::new().magenta(),
            timestamp: Style::new().white().dimmed(),
            fact_text: Style::new().italic(),
        }
    }

    fn monochrome() -> Self {
        let plain = Style::new();
        Self {
            title: plain,
            frame: plain,
            added: plain,
            rejected: plain,
            failure: plain,
            record_id: plain,
            timestamp: plain,
            fact_text: plain,
        }
    }

    pub fn outcome(&self, outcome: &CollectOutcome) -> Style {
        match outcome {
            CollectOutcome::Added(_) => self.added,
            CollectOutcome::Duplicate(_) | CollectOutcome::Empty => self.rejected,
            CollectOutcome::FetchFailed(_) => self.failure,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::for_terminal(console::Term::stdout().is_term()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piped_output_is_uncolored() {
        let theme = Theme::for_terminal(false);
        for style in [theme.title, theme.added, theme.failure, theme.fact_text] {
            assert!(style.is_plain());
        }
    }

    #[test]
    fn test_outcomes_map_to_distinct_styles() {
        let theme = Theme::for_terminal(true);
        let added = theme.outcome(&CollectOutcome::Added(crate::FactRecord::new(1, "x")));
        let duplicate = theme.outcome(&CollectOutcome::Duplicate("x".to_string()));
        let failed = theme.outcome(&CollectOutcome::FetchFailed("timeout".to_string()));

        assert!(!added.is_plain());
        assert_eq!(duplicate, theme.outcome(&CollectOutcome::Empty));
        assert_ne!(added, duplicate);
        assert_ne!(duplicate, failed);
    }
}

use crate::collector::CollectOutcome;
use crate::fact::{self, FactRecord};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Characters of a new fact echoed after it is stored
const ADDED_PREVIEW_CHARS: usize = 100;

const RULE_WIDTH: usize = 60;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().title));
}

/// Title framed by horizontal rules
pub fn banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{}", rule.style(theme().frame));
    println!("{:^width$}", title.style(theme().title), width = RULE_WIDTH);
    println!("{}", rule.style(theme().frame));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().added));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().failure));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().rejected));
}

pub fn info(label: &str, value: &str) {
    println!("{} {}: {}", Icons::INFO, label.style(theme().frame), value);
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().title));
}

pub fn dim(text: &str) -> String {
    text.style(theme().timestamp).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().frame).to_string()
}

/// Result of one collection cycle
pub fn outcome(outcome: &CollectOutcome) {
    let style = theme().outcome(outcome);
    match outcome {
        CollectOutcome::Added(record) => {
            println!(
                "{} {}",
                Icons::NEW,
                format!("New fact added! (#{})", record.id).style(style)
            );
            let preview = fact::preview(&record.fact, ADDED_PREVIEW_CHARS);
            let ellipsis = if record.fact.chars().count() > ADDED_PREVIEW_CHARS { "..." } else { "" };
            println!("  {}{}", preview.style(theme().fact_text), ellipsis);
        }
        CollectOutcome::Duplicate(preview) => {
            println!("{} {}", Icons::SKIP, format!("Duplicate detected: '{}...'", preview).style(style));
        }
        CollectOutcome::Empty => {
            println!("{} {}", Icons::SKIP, "Empty fact received, skipping.".style(style));
        }
        CollectOutcome::FetchFailed(reason) => {
            eprintln!("{} {}", Icons::CROSS, format!("Failed to fetch a fact: {}", reason).style(style));
        }
    }
}

/// One entry of the full listing
pub fn fact_entry(record: &FactRecord) {
    println!();
    println!(
        "[{}] {}",
        record.id.to_string().style(theme().record_id),
        fact::display_timestamp(&record.date_added).style(theme().timestamp)
    );
    println!("  {}", record.fact.style(theme().fact_text));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().frame), value);
}

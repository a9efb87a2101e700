use crate::collector::SessionStats;
use crate::fact::{display_timestamp, CollectionStats};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn collection_table(stats: &CollectionStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Total facts", &stats.total.to_string());
    if let Some(first) = &stats.first_added {
        builder.add_row("First fact added", &display_timestamp(first));
    }
    if let Some(latest) = &stats.latest_added {
        builder.add_row("Latest fact added", &display_timestamp(latest));
    }
    builder.build()
}

pub fn session_table(stats: &SessionStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Cycles", &stats.cycles.to_string());
    builder.add_row("Added", &stats.added.to_string());
    builder.add_row("Duplicates", &stats.duplicates.to_string());
    builder.add_row("Empty", &stats.empty.to_string());
    builder.add_row("Fetch failures", &stats.fetch_failures.to_string());
    builder.build()
}

pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    banner, dim, error, fact_entry, header, info, muted, outcome, section, success, summary_row,
    warn,
};
pub use progress::Spinner;
pub use table::{TableBuilder, collection_table, session_table};
pub use theme::{theme, Theme};

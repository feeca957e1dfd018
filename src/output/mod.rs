pub mod table;

pub use table::{alert_table, categories_table, suggestions_table};

pub mod config;
pub mod fetch;
pub mod locate;
pub mod preview;
pub mod project;
pub mod render;
pub mod schema;

pub use locate::locate;
pub use project::{to_csv, CsvDocument, PackingList, Table};
pub use render::{Outcome, OutputFormat};
pub use schema::{derive_schema, header_label, ColumnSchema};

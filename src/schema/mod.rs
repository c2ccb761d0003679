pub mod derive;
pub mod label;
pub mod types;

pub use derive::{collect_keys, derive_schema, PREFERRED_ORDER};
pub use label::header_label;
pub use types::ColumnSchema;

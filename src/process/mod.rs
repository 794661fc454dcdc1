pub mod csv;
pub mod key;
pub mod project;
pub mod table;

pub use csv::{parse_table, Delimiter};
pub use key::normalize_key;
pub use project::{attach_images, number_label, project_rows, publish, PublishedRecord, Record};
pub use table::Table;

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod render;
pub mod schema;

pub use config::{CatalogConfig, ImagePrecedence};
pub use error::{ProbeError, SchemaError};
pub use pipeline::{Catalog, Pipeline};

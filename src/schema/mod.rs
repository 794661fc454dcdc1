pub mod columns;
pub mod validate;

pub use columns::{IDENTIFIER, IMAGE_URL, REQUIRED, TRAITS};
pub use validate::ensure_required_columns;

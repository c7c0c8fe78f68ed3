#![deny(unsafe_code)]

pub mod error;
pub mod registry;
pub mod schema;
pub mod text;

pub use crate::error::StandardsError;
pub use crate::registry::{Pattern, PatternEntry, SchemaRegistry, TargetColumn, TargetSchema};
pub use crate::schema::ColumnRef;
pub use crate::text::normalize_text;

#![deny(unsafe_code)]

//! Classifies uploaded spreadsheets into target tables and maps their
//! columns.
//!
//! The pipeline runs type inference and header categorization per field,
//! ranks the target tables, then maps fields onto the chosen table's
//! columns with suggestions for whatever is left over.

pub mod analysis;
pub mod categorize;
pub mod classify;
pub mod engine;
pub mod error;
pub mod inference;
pub mod mapper;
pub mod options;
pub mod relationships;
pub mod score;
pub mod suggest;

pub use crate::analysis::analyze_records;
pub use crate::categorize::{CategorizedField, Categorizer};
pub use crate::classify::{Classification, TableScore, classify};
pub use crate::engine::{MappingEngine, TableMapper, map_collections};
pub use crate::error::MappingError;
pub use crate::inference::{TypeInference, infer_field_type};
pub use crate::mapper::{Exclusion, MappedFields, map_fields, transformation_for};
pub use crate::options::MappingOptions;
pub use crate::relationships::detect_relationships;
pub use crate::suggest::SuggestionEngine;

#![deny(unsafe_code)]

pub mod category;
pub mod collection;
pub mod confidence;
pub mod error;
pub mod mapping;
pub mod target;

pub use category::{CategoryCandidate, ColumnMatch, FieldCategory};
pub use collection::{CellValue, CollectionAnalysis, FieldInfo, Record};
pub use confidence::{ConfidenceLevel, ConfidenceThresholds};
pub use error::{Result, ValidationError};
pub use mapping::{
    FieldMapping, MappingResult, Relationship, SuggestedField, TableMapping,
    TransformationNeeded, UnmappedField, UnmappedReason,
};
pub use target::{FieldType, TargetTable};

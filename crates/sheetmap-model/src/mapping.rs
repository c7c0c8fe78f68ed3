//! Output contract: the table decision and per-field mappings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::confidence::{ConfidenceLevel, ConfidenceThresholds};
use crate::target::TargetTable;

/// Type coercion required to copy a source value into its target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformationNeeded {
    #[default]
    None,
    ParseNumber,
    ParseDate,
    TrimString,
    Stringify,
}

impl TransformationNeeded {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationNeeded::None => "none",
            TransformationNeeded::ParseNumber => "parse-number",
            TransformationNeeded::ParseDate => "parse-date",
            TransformationNeeded::TrimString => "trim-string",
            TransformationNeeded::Stringify => "stringify",
        }
    }
}

impl fmt::Display for TransformationNeeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mapping from one source header to one target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
    pub confidence: f64,
    pub transformation_needed: TransformationNeeded,
}

/// Advisory pointer from a mapped field to another table's entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub related_table: TargetTable,
    /// Source field whose text values identify the related entity.
    pub key: String,
    /// Column of the related table the values are matched against.
    pub related_field: String,
}

/// Mapping of a collection onto one candidate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMapping {
    pub table_name: TargetTable,
    pub confidence: f64,
    pub reasoning: String,
    pub field_mappings: Vec<FieldMapping>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl TableMapping {
    pub fn mapping_for(&self, source_field: &str) -> Option<&FieldMapping> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.source_field == source_field)
    }
}

/// Why a source field did not make it into the chosen table's mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmappedReason {
    /// No dictionary pattern matched the header.
    NoPatternMatch,
    /// The header matched several tables and none of them was chosen.
    AmbiguousCategory,
    /// The match was too weak to be trusted.
    BelowConfidenceFloor,
    /// The header clearly belongs to a table other than the chosen one.
    OtherTable,
    /// Another field claimed the same target column with higher confidence.
    TargetAlreadyMapped,
}

impl UnmappedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnmappedReason::NoPatternMatch => "no-pattern-match",
            UnmappedReason::AmbiguousCategory => "ambiguous-category",
            UnmappedReason::BelowConfidenceFloor => "below-confidence-floor",
            UnmappedReason::OtherTable => "other-table",
            UnmappedReason::TargetAlreadyMapped => "target-already-mapped",
        }
    }
}

impl fmt::Display for UnmappedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked alternative target column for an unmapped field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedField {
    pub field: String,
    pub table: TargetTable,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedField {
    pub field_name: String,
    pub reason: UnmappedReason,
    #[serde(default)]
    pub suggestions: Vec<SuggestedField>,
}

/// Result of a mapping run.
///
/// `tables` is never empty and is ordered best candidate first; the
/// unmapped fields are relative to `tables[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    pub tables: Vec<TableMapping>,
    pub unmapped_fields: Vec<UnmappedField>,
}

impl MappingResult {
    /// The chosen table.
    pub fn best(&self) -> Option<&TableMapping> {
        self.tables.first()
    }

    fn mappings(&self) -> &[FieldMapping] {
        self.best()
            .map(|table| table.field_mappings.as_slice())
            .unwrap_or_default()
    }

    /// Number of source fields accounted for (mapped plus unmapped).
    pub fn accounted_fields(&self) -> usize {
        self.mappings().len() + self.unmapped_fields.len()
    }

    /// True when the chosen table reaches the low confidence threshold.
    pub fn has_confident_table(&self, thresholds: &ConfidenceThresholds) -> bool {
        self.best()
            .is_some_and(|table| thresholds.categorize(table.confidence).is_some())
    }

    /// Mapped fields of the chosen table per confidence level. Mappings
    /// below `thresholds.low` are not counted.
    pub fn count_by_level(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for mapping in self.mappings() {
            if let Some(level) = thresholds.categorize(mapping.confidence) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }
}

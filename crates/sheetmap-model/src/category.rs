//! Field categorization: which (table, column) a source header belongs to.

use serde::{Deserialize, Serialize};

use crate::target::TargetTable;

/// The column a header matched and how specific the match was.
///
/// On the wire this is `{fieldType, matchedPattern, confidence}`; the
/// confidence may be left out by callers that categorize headers themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMatch {
    /// Target column name (e.g. `price`).
    #[serde(rename = "fieldType", alias = "column")]
    pub column: String,
    /// Normalized dictionary pattern that matched the header.
    #[serde(alias = "matched_pattern")]
    pub matched_pattern: String,
    /// Match confidence in `[0, 1]`; `None` until scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ColumnMatch {
    pub fn new(column: impl Into<String>, matched_pattern: impl Into<String>, confidence: f64) -> Self {
        Self {
            column: column.into(),
            matched_pattern: matched_pattern.into(),
            confidence: Some(confidence),
        }
    }

    /// The confidence, with an unscored match counting as zero.
    pub fn score(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// True when the confidence is missing or a finite value in `[0, 1]`.
    pub fn has_valid_confidence(&self) -> bool {
        self.confidence
            .is_none_or(|value| value.is_finite() && (0.0..=1.0).contains(&value))
    }
}

/// One table a header could belong to when it is ambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCandidate {
    pub table: TargetTable,
    #[serde(flatten)]
    pub column: ColumnMatch,
}

/// Result of categorizing a single header against the pattern dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum FieldCategory {
    Inventory(ColumnMatch),
    Vendor(ColumnMatch),
    PurchaseOrder(ColumnMatch),
    SalesOrder(ColumnMatch),
    /// Equally specific patterns matched in more than one table.
    /// Candidates are listed in table priority order.
    Ambiguous { candidates: Vec<CategoryCandidate> },
    Unknown,
}

impl FieldCategory {
    /// Wrap a match in the variant for `table`.
    pub fn matched(table: TargetTable, column: ColumnMatch) -> Self {
        match table {
            TargetTable::Inventory => FieldCategory::Inventory(column),
            TargetTable::Vendor => FieldCategory::Vendor(column),
            TargetTable::PurchaseOrder => FieldCategory::PurchaseOrder(column),
            TargetTable::SalesOrder => FieldCategory::SalesOrder(column),
        }
    }

    /// The single table of an unambiguous match.
    pub fn table(&self) -> Option<TargetTable> {
        match self {
            FieldCategory::Inventory(_) => Some(TargetTable::Inventory),
            FieldCategory::Vendor(_) => Some(TargetTable::Vendor),
            FieldCategory::PurchaseOrder(_) => Some(TargetTable::PurchaseOrder),
            FieldCategory::SalesOrder(_) => Some(TargetTable::SalesOrder),
            FieldCategory::Ambiguous { .. } | FieldCategory::Unknown => None,
        }
    }

    /// Every (table, match) pair this category offers.
    pub fn candidates(&self) -> Vec<(TargetTable, &ColumnMatch)> {
        match self {
            FieldCategory::Inventory(m) => vec![(TargetTable::Inventory, m)],
            FieldCategory::Vendor(m) => vec![(TargetTable::Vendor, m)],
            FieldCategory::PurchaseOrder(m) => vec![(TargetTable::PurchaseOrder, m)],
            FieldCategory::SalesOrder(m) => vec![(TargetTable::SalesOrder, m)],
            FieldCategory::Ambiguous { candidates } => candidates
                .iter()
                .map(|candidate| (candidate.table, &candidate.column))
                .collect(),
            FieldCategory::Unknown => Vec::new(),
        }
    }

    /// The match offered for `table`, if any.
    pub fn match_for(&self, table: TargetTable) -> Option<&ColumnMatch> {
        self.candidates()
            .into_iter()
            .find(|(candidate, _)| *candidate == table)
            .map(|(_, column)| column)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, FieldCategory::Ambiguous { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldCategory::Unknown)
    }

    /// Short `table:column` description used in logs and reasoning.
    pub fn describe(&self) -> String {
        match self {
            FieldCategory::Unknown => "unknown".to_string(),
            FieldCategory::Ambiguous { candidates } => candidates
                .iter()
                .map(|c| format!("{}:{}", c.table, c.column.column))
                .collect::<Vec<_>>()
                .join(" | "),
            matched => matched
                .candidates()
                .first()
                .map(|(table, column)| format!("{table}:{}", column.column))
                .unwrap_or_default(),
        }
    }
}

//! Input contract: one parsed sheet and the per-field analysis of its headers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::FieldCategory;
use crate::error::ValidationError;
use crate::target::FieldType;

/// A raw spreadsheet cell as produced by the sheet parser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for nulls and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Number(_) => false,
        }
    }

    /// The cell rendered as text, without trimming.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Text(text) => text.clone(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One parsed row, keyed by source header.
pub type Record = BTreeMap<String, CellValue>;

/// Analysis of one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub field_name: String,
    pub data_type: FieldType,
    /// Bounded preview of raw values, in sheet order.
    #[serde(default)]
    pub sample_values: Vec<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_category: Option<FieldCategory>,
}

impl FieldInfo {
    pub fn new(field_name: impl Into<String>, data_type: FieldType) -> Self {
        Self {
            field_name: field_name.into(),
            data_type,
            sample_values: Vec::new(),
            field_category: None,
        }
    }

    #[must_use]
    pub fn with_samples<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.sample_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: FieldCategory) -> Self {
        self.field_category = Some(category);
        self
    }

    /// Non-blank sample values.
    pub fn present_samples(&self) -> impl Iterator<Item = &CellValue> {
        self.sample_values.iter().filter(|value| !value.is_blank())
    }
}

/// Everything known about one uploaded record set before mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAnalysis {
    pub collection_name: String,
    pub total_documents: usize,
    #[serde(default)]
    pub sample_data: Vec<Record>,
    pub fields: Vec<FieldInfo>,
}

impl CollectionAnalysis {
    /// Look up a field by its exact source header.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.field_name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|field| field.field_name.as_str())
            .collect()
    }

    /// Checks the structural invariants the mapping engine relies on.
    ///
    /// # Errors
    ///
    /// Fails when there is nothing to classify (no fields, or neither sample
    /// rows nor per-field samples), when a field name is blank or repeated,
    /// when a supplied category carries a confidence outside `[0, 1]`, or
    /// when a sample row carries a header without a matching field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fields.is_empty() {
            return Err(ValidationError::NoFields {
                collection: self.collection_name.clone(),
            });
        }

        let mut names: BTreeSet<&str> = BTreeSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if field.field_name.trim().is_empty() {
                return Err(ValidationError::BlankFieldName { index });
            }
            if !names.insert(field.field_name.as_str()) {
                return Err(ValidationError::DuplicateField {
                    field: field.field_name.clone(),
                });
            }
            let supplied = field.field_category.iter().flat_map(FieldCategory::candidates);
            for (table, column) in supplied {
                if !column.has_valid_confidence() {
                    return Err(ValidationError::InvalidConfidence {
                        field: field.field_name.clone(),
                        table,
                        confidence: column.score(),
                    });
                }
            }
        }

        for (row, record) in self.sample_data.iter().enumerate() {
            if let Some(header) = record.keys().find(|key| !names.contains(key.as_str())) {
                return Err(ValidationError::UndeclaredField {
                    field: header.clone(),
                    row,
                });
            }
        }

        let has_samples = self
            .fields
            .iter()
            .any(|field| field.present_samples().next().is_some());
        if self.sample_data.is_empty() && !has_samples {
            return Err(ValidationError::NoSampleData {
                collection: self.collection_name.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(fields: Vec<FieldInfo>, sample_data: Vec<Record>) -> CollectionAnalysis {
        CollectionAnalysis {
            collection_name: "sheet".to_string(),
            total_documents: sample_data.len(),
            sample_data,
            fields,
        }
    }

    #[test]
    fn blank_cells() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(!CellValue::from("x").is_blank());
    }

    #[test]
    fn cells_deserialize_untagged() {
        let cells: Vec<CellValue> = serde_json::from_str(r#"[null, true, 12.5, "P001"]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Number(12.5),
                CellValue::from("P001"),
            ]
        );
    }

    #[test]
    fn undeclared_header_is_rejected() {
        let mut record = Record::new();
        record.insert("Item ID".to_string(), CellValue::from("P001"));
        record.insert("Ghost".to_string(), CellValue::from("?"));
        let input = analysis(vec![FieldInfo::new("Item ID", FieldType::Identifier)], vec![record]);
        assert_eq!(
            input.validate(),
            Err(ValidationError::UndeclaredField {
                field: "Ghost".to_string(),
                row: 0,
            })
        );
    }

    #[test]
    fn supplied_confidence_must_be_a_fraction() {
        use crate::category::ColumnMatch;
        use crate::target::TargetTable;

        let mut field = FieldInfo::new("Item ID", FieldType::Identifier).with_samples(["P001"]);
        field.field_category = Some(FieldCategory::Inventory(ColumnMatch::new(
            "id", "item id", 7.5,
        )));
        let input = analysis(vec![field.clone()], vec![]);
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidConfidence {
                field: "Item ID".to_string(),
                table: TargetTable::Inventory,
                confidence: 7.5,
            })
        );

        field.field_category = Some(FieldCategory::Inventory(ColumnMatch::new(
            "id",
            "item id",
            f64::NAN,
        )));
        assert!(matches!(
            analysis(vec![field.clone()], vec![]).validate(),
            Err(ValidationError::InvalidConfidence { .. })
        ));

        field.field_category = Some(FieldCategory::Inventory(ColumnMatch::new("id", "item id", 1.0)));
        assert_eq!(analysis(vec![field], vec![]).validate(), Ok(()));
    }

    #[test]
    fn header_only_collection_needs_samples() {
        let input = analysis(vec![FieldInfo::new("Item ID", FieldType::String)], vec![]);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NoSampleData { .. })
        ));

        let with_samples = analysis(
            vec![FieldInfo::new("Item ID", FieldType::String).with_samples(["P001"])],
            vec![],
        );
        assert_eq!(with_samples.validate(), Ok(()));
    }
}

#![deny(unsafe_code)]

//! On-disk layout of the target schema file.

use serde::{Deserialize, Serialize};
use sheetmap_model::{FieldType, TargetTable};

pub const SCHEMA_NAME: &str = "sheetmap.target-schema";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    pub schema: SchemaHeader,
    pub tables: Vec<TableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaHeader {
    pub name: String,
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    pub name: TargetTable,
    #[serde(default)]
    pub label: Option<String>,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: FieldType,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub references: Option<ColumnRef>,
}

/// Pointer from a column to a column of another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: TargetTable,
    pub column: String,
}

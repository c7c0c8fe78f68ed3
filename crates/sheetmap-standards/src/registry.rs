#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use sheetmap_model::{FieldType, TargetTable};

use crate::error::StandardsError;
use crate::schema::{ColumnDef, ColumnRef, SCHEMA_NAME, SCHEMA_VERSION, SchemaFile, TableDef};
use crate::text::{compact, normalize_text, tokens};

const BUILTIN_SCHEMA: &str = include_str!("../data/target_schema.toml");
const BUILTIN_ORIGIN: &str = "<builtin target_schema.toml>";

/// A normalized header pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Normalized text, e.g. `point of contact`.
    pub text: String,
    pub tokens: Vec<String>,
    pub compact: String,
}

impl Pattern {
    fn new(raw: &str) -> Option<Self> {
        let text = normalize_text(raw);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            tokens: tokens(&text),
            compact: compact(&text),
            text,
        })
    }

    /// Character length of the normalized pattern.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TargetColumn {
    pub name: String,
    pub data_type: FieldType,
    pub patterns: Vec<Pattern>,
    pub references: Option<ColumnRef>,
}

impl TargetColumn {
    /// Column name with underscores read as spaces (`order_date` -> `order date`).
    pub fn display_name(&self) -> String {
        normalize_text(&self.name)
    }
}

/// Columns of one target table, in declaration order.
#[derive(Debug, Clone)]
pub struct TargetSchema {
    pub table: TargetTable,
    pub label: String,
    pub columns: Vec<TargetColumn>,
}

impl TargetSchema {
    pub fn column(&self, name: &str) -> Option<&TargetColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// The column other tables point at when they reference this table by name.
    pub fn name_column(&self) -> Option<&TargetColumn> {
        self.column("name").or_else(|| {
            self.columns
                .iter()
                .find(|column| column.data_type == FieldType::String)
        })
    }
}

/// One entry of the pattern dictionary.
#[derive(Debug, Clone, Copy)]
pub struct PatternEntry<'a> {
    pub table: TargetTable,
    pub column: &'a TargetColumn,
    pub column_index: usize,
    pub pattern: &'a Pattern,
}

/// Immutable registry of target schemas and their header patterns.
///
/// Built once at start-up and shared by reference; nothing mutates it after
/// construction.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// Indexed by [`TargetTable::priority`].
    tables: Vec<TargetSchema>,
}

impl SchemaRegistry {
    /// Parse the schema that ships with the crate.
    pub fn builtin() -> Result<Self, StandardsError> {
        Self::from_toml_str(BUILTIN_SCHEMA, Path::new(BUILTIN_ORIGIN))
    }

    /// Load a custom schema file.
    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        Self::from_toml_str(&contents, path)
    }

    /// Parse schema TOML; `origin` is only used in error messages.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, StandardsError> {
        let file: SchemaFile = toml::from_str(contents).map_err(|e| StandardsError::Toml {
            path: PathBuf::from(origin),
            source: e,
        })?;
        Self::from_schema_file(file)
    }

    pub fn from_schema_file(file: SchemaFile) -> Result<Self, StandardsError> {
        if file.schema.name != SCHEMA_NAME || file.schema.version != SCHEMA_VERSION {
            return Err(StandardsError::UnsupportedSchema {
                name: file.schema.name,
                version: file.schema.version,
            });
        }

        let mut seen: BTreeSet<TargetTable> = BTreeSet::new();
        for table in &file.tables {
            if !seen.insert(table.name) {
                return Err(StandardsError::DuplicateTable { table: table.name });
            }
        }
        for table in TargetTable::ALL {
            if !seen.contains(&table) {
                return Err(StandardsError::MissingTable { table });
            }
        }

        let mut tables = file
            .tables
            .into_iter()
            .map(build_schema)
            .collect::<Result<Vec<_>, _>>()?;
        tables.sort_by_key(|schema| schema.table);

        let registry = Self { tables };
        registry.validate_references()?;
        Ok(registry)
    }

    /// Schema of one target table.
    pub fn schema(&self, table: TargetTable) -> &TargetSchema {
        &self.tables[table.priority()]
    }

    /// All schemas in table priority order.
    pub fn tables(&self) -> &[TargetSchema] {
        &self.tables
    }

    /// Flattened pattern dictionary in a stable order: table priority, then
    /// column declaration order, then pattern declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = PatternEntry<'_>> {
        self.tables.iter().flat_map(|schema| {
            schema
                .columns
                .iter()
                .enumerate()
                .flat_map(move |(column_index, column)| {
                    column.patterns.iter().map(move |pattern| PatternEntry {
                        table: schema.table,
                        column,
                        column_index,
                        pattern,
                    })
                })
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns().count()
    }

    fn validate_references(&self) -> Result<(), StandardsError> {
        for schema in &self.tables {
            for column in &schema.columns {
                let Some(reference) = &column.references else {
                    continue;
                };
                if self.schema(reference.table).column(&reference.column).is_none() {
                    return Err(StandardsError::UnknownReference {
                        table: schema.table,
                        column: column.name.clone(),
                        target: format!("{}.{}", reference.table, reference.column),
                    });
                }
            }
        }
        Ok(())
    }
}

fn build_schema(def: TableDef) -> Result<TargetSchema, StandardsError> {
    let table = def.name;
    let mut names: BTreeSet<String> = BTreeSet::new();
    let mut columns = Vec::with_capacity(def.columns.len());
    for column in def.columns {
        if !names.insert(column.name.clone()) {
            return Err(StandardsError::DuplicateColumn {
                table,
                column: column.name,
            });
        }
        columns.push(build_column(table, column)?);
    }
    Ok(TargetSchema {
        table,
        label: def.label.unwrap_or_else(|| table.label().to_string()),
        columns,
    })
}

fn build_column(table: TargetTable, def: ColumnDef) -> Result<TargetColumn, StandardsError> {
    let mut patterns: Vec<Pattern> = Vec::new();
    for raw in &def.patterns {
        if let Some(pattern) = Pattern::new(raw)
            && !patterns.contains(&pattern)
        {
            patterns.push(pattern);
        }
    }
    if patterns.is_empty() {
        return Err(StandardsError::EmptyPatterns {
            table,
            column: def.name,
        });
    }
    Ok(TargetColumn {
        name: def.name,
        data_type: def.data_type,
        patterns,
        references: def.references,
    })
}

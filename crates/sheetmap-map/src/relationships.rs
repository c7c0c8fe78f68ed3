//! Cross-table relationship hints.

use std::collections::BTreeSet;

use sheetmap_model::{FieldMapping, FieldType, Relationship, TargetTable};
use sheetmap_standards::{SchemaRegistry, TargetColumn, normalize_text};

use crate::categorize::CategorizedField;

/// Keywords that point at another table when a column declares no reference.
const KEYWORDS: [(&str, TargetTable); 4] = [
    ("vendor", TargetTable::Vendor),
    ("supplier", TargetTable::Vendor),
    ("product", TargetTable::Inventory),
    ("item", TargetTable::Inventory),
];

/// Finds mapped free-text fields whose values name an entity of another table.
///
/// The related table comes from the column's declared reference, or failing
/// that from keywords in the column name and matched pattern. Hints are
/// advisory and never affect the table decision.
pub fn detect_relationships(
    registry: &SchemaRegistry,
    table: TargetTable,
    fields: &[CategorizedField],
    mappings: &[FieldMapping],
) -> Vec<Relationship> {
    let schema = registry.schema(table);
    let mut seen: BTreeSet<(TargetTable, &str)> = BTreeSet::new();
    let mut relationships = Vec::new();

    for mapping in mappings {
        let Some(field) = fields.iter().find(|f| f.name == mapping.source_field) else {
            continue;
        };
        if field.inferred.data_type != FieldType::String {
            continue;
        }
        let Some(column) = schema.column(&mapping.target_field) else {
            continue;
        };
        let matched_pattern = field
            .category
            .match_for(table)
            .map(|m| m.matched_pattern.as_str())
            .unwrap_or_default();
        let Some((related_table, related_field)) = related(registry, column, matched_pattern)
        else {
            continue;
        };
        if related_table == table || !seen.insert((related_table, mapping.source_field.as_str())) {
            continue;
        }
        relationships.push(Relationship {
            related_table,
            key: mapping.source_field.clone(),
            related_field,
        });
    }
    relationships
}

fn related(
    registry: &SchemaRegistry,
    column: &TargetColumn,
    matched_pattern: &str,
) -> Option<(TargetTable, String)> {
    if let Some(reference) = &column.references {
        return Some((reference.table, reference.column.clone()));
    }
    let related_table = keyword_table(&column.name, matched_pattern)?;
    let name_column = registry.schema(related_table).name_column()?;
    Some((related_table, name_column.name.clone()))
}

/// Table suggested by keywords in a column name or pattern.
pub fn keyword_table(column_name: &str, matched_pattern: &str) -> Option<TargetTable> {
    let words: BTreeSet<String> = normalize_text(column_name)
        .split_whitespace()
        .chain(matched_pattern.split_whitespace())
        .map(str::to_string)
        .collect();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| words.contains(*keyword))
        .map(|(_, table)| *table)
}

//! Field-to-column assignment for one target table.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use sheetmap_model::{
    ColumnMatch, FieldCategory, FieldMapping, FieldType, TransformationNeeded, UnmappedReason,
};
use sheetmap_standards::{TargetColumn, TargetSchema};
use tracing::debug;

use crate::categorize::CategorizedField;
use crate::score::round_score;

/// A field left out of a table mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// Position of the field in the input.
    pub index: usize,
    pub field: String,
    pub reason: UnmappedReason,
}

/// Outcome of mapping every field onto one table.
///
/// Every input field appears exactly once, either in `mappings` or in
/// `excluded`; both keep input order.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedFields {
    pub mappings: Vec<FieldMapping>,
    pub excluded: Vec<Exclusion>,
}

struct Claim<'a> {
    index: usize,
    column: &'a TargetColumn,
    matched: &'a ColumnMatch,
}

/// Maps fields onto the columns of `schema`.
///
/// A field's confidence is the confidence of its categorization for this
/// table. Each target column is assigned at most once: the more confident
/// field wins and input order breaks ties.
pub fn map_fields(
    schema: &TargetSchema,
    fields: &[CategorizedField],
    min_field_confidence: f64,
) -> MappedFields {
    let table = schema.table;
    let mut reasons: Vec<Option<UnmappedReason>> = vec![None; fields.len()];
    let mut claims: Vec<Claim<'_>> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(matched) = field.category.match_for(table) else {
            reasons[index] = Some(exclusion_reason(&field.category));
            continue;
        };
        match schema.column(&matched.column) {
            Some(_) if matched.score() < min_field_confidence => {
                reasons[index] = Some(UnmappedReason::BelowConfidenceFloor);
            }
            Some(column) => claims.push(Claim {
                index,
                column,
                matched,
            }),
            // A supplied category naming a column this schema does not have.
            None => reasons[index] = Some(UnmappedReason::NoPatternMatch),
        }
    }

    claims.sort_by(|a, b| {
        b.matched
            .score()
            .partial_cmp(&a.matched.score())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });

    let mut assigned: BTreeSet<&str> = BTreeSet::new();
    let mut accepted: Vec<Option<FieldMapping>> = vec![None; fields.len()];
    for claim in claims {
        let field = &fields[claim.index];
        if !assigned.insert(claim.column.name.as_str()) {
            debug!(
                field = %field.name,
                column = %claim.column.name,
                "target column already mapped"
            );
            reasons[claim.index] = Some(UnmappedReason::TargetAlreadyMapped);
            continue;
        }
        accepted[claim.index] = Some(FieldMapping {
            source_field: field.name.clone(),
            target_field: claim.column.name.clone(),
            confidence: round_score(claim.matched.score()),
            transformation_needed: transformation_for(
                claim.column.data_type,
                field.inferred.data_type,
                field.needs_trim,
            ),
        });
    }

    let mut mappings = Vec::new();
    let mut excluded = Vec::new();
    for (index, (mapping, reason)) in accepted.into_iter().zip(reasons).enumerate() {
        match (mapping, reason) {
            (Some(mapping), _) => mappings.push(mapping),
            (None, reason) => excluded.push(Exclusion {
                index,
                field: fields[index].name.clone(),
                reason: reason.unwrap_or(UnmappedReason::NoPatternMatch),
            }),
        }
    }
    MappedFields { mappings, excluded }
}

/// Reason a field without a candidate for the chosen table is excluded.
fn exclusion_reason(category: &FieldCategory) -> UnmappedReason {
    match category {
        FieldCategory::Unknown => UnmappedReason::NoPatternMatch,
        FieldCategory::Ambiguous { .. } => UnmappedReason::AmbiguousCategory,
        FieldCategory::Inventory(_)
        | FieldCategory::Vendor(_)
        | FieldCategory::PurchaseOrder(_)
        | FieldCategory::SalesOrder(_) => UnmappedReason::OtherTable,
    }
}

/// Coercion needed to write a value of `inferred` type into a `declared` column.
///
/// Date columns always need parsing: sheet dates arrive as text in mixed
/// formats and are normalized on write.
pub fn transformation_for(
    declared: FieldType,
    inferred: FieldType,
    needs_trim: bool,
) -> TransformationNeeded {
    match declared {
        FieldType::Date => TransformationNeeded::ParseDate,
        FieldType::Integer | FieldType::Decimal => match inferred {
            FieldType::Integer => TransformationNeeded::None,
            FieldType::Decimal if declared == FieldType::Decimal => TransformationNeeded::None,
            _ => TransformationNeeded::ParseNumber,
        },
        FieldType::String | FieldType::Identifier => {
            if !inferred.is_textual() {
                TransformationNeeded::Stringify
            } else if needs_trim {
                TransformationNeeded::TrimString
            } else {
                TransformationNeeded::None
            }
        }
        FieldType::Boolean => match inferred {
            FieldType::Boolean | FieldType::String | FieldType::Identifier => {
                TransformationNeeded::None
            }
            FieldType::Integer | FieldType::Decimal | FieldType::Date => {
                TransformationNeeded::Stringify
            }
        },
    }
}

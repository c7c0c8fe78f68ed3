//! Table classification from categorized fields.

use std::cmp::Ordering;

use sheetmap_model::TargetTable;
use tracing::debug;

use crate::categorize::CategorizedField;
use crate::score::round_score;

const REASONING_DRIVERS: usize = 3;

/// Evidence collected for one candidate table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableScore {
    pub table: TargetTable,
    /// Sum of the confidences of every field offering this table.
    pub score: f64,
    pub matched: usize,
    pub unmatched: usize,
    /// Matched fields that were ambiguous between this and other tables.
    pub ambiguous: usize,
    /// `score / total_fields`, clamped to `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
}

/// All four tables ranked best first.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub ranked: Vec<TableScore>,
}

impl Classification {
    pub fn best(&self) -> &TableScore {
        &self.ranked[0]
    }

    /// Tables with any supporting evidence, always including the best one.
    pub fn candidates(&self) -> impl Iterator<Item = &TableScore> {
        self.ranked
            .iter()
            .enumerate()
            .filter(|(idx, score)| *idx == 0 || round_score(score.score) > 0.0)
            .map(|(_, score)| score)
    }
}

/// Ranks every target table for a set of categorized fields.
///
/// Scores are compared at reporting precision. Equal scores prefer the table
/// with fewer unmatched fields, then the fixed table priority.
pub fn classify(fields: &[CategorizedField]) -> Classification {
    let total = fields.len();
    let mut ranked: Vec<TableScore> = TargetTable::ALL
        .iter()
        .map(|&table| score_table(table, fields))
        .collect();

    ranked.sort_by(|a, b| {
        round_score(b.score)
            .total_cmp(&round_score(a.score))
            .then_with(|| a.unmatched.cmp(&b.unmatched))
            .then_with(|| a.table.cmp(&b.table))
    });

    for score in &ranked {
        debug!(
            table = %score.table,
            score = score.score,
            matched = score.matched,
            total,
            "table score"
        );
    }
    Classification { ranked }
}

fn score_table(table: TargetTable, fields: &[CategorizedField]) -> TableScore {
    let total = fields.len();
    let mut score = 0.0;
    let mut matched = 0;
    let mut ambiguous = 0;
    let mut drivers: Vec<(&str, &str, f64)> = Vec::new();

    for field in fields {
        let Some(column) = field.category.match_for(table) else {
            continue;
        };
        score += column.score();
        matched += 1;
        if field.category.is_ambiguous() {
            ambiguous += 1;
        }
        drivers.push((field.name.as_str(), column.column.as_str(), column.score()));
    }

    let confidence = if total == 0 {
        0.0
    } else {
        (score / total as f64).clamp(0.0, 1.0)
    };

    TableScore {
        table,
        score,
        matched,
        unmatched: total - matched,
        ambiguous,
        confidence,
        reasoning: reasoning(table, matched, total, ambiguous, drivers),
    }
}

fn reasoning(
    table: TargetTable,
    matched: usize,
    total: usize,
    ambiguous: usize,
    mut drivers: Vec<(&str, &str, f64)>,
) -> String {
    if matched == 0 {
        return format!(
            "no field matched any {table} pattern; {table} is reported by table priority only"
        );
    }

    // Stable sort keeps input order among equal confidences.
    drivers.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));
    let including = drivers
        .iter()
        .take(REASONING_DRIVERS)
        .map(|(field, column, _)| format!("'{field}'→{column}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut text = format!("matched {matched}/{total} fields to {table} patterns, including {including}");
    if ambiguous > 0 {
        let noun = if ambiguous == 1 { "field" } else { "fields" };
        text.push_str(&format!(
            "; {ambiguous} ambiguous {noun} also matched other tables and counted at reduced confidence"
        ));
    }
    text
}

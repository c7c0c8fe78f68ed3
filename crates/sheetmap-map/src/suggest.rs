//! Ranked alternative columns for unmapped fields.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use sheetmap_model::{SuggestedField, TargetTable};
use sheetmap_standards::{SchemaRegistry, normalize_text};

use crate::options::MappingOptions;
use crate::score::{ScoredText, round_score, similarity};

/// One vocabulary entry: a column name or one of its patterns.
#[derive(Debug, Clone)]
struct Term {
    table: TargetTable,
    column_index: usize,
    column: String,
    text: ScoredText,
}

/// Fuzzy lookup of target columns by header text.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    terms: Vec<Term>,
    floor: f64,
    cap: usize,
}

impl SuggestionEngine {
    pub fn new(registry: &SchemaRegistry, options: &MappingOptions) -> Self {
        let mut terms = Vec::new();
        for schema in registry.tables() {
            for (column_index, column) in schema.columns.iter().enumerate() {
                let names = std::iter::once(column.display_name())
                    .chain(column.patterns.iter().map(|pattern| pattern.text.clone()));
                for text in names {
                    terms.push(Term {
                        table: schema.table,
                        column_index,
                        column: column.name.clone(),
                        text: ScoredText::new(text),
                    });
                }
            }
        }
        Self {
            terms,
            floor: options.similarity_floor,
            cap: options.max_suggestions,
        }
    }

    /// Suggests columns for `header`.
    ///
    /// Searches `preferred` first and broadens to every table when nothing
    /// there clears the similarity floor. Results are sorted by similarity,
    /// then table priority, then column order, with at most one entry per
    /// column.
    pub fn suggest(&self, header: &str, preferred: Option<TargetTable>) -> Vec<SuggestedField> {
        let header = ScoredText::new(normalize_text(header));
        if header.text.is_empty() || self.cap == 0 {
            return Vec::new();
        }
        if let Some(table) = preferred {
            let within = self.rank(&header, |candidate| candidate == table);
            if !within.is_empty() {
                return within;
            }
        }
        self.rank(&header, |_| true)
    }

    fn rank(&self, header: &ScoredText, include: impl Fn(TargetTable) -> bool) -> Vec<SuggestedField> {
        let mut best: BTreeMap<(TargetTable, usize), (f64, &str)> = BTreeMap::new();
        for term in self.terms.iter().filter(|term| include(term.table)) {
            let score = similarity(header, &term.text);
            let entry = best
                .entry((term.table, term.column_index))
                .or_insert((score, term.column.as_str()));
            if score > entry.0 {
                entry.0 = score;
            }
        }

        let mut ranked: Vec<((TargetTable, usize), (f64, &str))> = best
            .into_iter()
            .filter(|(_, (score, _))| *score >= self.floor)
            .collect();
        // BTreeMap order already sorts ties by table priority, then column.
        ranked.sort_by(|a, b| b.1.0.partial_cmp(&a.1.0).unwrap_or(Ordering::Equal));
        ranked
            .into_iter()
            .take(self.cap)
            .map(|((table, _), (score, column))| SuggestedField {
                field: column.to_string(),
                table,
                similarity: round_score(score),
            })
            .collect()
    }
}

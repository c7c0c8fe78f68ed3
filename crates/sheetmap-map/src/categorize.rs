//! Header categorization against the pattern dictionary.

use std::collections::BTreeMap;

use sheetmap_model::{CategoryCandidate, ColumnMatch, FieldCategory, TargetTable};
use sheetmap_standards::text::{compact, tokens};
use sheetmap_standards::{PatternEntry, SchemaRegistry, normalize_text};
use tracing::debug;

use crate::inference::TypeInference;
use crate::options::MappingOptions;

/// A source field with everything the later stages need to know about it.
#[derive(Debug, Clone)]
pub struct CategorizedField {
    pub name: String,
    pub category: FieldCategory,
    pub inferred: TypeInference,
    /// Whether any text sample carries leading or trailing whitespace.
    pub needs_trim: bool,
}

/// Maps free-text headers onto (table, column) pairs.
#[derive(Debug, Clone, Copy)]
pub struct Categorizer<'a> {
    registry: &'a SchemaRegistry,
    min_pattern_len: usize,
    ambiguity_penalty: f64,
}

/// Best match found in one table.
struct TableHit<'a> {
    entry: PatternEntry<'a>,
    len: usize,
}

impl<'a> Categorizer<'a> {
    pub fn new(registry: &'a SchemaRegistry, options: &MappingOptions) -> Self {
        Self {
            registry,
            min_pattern_len: options.min_pattern_len,
            ambiguity_penalty: options.ambiguity_penalty,
        }
    }

    /// Categorizes one header.
    ///
    /// The longest matching pattern wins; within a table the first declared
    /// column wins a length tie. A tie on length between tables makes the
    /// header ambiguous, with every candidate's confidence penalized.
    pub fn categorize(&self, header: &str) -> FieldCategory {
        let normalized = normalize_text(header);
        if normalized.is_empty() {
            return FieldCategory::Unknown;
        }
        let header_tokens = tokens(&normalized);
        let header_compact = compact(&normalized);
        let header_len = normalized.chars().count();

        let mut hits: BTreeMap<TargetTable, TableHit<'_>> = BTreeMap::new();
        for entry in self.registry.patterns() {
            let len = entry.pattern.len();
            if len < self.min_pattern_len {
                continue;
            }
            let matched = contains_run(&header_tokens, &entry.pattern.tokens)
                || header_compact == entry.pattern.compact;
            if !matched {
                continue;
            }
            let better = hits.get(&entry.table).is_none_or(|hit| len > hit.len);
            if better {
                hits.insert(entry.table, TableHit { entry, len });
            }
        }

        let Some(longest) = hits.values().map(|hit| hit.len).max() else {
            return FieldCategory::Unknown;
        };
        let confidence = length_ratio(longest, header_len);
        let mut winners: Vec<(TargetTable, ColumnMatch)> = hits
            .into_iter()
            .filter(|(_, hit)| hit.len == longest)
            .map(|(table, hit)| {
                (
                    table,
                    ColumnMatch::new(
                        hit.entry.column.name.clone(),
                        hit.entry.pattern.text.clone(),
                        confidence,
                    ),
                )
            })
            .collect();

        if winners.len() == 1 {
            let (table, column) = winners.remove(0);
            return FieldCategory::matched(table, column);
        }

        let candidates: Vec<CategoryCandidate> = winners
            .into_iter()
            .map(|(table, mut column)| {
                column.confidence = column.confidence.map(|c| c * self.ambiguity_penalty);
                CategoryCandidate { table, column }
            })
            .collect();
        let category = FieldCategory::Ambiguous { candidates };
        debug!(header, candidates = %category.describe(), "ambiguous header");
        category
    }

    /// Fills in the confidence of every candidate of a category supplied by
    /// the caller, using the same length ratio [`Self::categorize`] reports.
    /// Candidates that already carry a confidence are left alone.
    pub fn score_supplied(&self, header: &str, category: FieldCategory) -> FieldCategory {
        let header_len = normalize_text(header).chars().count();
        let penalty = if category.is_ambiguous() {
            self.ambiguity_penalty
        } else {
            1.0
        };
        let score = |mut column: ColumnMatch| {
            if column.confidence.is_none() {
                let pattern_len = normalize_text(&column.matched_pattern).chars().count();
                column.confidence = Some(length_ratio(pattern_len, header_len) * penalty);
            }
            column
        };
        match category {
            FieldCategory::Inventory(column) => FieldCategory::Inventory(score(column)),
            FieldCategory::Vendor(column) => FieldCategory::Vendor(score(column)),
            FieldCategory::PurchaseOrder(column) => FieldCategory::PurchaseOrder(score(column)),
            FieldCategory::SalesOrder(column) => FieldCategory::SalesOrder(score(column)),
            FieldCategory::Ambiguous { candidates } => FieldCategory::Ambiguous {
                candidates: candidates
                    .into_iter()
                    .map(|candidate| CategoryCandidate {
                        table: candidate.table,
                        column: score(candidate.column),
                    })
                    .collect(),
            },
            FieldCategory::Unknown => FieldCategory::Unknown,
        }
    }
}

fn length_ratio(pattern_len: usize, header_len: usize) -> f64 {
    if header_len == 0 {
        return 0.0;
    }
    (pattern_len as f64 / header_len as f64).clamp(0.0, 1.0)
}

/// True when `needle` occurs as a contiguous run inside `haystack`.
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

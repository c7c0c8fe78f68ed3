//! Similarity scoring between normalized header text and dictionary terms.
//!
//! Combines token-set Jaccard overlap (robust to word order and extra words)
//! with normalized Levenshtein similarity (robust to typos), taking the max.

use std::collections::BTreeSet;

use rapidfuzz::distance::levenshtein;

/// Normalized text with its token set, ready for repeated comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredText {
    pub text: String,
    pub tokens: BTreeSet<String>,
}

impl ScoredText {
    /// Wraps text that is already normalized.
    pub fn new(normalized: String) -> Self {
        let tokens = normalized.split_whitespace().map(str::to_string).collect();
        Self {
            text: normalized,
            tokens,
        }
    }
}

/// Token-set Jaccard overlap.
pub fn token_jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Similarity in `[0, 1]` of two normalized strings.
pub fn similarity(a: &ScoredText, b: &ScoredText) -> f64 {
    if a.text.is_empty() || b.text.is_empty() {
        return 0.0;
    }
    let edit = levenshtein::normalized_similarity(a.text.chars(), b.text.chars());
    token_jaccard(&a.tokens, &b.tokens).max(edit).clamp(0.0, 1.0)
}

/// Rounds a reported score to four decimals so serialized output stays short
/// and stable.
pub fn round_score(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

//! Field type inference from sample values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sheetmap_model::{CellValue, FieldType};

const BOOLEAN_LITERALS: [&str; 8] = ["true", "false", "yes", "no", "y", "n", "t", "f"];
const CURRENCY_SYMBOLS: [char; 6] = ['$', '€', '£', '¥', '₹', '৳'];
const IDENTIFIER_PUNCTUATION: [char; 5] = ['-', '_', '/', '.', '#'];

const DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Order in which candidate types are tried.
const CANDIDATES: [FieldType; 5] = [
    FieldType::Boolean,
    FieldType::Integer,
    FieldType::Decimal,
    FieldType::Date,
    FieldType::Identifier,
];

/// Inferred type and the share of samples supporting it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeInference {
    pub data_type: FieldType,
    pub confidence: f64,
}

impl TypeInference {
    /// A type taken as given, with no sample evidence behind it.
    pub fn declared(data_type: FieldType) -> Self {
        Self {
            data_type,
            confidence: 0.0,
        }
    }
}

/// Infers the primitive type of a column from its samples.
///
/// Blank samples are ignored. The first candidate type (boolean, integer,
/// decimal, date, identifier) parsed by strictly more than `majority` of the
/// remaining samples wins; otherwise the column is a string whose confidence
/// is one minus the best candidate share. Never fails.
pub fn infer_field_type<'a, I>(samples: I, majority: f64) -> TypeInference
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let present: Vec<&CellValue> = samples.into_iter().filter(|v| !v.is_blank()).collect();
    if present.is_empty() {
        return TypeInference::declared(FieldType::String);
    }

    let total = present.len() as f64;
    let mut best_share = 0.0_f64;
    for candidate in CANDIDATES {
        let parsed = present
            .iter()
            .filter(|value| parses_as(value, candidate))
            .count();
        let share = parsed as f64 / total;
        if share > majority {
            return TypeInference {
                data_type: candidate,
                confidence: share,
            };
        }
        best_share = best_share.max(share);
    }

    TypeInference {
        data_type: FieldType::String,
        confidence: 1.0 - best_share,
    }
}

/// Whether a single value parses as `data_type`.
pub fn parses_as(value: &CellValue, data_type: FieldType) -> bool {
    match (value, data_type) {
        (CellValue::Null, _) => false,
        (CellValue::Bool(_), FieldType::Boolean) => true,
        (CellValue::Bool(_), _) => false,
        (CellValue::Number(n), FieldType::Integer) => n.is_finite() && n.fract() == 0.0,
        (CellValue::Number(n), FieldType::Decimal) => n.is_finite(),
        (CellValue::Number(_), _) => false,
        (CellValue::Text(text), data_type) => {
            let text = text.trim();
            match data_type {
                FieldType::Boolean => is_boolean(text),
                FieldType::Integer => is_integer(text),
                FieldType::Decimal => is_decimal(text),
                FieldType::Date => is_date(text),
                FieldType::Identifier => is_identifier(text),
                FieldType::String => true,
            }
        }
    }
}

fn is_boolean(text: &str) -> bool {
    let lower = text.to_lowercase();
    BOOLEAN_LITERALS.contains(&lower.as_str())
}

fn is_integer(text: &str) -> bool {
    strip_grouping(text).is_some_and(|plain| plain.parse::<i64>().is_ok())
}

fn is_decimal(text: &str) -> bool {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let rest = rest
        .strip_prefix(CURRENCY_SYMBOLS)
        .map_or(rest, str::trim_start);
    let Some(plain) = strip_grouping(rest) else {
        return false;
    };
    let is_plain = plain.chars().any(|c| c.is_ascii_digit())
        && plain
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    is_plain && format!("{sign}{plain}").parse::<f64>().is_ok()
}

/// Removes thousands separators, rejecting misplaced commas.
fn strip_grouping(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    if !text.contains(',') {
        return Some(text.to_string());
    }
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    let mut groups = integer.split(',');
    let lead = groups.next()?.trim_start_matches(['+', '-']);
    if lead.is_empty() || lead.len() > 3 || !lead.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }
    let mut plain = integer.replace(',', "");
    if let Some(fraction) = fraction {
        plain.push('.');
        plain.push_str(fraction);
    }
    Some(plain)
}

fn is_date(text: &str) -> bool {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(text, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
        || DateTime::parse_from_rfc3339(text).is_ok()
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.chars().any(char::is_alphabetic)
        && text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || IDENTIFIER_PUNCTUATION.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    fn infer(values: &[&str]) -> TypeInference {
        infer_field_type(&texts(values), 0.5)
    }

    #[test]
    fn no_samples_is_string_with_zero_confidence() {
        let inferred = infer_field_type(&[CellValue::Null, CellValue::from("  ")], 0.5);
        assert_eq!(inferred.data_type, FieldType::String);
        assert_eq!(inferred.confidence, 0.0);
    }

    #[test]
    fn integers_and_decimals() {
        assert_eq!(infer(&["85000", "12000", "18000"]).data_type, FieldType::Integer);
        assert_eq!(infer(&["1,200", "3,450,000"]).data_type, FieldType::Integer);
        assert_eq!(infer(&["12.50", "$1,299.99", "7"]).data_type, FieldType::Decimal);
        assert_eq!(infer(&["-4.5", "৳ 300"]).data_type, FieldType::Decimal);
        assert_eq!(infer(&["1,2,3", "x"]).data_type, FieldType::String);
    }

    #[test]
    fn native_cells_count() {
        let values = [CellValue::Number(3.0), CellValue::Number(4.5), CellValue::Bool(true)];
        let inferred = infer_field_type(&values, 0.5);
        assert_eq!(inferred.data_type, FieldType::Decimal);
        assert!((inferred.confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn dates_in_mixed_formats() {
        let inferred = infer(&["2025-01-15", "16/01/2025", "Jan 20, 2025", "2025-01-15T10:30:00Z"]);
        assert_eq!(inferred.data_type, FieldType::Date);
        assert_eq!(inferred.confidence, 1.0);
    }

    #[test]
    fn identifiers() {
        assert_eq!(infer(&["P001", "P002", "P003"]).data_type, FieldType::Identifier);
        assert_eq!(infer(&["PO-2025-001", "PO-2025-002"]).data_type, FieldType::Identifier);
        assert_eq!(infer(&["Samsung Galaxy S23", "Office Desk"]).data_type, FieldType::String);
    }

    #[test]
    fn booleans() {
        assert_eq!(infer(&["Yes", "no", "Y"]).data_type, FieldType::Boolean);
    }

    #[test]
    fn half_is_not_a_majority() {
        let inferred = infer(&["12", "twelve"]);
        assert_eq!(inferred.data_type, FieldType::String);
        assert_eq!(inferred.confidence, 0.5);
    }

    #[test]
    fn free_text_is_confident_string() {
        let inferred = infer(&["Latest model with 5G support", "Ergonomic design"]);
        assert_eq!(inferred.data_type, FieldType::String);
        assert_eq!(inferred.confidence, 1.0);
    }
}

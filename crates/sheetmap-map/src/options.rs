//! Engine tuning knobs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sheetmap_model::ConfidenceThresholds;

use crate::error::MappingError;

/// Tuning for every stage of the pipeline.
///
/// Deserializes from the `[mapping]` table of a TOML config file; missing
/// keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Share of parseable samples a type needs to win (strictly greater).
    pub type_majority: f64,
    /// Minimum similarity for a suggestion to be reported.
    pub similarity_floor: f64,
    pub max_suggestions: usize,
    /// Patterns shorter than this (in characters) never match.
    pub min_pattern_len: usize,
    /// Multiplier applied to every candidate of an ambiguous header.
    pub ambiguity_penalty: f64,
    /// Field mappings below this confidence are reported as unmapped.
    pub min_field_confidence: f64,
    /// Distinct sample values kept per field when building an analysis.
    pub sample_preview: usize,
    /// Sample rows kept when building an analysis.
    pub sample_rows: usize,
    pub thresholds: ConfidenceThresholds,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            type_majority: 0.5,
            similarity_floor: 0.3,
            max_suggestions: 3,
            min_pattern_len: 3,
            ambiguity_penalty: 0.8,
            min_field_confidence: 0.3,
            sample_preview: 5,
            sample_rows: 10,
            thresholds: ConfidenceThresholds::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mapping: MappingOptions,
}

impl MappingOptions {
    /// Fewer, more certain mappings.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            similarity_floor: 0.4,
            min_field_confidence: 0.5,
            thresholds: ConfidenceThresholds::strict(),
            ..Self::default()
        }
    }

    /// More mappings and suggestions, for exploratory review.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            similarity_floor: 0.25,
            max_suggestions: 5,
            min_field_confidence: 0.2,
            thresholds: ConfidenceThresholds::relaxed(),
            ..Self::default()
        }
    }

    /// Parse the `[mapping]` table of a TOML document.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, MappingError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| MappingError::Config {
            path: origin.to_path_buf(),
            source,
        })?;
        file.mapping.validate()?;
        Ok(file.mapping)
    }

    /// Load options from a TOML config file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Rejects values outside their meaningful ranges.
    pub fn validate(&self) -> Result<(), MappingError> {
        let unit = [
            ("type_majority", self.type_majority),
            ("similarity_floor", self.similarity_floor),
            ("ambiguity_penalty", self.ambiguity_penalty),
            ("min_field_confidence", self.min_field_confidence),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(MappingError::InvalidOption {
                    name,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }
        if self.sample_preview == 0 {
            return Err(MappingError::InvalidOption {
                name: "sample_preview",
                reason: "must keep at least one sample".to_string(),
            });
        }
        let t = &self.thresholds;
        if !(t.low <= t.medium && t.medium <= t.high) {
            return Err(MappingError::InvalidOption {
                name: "thresholds",
                reason: format!("expected low <= medium <= high, got {}/{}/{}", t.low, t.medium, t.high),
            });
        }
        Ok(())
    }
}

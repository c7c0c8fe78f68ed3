//! Mapping engine: one entry point over the whole pipeline.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use sheetmap_model::{
    CellValue, CollectionAnalysis, FieldCategory, MappingResult, Record, SuggestedField,
    TableMapping, TargetTable, UnmappedField,
};
use sheetmap_standards::SchemaRegistry;
use tracing::{debug, info, warn};

use crate::analysis::analyze_records;
use crate::categorize::{CategorizedField, Categorizer};
use crate::classify::classify;
use crate::error::MappingError;
use crate::inference::{TypeInference, infer_field_type};
use crate::mapper::{Exclusion, map_fields};
use crate::options::MappingOptions;
use crate::relationships::detect_relationships;
use crate::score::round_score;
use crate::suggest::SuggestionEngine;

/// Anything that turns a collection analysis into a mapping result.
///
/// The rule-based [`MappingEngine`] implements it; alternative engines share
/// the same input and output contract.
pub trait TableMapper {
    fn map(&self, analysis: &CollectionAnalysis) -> Result<MappingResult, MappingError>;
}

/// Rule-based engine classifying a sheet and mapping its columns.
///
/// Holds no per-call state: the registry and options are read-only, so one
/// engine can serve any number of threads.
///
/// # Example
///
/// ```ignore
/// use sheetmap_map::{MappingEngine, MappingOptions};
/// use sheetmap_standards::SchemaRegistry;
///
/// let registry = SchemaRegistry::builtin()?;
/// let engine = MappingEngine::new(&registry, MappingOptions::default());
/// let result = engine.map(&analysis)?;
/// println!("{}", result.tables[0].table_name);
/// ```
#[derive(Debug, Clone)]
pub struct MappingEngine<'a> {
    registry: &'a SchemaRegistry,
    options: MappingOptions,
    categorizer: Categorizer<'a>,
    suggestions: SuggestionEngine,
}

impl<'a> MappingEngine<'a> {
    pub fn new(registry: &'a SchemaRegistry, options: MappingOptions) -> Self {
        let categorizer = Categorizer::new(registry, &options);
        let suggestions = SuggestionEngine::new(registry, &options);
        Self {
            registry,
            options,
            categorizer,
            suggestions,
        }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Categorizes a single header.
    pub fn categorize_field(&self, header: &str) -> FieldCategory {
        self.categorizer.categorize(header)
    }

    /// Suggests target columns for a header, preferring `table` when given.
    pub fn suggest(&self, header: &str, table: Option<TargetTable>) -> Vec<SuggestedField> {
        self.suggestions.suggest(header, table)
    }

    /// Builds the analysis of a parsed sheet.
    pub fn analyze(
        &self,
        collection_name: &str,
        headers: &[String],
        records: &[Record],
    ) -> CollectionAnalysis {
        analyze_records(
            collection_name,
            headers,
            records,
            &self.categorizer,
            &self.options,
        )
    }

    /// Classifies the collection and maps its fields.
    ///
    /// `tables` holds every table with supporting evidence, best first, and
    /// always at least one entry. Every input field is either mapped in
    /// `tables[0]` or listed in `unmapped_fields`.
    ///
    /// # Errors
    ///
    /// Fails only when the analysis is structurally unusable (see
    /// [`CollectionAnalysis::validate`]).
    pub fn map(&self, analysis: &CollectionAnalysis) -> Result<MappingResult, MappingError> {
        analysis.validate()?;
        if analysis.sample_data.is_empty() {
            warn!(
                collection = %analysis.collection_name,
                "no sample rows; relying on per-field samples"
            );
        }

        let fields = self.prepare(analysis);
        let classification = classify(&fields);
        let best = classification.best().table;

        let mut tables = Vec::new();
        let mut excluded: Vec<Exclusion> = Vec::new();
        for score in classification.candidates() {
            let schema = self.registry.schema(score.table);
            let mapped = map_fields(schema, &fields, self.options.min_field_confidence);
            let relationships =
                detect_relationships(self.registry, score.table, &fields, &mapped.mappings);
            if score.table == best {
                excluded = mapped.excluded;
            }
            tables.push(TableMapping {
                table_name: score.table,
                confidence: round_score(score.confidence),
                reasoning: score.reasoning.clone(),
                field_mappings: mapped.mappings,
                relationships,
            });
        }

        let unmapped_fields: Vec<UnmappedField> = excluded
            .into_iter()
            .map(|exclusion| UnmappedField {
                suggestions: self.suggestions.suggest(&exclusion.field, Some(best)),
                field_name: exclusion.field,
                reason: exclusion.reason,
            })
            .collect();

        let chosen = &tables[0];
        info!(
            collection = %analysis.collection_name,
            table = %chosen.table_name,
            confidence = chosen.confidence,
            mapped = chosen.field_mappings.len(),
            unmapped = unmapped_fields.len(),
            "classified collection"
        );

        Ok(MappingResult {
            tables,
            unmapped_fields,
        })
    }

    /// Infers types and categories for every field.
    ///
    /// Per-field samples take precedence over sample rows; a field with no
    /// samples at all keeps its declared type. A category supplied with the
    /// field is kept; candidates that arrive without a confidence are scored
    /// against the header.
    fn prepare(&self, analysis: &CollectionAnalysis) -> Vec<CategorizedField> {
        analysis
            .fields
            .iter()
            .map(|field| {
                let samples: Vec<&CellValue> = if field.present_samples().next().is_some() {
                    field.sample_values.iter().collect()
                } else {
                    analysis
                        .sample_data
                        .iter()
                        .filter_map(|record| record.get(&field.field_name))
                        .collect()
                };
                let inferred = if samples.iter().any(|value| !value.is_blank()) {
                    infer_field_type(samples.iter().copied(), self.options.type_majority)
                } else {
                    TypeInference::declared(field.data_type)
                };
                let needs_trim = samples.iter().any(|value| {
                    value
                        .as_text()
                        .is_some_and(|text| !text.trim().is_empty() && text.trim() != text)
                });
                let category = match &field.field_category {
                    Some(supplied) => self
                        .categorizer
                        .score_supplied(&field.field_name, supplied.clone()),
                    None => self.categorizer.categorize(&field.field_name),
                };
                debug!(
                    field = %field.field_name,
                    data_type = %inferred.data_type,
                    category = %category.describe(),
                    "categorized field"
                );
                CategorizedField {
                    name: field.field_name.clone(),
                    category,
                    inferred,
                    needs_trim,
                }
            })
            .collect()
    }
}

impl TableMapper for MappingEngine<'_> {
    fn map(&self, analysis: &CollectionAnalysis) -> Result<MappingResult, MappingError> {
        MappingEngine::map(self, analysis)
    }
}

/// Maps several sheets of one upload independently.
///
/// Results keep the input order. With the `parallel` feature the sheets are
/// mapped on the rayon thread pool.
pub fn map_collections<M>(
    mapper: &M,
    analyses: &[CollectionAnalysis],
) -> Vec<Result<MappingResult, MappingError>>
where
    M: TableMapper + Sync + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        analyses.par_iter().map(|analysis| mapper.map(analysis)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        analyses.iter().map(|analysis| mapper.map(analysis)).collect()
    }
}

#[cfg(test)]
mod tests {
    use sheetmap_model::{FieldInfo, FieldType, UnmappedReason};

    use super::*;

    fn analysis(fields: Vec<FieldInfo>) -> CollectionAnalysis {
        CollectionAnalysis {
            collection_name: "sheet".to_string(),
            total_documents: 2,
            sample_data: Vec::new(),
            fields,
        }
    }

    #[test]
    fn per_field_samples_are_enough() {
        let registry = SchemaRegistry::builtin().unwrap();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let input = analysis(vec![
            FieldInfo::new("Vendor", FieldType::String).with_samples(["ABC Electronics Ltd"]),
            FieldInfo::new("Website", FieldType::String).with_samples(["www.abc.com"]),
        ]);
        let result = engine.map(&input).unwrap();
        assert_eq!(result.tables[0].table_name, TargetTable::Vendor);
        assert_eq!(result.tables[0].field_mappings.len(), 2);
    }

    #[test]
    fn supplied_category_is_trusted() {
        let registry = SchemaRegistry::builtin().unwrap();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let category = engine.categorize_field("Sales platform");
        let input = analysis(vec![
            FieldInfo::new("Channel of sale", FieldType::String)
                .with_samples(["Daraz"])
                .with_category(category),
        ]);
        let result = engine.map(&input).unwrap();
        assert_eq!(result.tables[0].table_name, TargetTable::SalesOrder);
        assert_eq!(result.tables[0].field_mappings[0].target_field, "platform");
    }

    #[test]
    fn padded_text_needs_trimming() {
        let registry = SchemaRegistry::builtin().unwrap();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let input = analysis(vec![
            FieldInfo::new("Vendor", FieldType::String).with_samples([" ABC Electronics Ltd "]),
        ]);
        let result = engine.map(&input).unwrap();
        assert_eq!(
            result.tables[0].field_mappings[0].transformation_needed,
            sheetmap_model::TransformationNeeded::TrimString
        );
    }

    #[test]
    fn validation_errors_propagate() {
        let registry = SchemaRegistry::builtin().unwrap();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let err = engine.map(&analysis(Vec::new())).unwrap_err();
        assert!(matches!(err, MappingError::Validation(_)));
    }

    #[test]
    fn unknown_fields_report_no_pattern_match() {
        let registry = SchemaRegistry::builtin().unwrap();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let input = analysis(vec![
            FieldInfo::new("Vendor", FieldType::String).with_samples(["ABC"]),
            FieldInfo::new("Adress", FieldType::String).with_samples(["Dhaka"]),
        ]);
        let result = engine.map(&input).unwrap();
        let unmapped = &result.unmapped_fields[0];
        assert_eq!(unmapped.field_name, "Adress");
        assert_eq!(unmapped.reason, UnmappedReason::NoPatternMatch);
        assert_eq!(unmapped.suggestions[0].field, "address");
    }
}

//! Building a [`CollectionAnalysis`] from parsed sheet rows.

use sheetmap_model::{CellValue, CollectionAnalysis, FieldInfo, Record};

use crate::categorize::Categorizer;
use crate::inference::infer_field_type;
use crate::options::MappingOptions;

/// Describes every column of a parsed sheet.
///
/// `headers` fixes the field order (records are keyed maps and carry no
/// order). Each field gets its inferred type, up to `sample_preview` distinct
/// non-blank values and its categorization; at most `sample_rows` records are
/// kept as sample data, restricted to the declared headers.
pub fn analyze_records(
    collection_name: &str,
    headers: &[String],
    records: &[Record],
    categorizer: &Categorizer<'_>,
    options: &MappingOptions,
) -> CollectionAnalysis {
    let fields = headers
        .iter()
        .map(|header| {
            let values: Vec<&CellValue> = records.iter().filter_map(|r| r.get(header)).collect();
            let inferred = infer_field_type(values.iter().copied(), options.type_majority);

            let mut samples: Vec<CellValue> = Vec::new();
            for value in values {
                if samples.len() >= options.sample_preview {
                    break;
                }
                if !value.is_blank() && !samples.contains(value) {
                    samples.push(value.clone());
                }
            }

            FieldInfo::new(header.clone(), inferred.data_type)
                .with_samples(samples)
                .with_category(categorizer.categorize(header))
        })
        .collect();

    let sample_data = records
        .iter()
        .take(options.sample_rows)
        .map(|record| {
            record
                .iter()
                .filter(|(key, _)| headers.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Record>()
        })
        .collect();

    CollectionAnalysis {
        collection_name: collection_name.to_string(),
        total_documents: records.len(),
        sample_data,
        fields,
    }
}

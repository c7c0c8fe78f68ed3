//! Glue between parsed sheets and the mapping engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sheetmap_map::{MappingEngine, MappingError, MappingOptions, map_collections};
use sheetmap_model::{CollectionAnalysis, FieldCategory, MappingResult, SuggestedField};
use sheetmap_standards::SchemaRegistry;
use tracing::{info, info_span};

use crate::ingest::{Sheet, read_csv};

/// Built-in option presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Default,
    Strict,
    Relaxed,
}

impl Preset {
    pub fn options(self) -> MappingOptions {
        match self {
            Preset::Default => MappingOptions::default(),
            Preset::Strict => MappingOptions::strict(),
            Preset::Relaxed => MappingOptions::relaxed(),
        }
    }
}

/// Loads a custom target schema, or the built-in one.
pub fn load_registry(schema: Option<&Path>) -> Result<SchemaRegistry> {
    match schema {
        Some(path) => SchemaRegistry::load(path)
            .with_context(|| format!("load target schema {}", path.display())),
        None => SchemaRegistry::builtin().context("load built-in target schema"),
    }
}

/// Options from a config file when given, otherwise from the preset.
pub fn load_options(config: Option<&Path>, preset: Preset) -> Result<MappingOptions> {
    match config {
        Some(path) => Ok(MappingOptions::load(path)?),
        None => Ok(preset.options()),
    }
}

/// Outcome of mapping one sheet.
#[derive(Debug)]
pub struct SheetOutcome {
    pub analysis: CollectionAnalysis,
    pub result: Result<MappingResult, MappingError>,
}

impl SheetOutcome {
    pub fn name(&self) -> &str {
        &self.analysis.collection_name
    }
}

#[derive(Debug, Default)]
pub struct MapRun {
    pub sheets: Vec<SheetOutcome>,
}

impl MapRun {
    pub fn has_errors(&self) -> bool {
        self.sheets.iter().any(|sheet| sheet.result.is_err())
    }

    pub fn mapped(&self) -> impl Iterator<Item = (&SheetOutcome, &MappingResult)> {
        self.sheets
            .iter()
            .filter_map(|sheet| sheet.result.as_ref().ok().map(|result| (sheet, result)))
    }
}

/// Reads every file and maps each sheet independently.
///
/// Unreadable files abort the run; a sheet the engine rejects is recorded
/// as a failed outcome and the other sheets are still mapped.
pub fn map_files(engine: &MappingEngine<'_>, files: &[PathBuf]) -> Result<MapRun> {
    let sheets = files
        .iter()
        .map(|path| read_csv(path))
        .collect::<Result<Vec<Sheet>>>()?;
    Ok(map_sheets(engine, &sheets))
}

pub fn map_sheets(engine: &MappingEngine<'_>, sheets: &[Sheet]) -> MapRun {
    let analyses: Vec<CollectionAnalysis> = sheets
        .iter()
        .map(|sheet| {
            let _span = info_span!("analyze", sheet = %sheet.name).entered();
            engine.analyze(&sheet.name, &sheet.headers, &sheet.records)
        })
        .collect();
    let results = map_collections(engine, &analyses);

    let run = MapRun {
        sheets: analyses
            .into_iter()
            .zip(results)
            .map(|(analysis, result)| SheetOutcome { analysis, result })
            .collect(),
    };
    info!(
        sheets = run.sheets.len(),
        failed = run.sheets.iter().filter(|s| s.result.is_err()).count(),
        "mapping run complete"
    );
    run
}

/// JSON document for `map --json`: one entry per sheet, in input order.
pub fn run_to_json(run: &MapRun) -> Result<String> {
    let sheets: Vec<serde_json::Value> = run
        .sheets
        .iter()
        .map(|sheet| -> Result<serde_json::Value, serde_json::Error> {
            Ok(match &sheet.result {
                Ok(result) => serde_json::json!({
                    "collection": sheet.name(),
                    "result": serde_json::to_value(result)?,
                }),
                Err(error) => serde_json::json!({
                    "collection": sheet.name(),
                    "error": error.to_string(),
                }),
            })
        })
        .collect::<Result<_, serde_json::Error>>()?;
    Ok(serde_json::to_string_pretty(&sheets)?)
}

/// Categorization of a bare header, with suggestions when nothing matched.
#[derive(Debug, Clone)]
pub struct HeaderReport {
    pub header: String,
    pub category: FieldCategory,
    pub suggestions: Vec<SuggestedField>,
}

pub fn categorize_headers(engine: &MappingEngine<'_>, headers: &[String]) -> Vec<HeaderReport> {
    headers
        .iter()
        .map(|header| {
            let category = engine.categorize_field(header);
            let suggestions = if category.is_unknown() {
                engine.suggest(header, None)
            } else {
                Vec::new()
            };
            HeaderReport {
                header: header.clone(),
                category,
                suggestions,
            }
        })
        .collect()
}

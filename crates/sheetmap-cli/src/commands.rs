use anyhow::Result;
use sheetmap_cli::pipeline::{
    categorize_headers, load_options, load_registry, map_files, run_to_json,
};
use sheetmap_map::MappingEngine;

use crate::cli::{CategorizeArgs, MapArgs, SchemaArgs};
use crate::summary::{print_header_reports, print_map_summary, print_schema};

/// Maps every file; returns whether any sheet failed.
pub fn run_map(args: &MapArgs) -> Result<bool> {
    let registry = load_registry(args.engine.schema.as_deref())?;
    let options = load_options(args.engine.config.as_deref(), args.engine.preset())?;
    let engine = MappingEngine::new(&registry, options);

    let run = map_files(&engine, &args.files)?;
    if args.json {
        println!("{}", run_to_json(&run)?);
    } else {
        print_map_summary(&run, engine.options());
    }
    Ok(run.has_errors())
}

pub fn run_categorize(args: &CategorizeArgs) -> Result<()> {
    let registry = load_registry(args.engine.schema.as_deref())?;
    let options = load_options(args.engine.config.as_deref(), args.engine.preset())?;
    let engine = MappingEngine::new(&registry, options);
    print_header_reports(&categorize_headers(&engine, &args.headers));
    Ok(())
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let registry = load_registry(args.schema.as_deref())?;
    print_schema(&registry);
    Ok(())
}

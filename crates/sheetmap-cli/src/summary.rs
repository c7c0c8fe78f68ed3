use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use sheetmap_cli::pipeline::{HeaderReport, MapRun, SheetOutcome};
use sheetmap_map::MappingOptions;
use sheetmap_model::{
    ConfidenceLevel, ConfidenceThresholds, FieldCategory, MappingResult, SuggestedField,
    TransformationNeeded,
};
use sheetmap_standards::SchemaRegistry;

pub fn print_map_summary(run: &MapRun, options: &MappingOptions) {
    for sheet in &run.sheets {
        match &sheet.result {
            Ok(result) => print_sheet(sheet, result, &options.thresholds),
            Err(error) => eprintln!("error: sheet '{}': {error}", sheet.name()),
        }
    }
}

fn print_sheet(sheet: &SheetOutcome, result: &MappingResult, thresholds: &ConfidenceThresholds) {
    let Some(best) = result.best() else {
        return;
    };
    let level = thresholds.categorize(best.confidence);
    println!();
    println!(
        "Sheet '{}' ({} rows sampled, {} fields) -> {} [{:.4}, {}]",
        sheet.name(),
        sheet.analysis.sample_data.len(),
        sheet.analysis.fields.len(),
        best.table_name.label(),
        best.confidence,
        level_label(level),
    );
    println!("  {}", best.reasoning);

    if !best.field_mappings.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Source field"),
            header_cell("Target column"),
            header_cell("Confidence"),
            header_cell("Level"),
            header_cell("Transformation"),
        ]);
        for mapping in &best.field_mappings {
            table.add_row(vec![
                Cell::new(&mapping.source_field),
                Cell::new(&mapping.target_field)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(format!("{:.4}", mapping.confidence)),
                level_cell(thresholds.categorize(mapping.confidence)),
                transformation_cell(mapping.transformation_needed),
            ]);
        }
        apply_summary_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        println!("{table}");
        println!("  mapped: {}", level_counts_line(result, thresholds));
    }

    for relationship in &best.relationships {
        println!(
            "  relationship: {} -> {}.{}",
            relationship.key, relationship.related_table, relationship.related_field
        );
    }

    if !result.unmapped_fields.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Unmapped field"),
            header_cell("Reason"),
            header_cell("Suggestions"),
        ]);
        for unmapped in &result.unmapped_fields {
            table.add_row(vec![
                Cell::new(&unmapped.field_name).fg(Color::Yellow),
                dim_cell(unmapped.reason),
                suggestions_cell(&unmapped.suggestions),
            ]);
        }
        apply_table_style(&mut table);
        println!("{table}");
    }

    if result.tables.len() > 1 {
        let others: Vec<String> = result.tables[1..]
            .iter()
            .map(|table| format!("{} {:.4}", table.table_name, table.confidence))
            .collect();
        println!("  also considered: {}", others.join(", "));
    }
}

pub fn print_header_reports(reports: &[HeaderReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Category"),
        header_cell("Column"),
        header_cell("Pattern"),
        header_cell("Confidence"),
    ]);
    for report in reports {
        match &report.category {
            FieldCategory::Unknown => {
                table.add_row(vec![
                    Cell::new(&report.header),
                    Cell::new("unknown").fg(Color::Yellow),
                    dim_cell("-"),
                    dim_cell("-"),
                    suggestions_cell(&report.suggestions),
                ]);
            }
            category => {
                let ambiguous = category.is_ambiguous();
                for (table_name, column) in category.candidates() {
                    let label = if ambiguous {
                        Cell::new(format!("{table_name}?")).fg(Color::Magenta)
                    } else {
                        Cell::new(table_name).fg(Color::Blue)
                    };
                    table.add_row(vec![
                        Cell::new(&report.header),
                        label,
                        Cell::new(&column.column).add_attribute(Attribute::Bold),
                        dim_cell(&column.matched_pattern),
                        Cell::new(format!("{:.4}", column.score())),
                    ]);
                }
            }
        }
    }
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    println!("{table}");
}

pub fn print_schema(registry: &SchemaRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Patterns"),
        header_cell("References"),
    ]);
    for schema in registry.tables() {
        for (index, column) in schema.columns.iter().enumerate() {
            let table_cell = if index == 0 {
                Cell::new(format!("{}\n{}", schema.table, schema.label))
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            let patterns: Vec<&str> = column.patterns.iter().map(|p| p.text.as_str()).collect();
            let references = column
                .references
                .as_ref()
                .map(|r| format!("{}.{}", r.table, r.column))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                table_cell,
                Cell::new(&column.name).add_attribute(Attribute::Bold),
                Cell::new(column.data_type.as_str()),
                dim_cell(patterns.join(", ")),
                Cell::new(references),
            ]);
        }
    }
    apply_table_style(&mut table);
    println!("{table}");
    println!("{} patterns across {} tables", registry.pattern_count(), registry.tables().len());
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn level_label(level: Option<ConfidenceLevel>) -> &'static str {
    level.map_or("not confident", ConfidenceLevel::as_str)
}

fn level_counts_line(result: &MappingResult, thresholds: &ConfidenceThresholds) -> String {
    let counts = result.count_by_level(thresholds);
    [ConfidenceLevel::High, ConfidenceLevel::Medium, ConfidenceLevel::Low]
        .into_iter()
        .map(|level| format!("{} {}", counts.get(&level).copied().unwrap_or(0), level.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn level_cell(level: Option<ConfidenceLevel>) -> Cell {
    let color = match level {
        Some(ConfidenceLevel::High) => Color::Green,
        Some(ConfidenceLevel::Medium) => Color::Yellow,
        Some(ConfidenceLevel::Low) | None => Color::Red,
    };
    Cell::new(level_label(level)).fg(color)
}

fn transformation_cell(transformation: TransformationNeeded) -> Cell {
    match transformation {
        TransformationNeeded::None => dim_cell("-"),
        other => Cell::new(other).fg(Color::Magenta),
    }
}

fn suggestions_cell(suggestions: &[SuggestedField]) -> Cell {
    if suggestions.is_empty() {
        return dim_cell("-");
    }
    let text = suggestions
        .iter()
        .map(|s| format!("{}.{} ({:.2})", s.table, s.field, s.similarity))
        .collect::<Vec<_>>()
        .join("\n");
    Cell::new(text)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

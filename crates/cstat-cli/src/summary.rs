use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::DataFrame;

use cstat_ingest::preview_rows;
use cstat_model::{SourceDataset, StarTable, TableKind};
use cstat_transform::StarSchema;

use cstat_cli::pipeline::{BuildOutput, RunOutput, StageOutput};

pub fn print_stage(stage: &StageOutput, preview: Option<usize>) {
    println!(
        "{}: {} rows -> {} (staging table {})",
        stage.dataset,
        stage.data.height(),
        stage.path.display(),
        stage.dataset.staging_table()
    );
    if let Some(limit) = preview {
        print_preview(stage.dataset.label(), &stage.data, limit);
    }
}

pub fn print_build(build: &BuildOutput, preview: Option<usize>) {
    println!("Output: {}", build.output_dir.display());
    print_schema_table(&build.schema, &build.output_dir);
    print_imputation(&build.schema);
    if let Some(limit) = preview {
        for frame in build.schema.frames() {
            print_preview(frame.file_name(), &frame.data, limit);
        }
    }
}

pub fn print_run(run: &RunOutput, preview: Option<usize>) {
    for stage in &run.stages {
        print_stage(stage, preview);
    }
    println!();
    print_build(&run.build, preview);
}

fn print_schema_table(schema: &StarSchema, output_dir: &Path) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Kind"),
        header_cell("Records"),
        header_cell("File"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_records = 0usize;
    for frame in schema.frames() {
        total_records += frame.record_count();
        table.add_row(vec![
            Cell::new(frame.table.destination_table()),
            kind_cell(frame.table.kind()),
            Cell::new(frame.record_count()),
            Cell::new(output_dir.join(frame.file_name()).display()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_imputation(schema: &StarSchema) {
    let report = schema.report();
    println!(
        "Merged cohort rows: {}, imputed population totals: {}",
        report.merged_rows, report.imputation.imputed_groups
    );
    if report.imputation.undefined_groups > 0 {
        let countries: Vec<&str> = report
            .imputation
            .undefined_countries
            .iter()
            .map(String::as_str)
            .collect();
        eprintln!(
            "Warning: {} population totals left missing (no non-zero data): {}",
            report.imputation.undefined_groups,
            countries.join(", ")
        );
    }
}

fn print_preview(label: &str, data: &DataFrame, limit: usize) {
    let (headers, rows) = preview_rows(data, limit);
    let mut table = Table::new();
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(row);
    }
    println!();
    println!("{label} (first {} of {} rows):", limit.min(data.height()), data.height());
    println!("{table}");
}

/// The loader contract: which file goes into which table, and when.
pub fn print_tables() {
    print_sources();
    println!();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Load order"),
        header_cell("File"),
        header_cell("Destination table"),
        header_cell("Kind"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for star in StarTable::in_load_order() {
        let columns = std::iter::once("id")
            .chain(star.columns().iter().copied())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(star.load_order()),
            Cell::new(star.file_name()),
            Cell::new(star.destination_table()),
            kind_cell(star.kind()),
            Cell::new(columns),
        ]);
    }
    println!("{table}");
}

fn print_sources() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Catalogue id"),
        header_cell("Normalized file"),
        header_cell("Staging table"),
    ]);
    apply_table_style(&mut table);
    for dataset in SourceDataset::ALL {
        table.add_row(vec![
            Cell::new(dataset.label()),
            dim_cell(dataset.catalogue_id()),
            Cell::new(dataset.normalized_file_name()),
            Cell::new(dataset.staging_table()),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
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

fn kind_cell(kind: TableKind) -> Cell {
    match kind {
        TableKind::Dimension => Cell::new("dimension").fg(Color::Green),
        TableKind::Fact => Cell::new("fact")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

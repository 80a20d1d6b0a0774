use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pumf_cli::types::RunResult;
use pumf_model::NameRecodingTable;
use pumf_transform::FieldDictionary;

/// Distinct unmapped values shown per field before eliding.
const MAX_LISTED_VALUES: usize = 5;

pub fn print_summary(result: &RunResult) {
    println!("Period: {}", result.period);
    println!("Codebook: {}", result.inputs.metadata.display());
    println!("Data: {}", result.inputs.data.display());
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Block"),
        header_cell("Labels"),
        header_cell("Mapped"),
        header_cell("Unmapped"),
        header_cell("Nulls"),
        header_cell("Unmapped values"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for report in &result.fields {
        table.add_row(vec![
            Cell::new(&report.field.column)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            dim_cell(format!("{}..={}", report.block.start, report.block.end)),
            Cell::new(report.dictionary.len()),
            Cell::new(report.stats.mapped),
            count_cell(report.stats.unmapped, Color::Yellow),
            dim_cell(report.stats.nulls),
            dim_cell(listed_values(report.stats.unmapped_values.iter())),
        ]);
    }
    println!("{table}");

    println!("{}", columns_line(result));
    if result.unmapped_total() > 0 {
        eprintln!(
            "warning: {} values had no label and were kept as text",
            result.unmapped_total()
        );
    }
}

pub fn print_inspection(dictionaries: &[FieldDictionary], names: &NameRecodingTable) {
    for entry in dictionaries {
        println!(
            "{} (marker '{}' at row {})",
            entry.block, entry.field.marker, entry.block.marker_row
        );
        let mut table = Table::new();
        table.set_header(vec![header_cell("Code"), header_cell("Label")]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        for (code, label) in entry.dictionary.iter() {
            table.add_row(vec![Cell::new(code), Cell::new(label)]);
        }
        println!("{table}");
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Renamed to")]);
    apply_table_style(&mut table);
    for entry in names.iter() {
        table.add_row(vec![Cell::new(&entry.old_name), Cell::new(&entry.new_name)]);
    }
    println!("{table}");
    println!("{} described columns", names.len());
}

fn columns_line(result: &RunResult) -> String {
    match &result.names {
        Some(names) => format!(
            "Columns: {} of {} kept and renamed ({} rows)",
            names.len(),
            result.input_columns,
            result.rows
        ),
        None => format!(
            "Columns: {} (not renamed, {} rows)",
            result.columns, result.rows
        ),
    }
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn listed_values<'a>(values: impl ExactSizeIterator<Item = &'a String>) -> String {
    let total = values.len();
    if total == 0 {
        return "-".to_string();
    }
    let shown: Vec<&str> = values.take(MAX_LISTED_VALUES).map(String::as_str).collect();
    if total > MAX_LISTED_VALUES {
        format!("{}, +{} more", shown.join(", "), total - MAX_LISTED_VALUES)
    } else {
        shown.join(", ")
    }
}

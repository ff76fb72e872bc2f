use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use salesprep_cli::mappings::MappingOutput;
use salesprep_model::{CombinationBucket, FileIssue, IssueKind, RunReport, SchemaId};

const ISSUE_KINDS: [IssueKind; 8] = [
    IssueKind::DuplicateColumns,
    IssueKind::Workbook,
    IssueKind::Read,
    IssueKind::NoLabFolder,
    IssueKind::NoNormalizer,
    IssueKind::Reconciliation,
    IssueKind::Tagging,
    IssueKind::Write,
];

/// Tables per schema id, provisional ids highlighted.
pub fn print_classification(report: &RunReport) {
    if let Some(raw) = &report.raw_root {
        println!("Raw: {}", raw.display());
    }
    let mut counts: BTreeMap<&SchemaId, (usize, Vec<&str>)> = BTreeMap::new();
    for row in &report.classified {
        let entry = counts.entry(&row.schema).or_default();
        entry.0 += 1;
        if !entry.1.contains(&row.lab.as_str()) {
            entry.1.push(&row.lab);
        }
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Schema"),
        header_cell("Tables"),
        header_cell("Labs"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (schema, (tables, labs)) in counts {
        table.add_row(vec![
            schema_cell(schema),
            Cell::new(tables),
            Cell::new(labs.join(", ")),
        ]);
    }
    table.add_row(vec![
        header_cell("TOTAL"),
        Cell::new(report.classified.len()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_issue_table(report);
}

/// Per-bucket outputs and combined files of a preprocess or combine run.
pub fn print_run_summary(report: &RunReport) {
    if let Some(raw) = &report.raw_root {
        println!("Raw: {}", raw.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bucket"),
        header_cell("Tables"),
        header_cell("Rows"),
        header_cell("Tagged"),
        header_cell("Combined files"),
        header_cell("Combined rows"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_tables = 0usize;
    let mut total_rows = 0usize;
    for bucket in CombinationBucket::ALL {
        let outputs: Vec<_> = report
            .outputs
            .iter()
            .filter(|output| output.bucket == bucket)
            .collect();
        let combined = report.combined.iter().find(|c| c.bucket == bucket);
        if outputs.is_empty() && combined.is_none() {
            continue;
        }
        let rows: usize = outputs.iter().map(|output| output.rows).sum();
        let tagged = outputs.iter().filter(|output| output.tagged).count();
        total_tables += outputs.len();
        total_rows += rows;
        table.add_row(vec![
            Cell::new(bucket)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(outputs.len()),
            Cell::new(rows),
            count_cell(tagged, Color::Green),
            combined.map_or_else(|| dim_cell("-"), |c| Cell::new(c.files)),
            combined.map_or_else(|| dim_cell("-"), |c| Cell::new(c.rows)),
        ]);
    }
    table.add_row(vec![
        header_cell("TOTAL"),
        Cell::new(total_tables).add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    for combined in &report.combined {
        println!("Combined: {}", combined.output.display());
    }
    print_issue_table(report);
}

pub fn print_mappings(outputs: &[MappingOutput]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Lab"),
        header_cell("Rows"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for output in outputs {
        table.add_row(vec![
            Cell::new(output.lab),
            Cell::new(output.rows),
            Cell::new(output.output.display()),
        ]);
    }
    println!("{table}");
}

fn print_issue_table(report: &RunReport) {
    if report.issues.is_empty() {
        return;
    }
    let mut issues: Vec<&FileIssue> = report.issues.iter().collect();
    issues.sort_by_key(|issue| (kind_rank(issue.kind), issue.path.clone()));

    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Issue"), header_cell("Count")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    for kind in ISSUE_KINDS {
        let count = report.issue_count(kind);
        if count > 0 {
            counts.add_row(vec![kind_cell(kind), count_cell(count, kind_color(kind))]);
        }
    }
    println!();
    println!("Issues:");
    println!("{counts}");

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Issue"),
        header_cell("File"),
        header_cell("Sheet"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    for issue in issues {
        table.add_row(vec![
            kind_cell(issue.kind),
            Cell::new(issue.path.display()),
            issue.sheet.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&issue.message),
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

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_rank(kind: IssueKind) -> usize {
    ISSUE_KINDS
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(ISSUE_KINDS.len())
}

fn kind_color(kind: IssueKind) -> Color {
    match kind {
        IssueKind::Reconciliation | IssueKind::Write | IssueKind::Read => Color::Red,
        IssueKind::DuplicateColumns | IssueKind::Workbook | IssueKind::Tagging => Color::Yellow,
        IssueKind::NoNormalizer | IssueKind::NoLabFolder => Color::DarkYellow,
    }
}

fn kind_cell(kind: IssueKind) -> Cell {
    Cell::new(kind.as_str()).fg(kind_color(kind))
}

fn schema_cell(schema: &SchemaId) -> Cell {
    if schema.is_provisional() {
        Cell::new(schema).fg(Color::Yellow)
    } else {
        Cell::new(schema)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fuiman_cli::pipeline::SourceCheck;
use fuiman_validate::Issue;

use crate::types::{CheckResult, ImportSummary};

pub fn print_check_summary(result: &CheckResult) {
    match &result.folio_error {
        None => println!("FOLIO: connected"),
        Some(reason) => println!("FOLIO: {reason}"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Path"),
        header_cell("Rows"),
        header_cell("Read"),
        header_cell("Schema"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table, 140);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    for source in &result.sources {
        let issues = source.report.as_ref().map(|report| report.len());
        table.add_row(vec![
            source_cell(&source.name),
            dim_cell(source.path.display()),
            source.rows().map_or_else(|| dim_cell("-"), Cell::new),
            status_cell(Some(source.read_ok())),
            status_cell(source.report.as_ref().map(|_| source.schema_ok())),
            count_cell(issues.map(|n| n as u64), Color::Red),
        ]);
    }
    println!("{table}");

    print_issue_table(&result.sources);

    let read_errors: Vec<(&str, String)> = result
        .sources
        .iter()
        .filter_map(|source| Some((source.name.as_str(), source.read_error()?)))
        .collect();
    if !read_errors.is_empty() {
        eprintln!("Read errors:");
        for (name, error) in read_errors {
            eprintln!("- {name}: {error}");
        }
    }
}

fn print_issue_table(sources: &[SourceCheck]) {
    let issues: Vec<(&str, &Issue)> = sources
        .iter()
        .filter_map(|source| Some((source.name.as_str(), source.report.as_ref()?)))
        .flat_map(|(name, report)| report.issues.iter().map(move |issue| (name, issue)))
        .collect();
    if issues.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Category"),
        header_cell("Column"),
        header_cell("Rule"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table, 180);
    align_column(&mut table, 4, CellAlignment::Right);
    for (source, issue) in issues {
        table.add_row(vec![
            source_cell(source),
            Cell::new(issue.category().label()),
            Cell::new(issue.column()),
            Cell::new(issue.rule()),
            count_cell(issue.count(), Color::Red),
            Cell::new(issue.message()),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn print_import_summary(summary: &ImportSummary) {
    let outcome = &summary.outcome;

    let mut table = Table::new();
    table.set_header(vec![header_cell("Source"), header_cell("Records")]);
    apply_table_style(&mut table, 80);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, records) in &summary.sources {
        table.add_row(vec![source_cell(name), Cell::new(records)]);
    }
    println!("{table}");

    let mut totals = Table::new();
    totals.set_header(vec![
        header_cell("Submitted"),
        header_cell("Created"),
        header_cell("Updated"),
        header_cell("Failed"),
        header_cell("Batches"),
        header_cell("Failed batches"),
        header_cell("Failed %"),
    ]);
    apply_table_style(&mut totals, 120);
    for index in 0..7 {
        align_column(&mut totals, index, CellAlignment::Right);
    }
    let percentage = format!("{:.1}", outcome.failure_percentage());
    totals.add_row(vec![
        Cell::new(outcome.total_records).add_attribute(Attribute::Bold),
        count_cell(Some(outcome.created_records), Color::Green),
        count_cell(Some(outcome.updated_records), Color::Green),
        count_cell(Some(outcome.failed_records), Color::Red),
        Cell::new(outcome.batches_submitted),
        count_cell(Some(outcome.batches_failed as u64), Color::Red),
        if summary.threshold_exceeded() {
            Cell::new(percentage)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(percentage)
        },
    ]);
    println!();
    println!("{totals}");

    if !outcome.failed_users.is_empty() {
        let mut users = Table::new();
        users.set_header(vec![
            header_cell("externalSystemId"),
            header_cell("username"),
            header_cell("Error"),
        ]);
        apply_table_style(&mut users, 160);
        for user in &outcome.failed_users {
            users.add_row(vec![
                optional_cell(user.external_system_id.as_deref()),
                optional_cell(user.username.as_deref()),
                optional_cell(user.error_message.as_deref()),
            ]);
        }
        println!();
        println!("Failed users:");
        println!("{users}");
    }

    if !outcome.batch_failures.is_empty() {
        eprintln!("Failed batches:");
        for failure in &outcome.batch_failures {
            eprintln!(
                "- {} batch {} ({} records, {} attempts): {}",
                failure.source,
                failure.index + 1,
                failure.records,
                failure.attempts,
                failure.message
            );
        }
    }
}

fn apply_table_style(table: &mut Table, width: u16) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);
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

fn source_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn status_cell(ok: Option<bool>) -> Cell {
    match ok {
        Some(true) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(false) => Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: Option<u64>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

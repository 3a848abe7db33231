use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use eva_core::{EvaluationOutcome, ImportReport};

/// One line of the import summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub evaluation: String,
    pub status: &'static str,
    pub title: String,
    pub children: usize,
    pub truncated: usize,
    pub rejected: usize,
}

pub fn summary_rows(report: &ImportReport) -> Vec<SummaryRow> {
    report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            EvaluationOutcome::Imported {
                external_id,
                title,
                stats,
                ..
            } => SummaryRow {
                evaluation: external_id.clone(),
                status: "imported",
                title: title.clone().unwrap_or_default(),
                children: outcome.child_count(),
                truncated: stats.truncated,
                rejected: stats.rejected,
            },
            EvaluationOutcome::SkippedDuplicate { external_id } => SummaryRow {
                evaluation: external_id.clone(),
                status: "skipped",
                title: String::new(),
                children: 0,
                truncated: 0,
                rejected: 0,
            },
            EvaluationOutcome::SkippedMissingId { rows } => SummaryRow {
                evaluation: "-".to_string(),
                status: "no id",
                title: format!("{rows} row(s)"),
                children: 0,
                truncated: 0,
                rejected: 0,
            },
        })
        .collect()
}

/// One line per evaluation, as printed before the table.
pub fn outcome_line(outcome: &EvaluationOutcome) -> String {
    match outcome {
        EvaluationOutcome::Imported {
            external_id, id, ..
        } => format!(
            "Imported evaluation {external_id} as {id} with {} child record(s)",
            outcome.child_count()
        ),
        EvaluationOutcome::SkippedDuplicate { external_id } => {
            format!("Skipped evaluation {external_id}: already imported")
        }
        EvaluationOutcome::SkippedMissingId { rows } => {
            format!("Skipped {rows} row(s) without an evaluation id")
        }
    }
}

pub fn print_summary(report: &ImportReport) {
    if let Some(path) = &report.source {
        let origin = if report.downloaded {
            "downloaded"
        } else {
            "cached"
        };
        println!("Source: {} ({origin})", path.display());
    }
    for outcome in &report.outcomes {
        println!("{}", outcome_line(outcome));
    }
    println!("{}", summary_table(report));
}

pub fn summary_table(report: &ImportReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Evaluation"),
        header_cell("Status"),
        header_cell("Title"),
        header_cell("Children"),
        header_cell("Truncated"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let rows = summary_rows(report);
    let mut total_children = 0usize;
    for row in &rows {
        total_children += row.children;
        table.add_row(vec![
            Cell::new(&row.evaluation)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            status_cell(row.status),
            Cell::new(&row.title),
            Cell::new(row.children),
            count_cell(row.truncated, Color::Yellow),
            count_cell(row.rejected, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} imported, {} skipped",
            report.imported,
            report.skipped_duplicate + report.skipped_missing_id
        ))
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_children).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
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

fn status_cell(status: &str) -> Cell {
    match status {
        "imported" => Cell::new(status).fg(Color::Green),
        "skipped" => Cell::new(status).fg(Color::Yellow),
        _ => Cell::new(status).fg(Color::Red),
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

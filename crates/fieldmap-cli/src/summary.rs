//! Table rendering for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use fieldmap_engine::{DocumentIssue, MappingReport, NodeOutcome};

use crate::builtins::Builtin;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Per-node outcomes of a run.
pub fn outcome_table(report: &MappingReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Node"), header_cell("Outcome")]);
    apply_table_style(&mut table);
    for node in &report.nodes {
        table.add_row(vec![Cell::new(&node.name), outcome_cell(&node.outcome)]);
    }
    table
}

/// Issues found by `check`.
pub fn issue_table(issues: &[DocumentIssue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Node"),
        header_cell("Issue"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.node.as_deref().unwrap_or("-")),
            Cell::new(issue.kind.label()).fg(Color::Red),
            Cell::new(&issue.message),
        ]);
    }
    table
}

/// Built-in capability listing.
pub fn capability_table(builtins: &[Builtin]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Capability"),
        header_cell("Usage"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for builtin in builtins {
        table.add_row(vec![builtin.name, builtin.usage, builtin.description]);
    }
    table
}

fn outcome_cell(outcome: &NodeOutcome) -> Cell {
    match outcome {
        NodeOutcome::Written => Cell::new("written").fg(Color::Green),
        NodeOutcome::Skipped => Cell::new("skipped").fg(Color::Yellow),
        NodeOutcome::Absent => Cell::new("absent"),
        NodeOutcome::Violated => Cell::new("violated").fg(Color::Red),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

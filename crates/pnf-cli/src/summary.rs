use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pnf_model::ProcessingStats;

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    println!("Policy: {}", result.policy);
    println!("{}", counts_table(&result.stats, result.policy.is_salvage()));
    if result.dry_run {
        return;
    }
    println!("Output: {}", result.output.display());
    println!("Report: {}", result.report.display());
}

fn counts_table(stats: &ProcessingStats, salvage: bool) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Clients"), header_cell("Count")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Total"), Cell::new(stats.total_clients)]);
    table.add_row(vec![
        Cell::new("Successfully processed"),
        Cell::new(stats.successful_clients).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Skipped clients"),
        count_cell(stats.skipped_client_count()),
    ]);
    if salvage {
        table.add_row(vec![
            Cell::new("Retained pregnancies"),
            Cell::new(stats.retained_pregnancies),
        ]);
        table.add_row(vec![
            Cell::new("Skipped pregnancies"),
            count_cell(stats.skipped_pregnancy_count()),
        ]);
    }
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        Cell::new(count).add_attribute(Attribute::Dim)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_table_has_no_pregnancy_rows() {
        let stats = ProcessingStats {
            total_clients: 3,
            successful_clients: 2,
            ..ProcessingStats::default()
        };
        let rendered = counts_table(&stats, false).to_string();
        assert!(rendered.contains("Successfully processed"));
        assert!(!rendered.contains("pregnancies"));
    }

    #[test]
    fn salvage_table_lists_pregnancy_counts() {
        let rendered = counts_table(&ProcessingStats::default(), true).to_string();
        assert!(rendered.contains("Skipped pregnancies"));
        assert!(rendered.contains("Retained pregnancies"));
    }
}

//! Table output formatting for CLI commands
//!
//! Renders sweep results and quadrature grids with comfy-table.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use crate::cli::output::format::format_g;
use crate::domain::models::{NodeSum, RunReport};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

/// One row of the `nodes` listing
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct NodeRow {
    pub k: usize,
    pub x: f64,
    pub weight: f64,
    pub xi: f64,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Per-node sums with the number of orders evaluated for each node
    pub fn format_sums(&self, sums: &[NodeSum], report: &RunReport) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            header("k"),
            header("x"),
            header("logdetD"),
            header("Orders"),
        ]);

        for sum in sums {
            let orders = report.orders_per_node.get(sum.k).copied().unwrap_or(0);
            let orders_cell = Cell::new(orders).set_alignment(CellAlignment::Right);
            let orders_cell = if self.use_colors && orders == report.max_order as usize + 1 {
                // Row still ran at the last order pass
                orders_cell.fg(Color::Yellow)
            } else {
                orders_cell
            };

            table.add_row(vec![
                Cell::new(sum.k).set_alignment(CellAlignment::Right),
                Cell::new(format_g(sum.x, 6)),
                Cell::new(format_g(sum.log_det_d, 15)),
                orders_cell,
            ]);
        }

        table.to_string()
    }

    /// Quadrature nodes, weights and frequencies
    pub fn format_nodes(&self, rows: &[NodeRow]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("k"), header("x"), header("weight"), header("xi")]);

        for row in rows {
            table.add_row(vec![
                Cell::new(row.k).set_alignment(CellAlignment::Right),
                Cell::new(format_g(row.x, 15)),
                Cell::new(format_g(row.weight, 15)),
                Cell::new(format_g(row.xi, 15)),
            ]);
        }

        table.to_string()
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        if !self.use_colors {
            table.force_no_tty();
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(title: &str) -> Cell {
    Cell::new(title).add_attribute(Attribute::Bold)
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM"), Ok(term) if term == "dumb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn report(orders_per_node: Vec<usize>) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            submitted: 10,
            completed: 10,
            retried: 0,
            abandoned: 0,
            max_order: 4,
            peak_outstanding: 1,
            converged_early: true,
            orders_per_node,
        }
    }

    #[test]
    fn test_format_sums() {
        let formatter = TableFormatter::with_config(false, Some(120));
        let sums = vec![
            NodeSum {
                k: 0,
                x: 0.0176,
                log_det_d: -9.5,
            },
            NodeSum {
                k: 1,
                x: 0.0925,
                log_det_d: -1.0e-20,
            },
        ];

        let rendered = formatter.format_sums(&sums, &report(vec![5, 3]));
        assert!(rendered.contains("logdetD"));
        assert!(rendered.contains("-9.5"));
        assert!(rendered.contains("-1e-20"));
        assert!(rendered.contains("0.0925"));
    }

    #[test]
    fn test_format_nodes() {
        let formatter = TableFormatter::with_config(false, None);
        let rows = [NodeRow {
            k: 0,
            x: 1.0,
            weight: 1.0,
            xi: 10.5,
        }];

        let rendered = formatter.format_nodes(&rows);
        assert!(rendered.contains("weight"));
        assert!(rendered.contains("10.5"));
    }
}

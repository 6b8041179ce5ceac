//! Table output for phase lists using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::PhaseStatus;

/// One row of the phase status table
#[derive(Debug, Clone, serde::Serialize)]
pub struct PhaseRow {
    pub position: usize,
    pub phase_id: String,
    pub name: String,
    pub category: String,
    pub status: PhaseStatus,
    pub blocked: bool,
    /// Names of unmet hard prerequisites
    pub waiting_on: Vec<String>,
}

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format phases in project order
    pub fn format_phases(&self, rows: &[PhaseRow]) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Phase").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Waiting on").add_attribute(Attribute::Bold),
        ]);

        for row in rows {
            let status = if row.blocked {
                "blocked".to_string()
            } else {
                row.status.to_string()
            };
            let status_cell = if self.use_colors {
                Cell::new(status).fg(status_color(row.status, row.blocked))
            } else {
                Cell::new(status)
            };

            table.add_row(vec![
                Cell::new(row.position + 1),
                Cell::new(&row.phase_id),
                Cell::new(&row.name),
                Cell::new(&row.category),
                status_cell,
                Cell::new(row.waiting_on.join(", ")),
            ]);
        }

        table.to_string()
    }
}

fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    console::colors_enabled()
}

const fn status_color(status: PhaseStatus, blocked: bool) -> Color {
    if blocked {
        return Color::Red;
    }
    match status {
        PhaseStatus::Complete => Color::Green,
        PhaseStatus::InProgress => Color::Yellow,
        PhaseStatus::Pending => Color::Blue,
    }
}

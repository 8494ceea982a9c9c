//! Table output formatting for CLI commands using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::BenchmarkKind;

/// One seed point as shown by `jsc-tune history`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SeedRow {
    pub source: String,
    pub configuration: Vec<i64>,
    pub score: f64,
}

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<usize>,
}

impl TableFormatter {
    /// Formatter with colors and the terminal width.
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Formatter with explicit color and width settings.
    pub fn with_config(use_colors: bool, max_width: Option<usize>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// One row per seed point, one column per parameter.
    pub fn format_seeds(&self, names: &[String], rows: &[SeedRow]) -> String {
        let mut table = self.create_base_table();

        let mut header = vec![Cell::new("Source").add_attribute(Attribute::Bold)];
        header.extend(names.iter().map(|n| Cell::new(n).add_attribute(Attribute::Bold)));
        header.push(Cell::new("Score").add_attribute(Attribute::Bold));
        table.set_header(header);

        let best = rows.iter().map(|r| r.score).fold(f64::INFINITY, f64::min);
        for row in rows {
            let mut cells = vec![Cell::new(&row.source)];
            cells.extend(row.configuration.iter().map(Cell::new));
            let score = Cell::new(format!("{:.4}", row.score));
            cells.push(if self.use_colors && row.score == best {
                score.fg(Color::Green)
            } else {
                score
            });
            table.add_row(cells);
        }

        table.to_string()
    }

    /// Table of benchmark kinds and their descriptions.
    pub fn format_benchmarks(&self, kinds: &[BenchmarkKind]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Runs").add_attribute(Attribute::Bold),
            Cell::new("Better").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
        ]);

        for kind in kinds {
            let name = if self.use_colors {
                Cell::new(kind.name()).fg(Color::Cyan)
            } else {
                Cell::new(kind.name())
            };
            table.add_row(vec![
                name,
                Cell::new(if kind.is_remote() { "remote" } else { "local" }),
                Cell::new(if kind.maximizes() { "higher" } else { "lower" }),
                Cell::new(kind.description()),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

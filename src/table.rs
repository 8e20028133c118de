use std::fmt::Write as _;

use crate::grid::{Grid, column_letter};

/// Renders up to `limit` data rows of `grid` as an aligned text table.
///
/// The first column holds the sheet row number, the header line holds the
/// sheet's own header cells, and a second line shows the column letters.
pub fn render_grid(grid: &Grid, limit: usize) -> String {
    let mut lines: Vec<Vec<String>> = Vec::new();
    let header = grid
        .header()
        .map(|cells| {
            cells
                .iter()
                .map(|c| sanitize_cell(&c.as_display()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    lines.push(std::iter::once("#".to_string()).chain(header).collect());
    lines.push(
        std::iter::once(String::new())
            .chain((1..=grid.max_column()).map(column_letter))
            .collect(),
    );
    for (idx, row) in grid.data_rows().take(limit).enumerate() {
        lines.push(
            std::iter::once((idx + 2).to_string())
                .chain(row.iter().map(|c| sanitize_cell(&c.as_display())))
                .collect(),
        );
    }

    let column_count = grid.max_column() + 1;
    let mut widths = vec![1usize; column_count];
    for line in &lines {
        for (idx, cell) in line.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    for (idx, line) in lines.iter().enumerate() {
        let _ = writeln!(output, "{}", format_line(line, &widths));
        if idx == 1 {
            let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
            let _ = writeln!(output, "{}", format_line(&rule, &widths));
        }
    }
    output
}

pub fn print_grid(grid: &Grid, limit: usize) {
    print!("{}", render_grid(grid, limit));
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn sanitize_cell(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}

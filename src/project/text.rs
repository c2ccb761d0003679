use super::{cell_text, Table};

/// Cells wider than this are cut with an ellipsis.
const MAX_COLUMN_WIDTH: usize = 32;

fn truncate(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width {
        value.to_string()
    } else if max_width <= 3 {
        value.chars().take(max_width).collect()
    } else {
        format!("{}...", value.chars().take(max_width - 3).collect::<String>())
    }
}

/// Line breaks would split a row across lines; show them as spaces.
fn single_line(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (idx, width) in widths.iter().enumerate() {
        line.push_str(&"─".repeat(width + 2));
        line.push(if idx == widths.len() - 1 { right } else { mid });
    }
    line.push('\n');
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        let shown = truncate(cell, *width);
        let pad = width - shown.chars().count();
        line.push(' ');
        line.push_str(&shown);
        line.push_str(&" ".repeat(pad + 1));
        line.push('│');
    }
    line.push('\n');
    line
}

/// Box-drawn text table with a row-count footer.
pub fn render_table(table: &Table) -> String {
    let text_rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| single_line(&cell_text(v))).collect())
        .collect();

    let headers: Vec<String> = table.headers.iter().map(|h| single_line(h)).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &text_rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    for w in widths.iter_mut() {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let mut out = String::new();
    if !widths.is_empty() {
        out.push_str(&border(&widths, '┌', '┬', '┐'));
        out.push_str(&row_line(&headers, &widths));
        out.push_str(&border(&widths, '├', '┼', '┤'));
        for row in &text_rows {
            out.push_str(&row_line(row, &widths));
        }
        out.push_str(&border(&widths, '└', '┴', '┘'));
    }

    let count = text_rows.len();
    out.push_str(&format!("({} {})\n", count, if count == 1 { "row" } else { "rows" }));
    out
}

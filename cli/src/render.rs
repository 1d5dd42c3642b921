//! Text renderings of [`LayoutTable`].

use std::fmt::Write as _;

use mic_calc::{Cell, LayoutTable};

/// Output format for layout tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormat {
    /// Boxed grid, multi-value cells on separate lines.
    #[default]
    Grid,
    /// Comma-separated, multi-value cells joined by spaces.
    Csv,
    /// GitHub pipe table, multi-value cells joined by `<br />`.
    Markdown,
    /// AsciiDoc `|===` table.
    Asciidoc,
}

impl TableFormat {
    fn join(self) -> &'static str {
        match self {
            TableFormat::Grid | TableFormat::Asciidoc => "\n",
            TableFormat::Csv => " ",
            TableFormat::Markdown => "<br />",
        }
    }
}

/// Renders `table` with its title (if any) on the line above.
#[must_use]
pub fn render(table: &LayoutTable, format: TableFormat) -> String {
    let mut out = String::new();
    if let Some(title) = &table.title {
        out.push_str(title);
        out.push('\n');
    }
    let rows = text_rows(table, format);
    match format {
        TableFormat::Grid => grid(&mut out, &rows),
        TableFormat::Csv => csv(&mut out, &rows),
        TableFormat::Markdown => markdown(&mut out, &rows),
        TableFormat::Asciidoc => asciidoc(&mut out, &rows),
    }
    out
}

fn text_rows(table: &LayoutTable, format: TableFormat) -> Vec<Vec<String>> {
    let width = table.width();
    table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|cell: &Cell| cell.join(format.join())).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect()
}

/// Body columns holding only integers are right-aligned.
fn numeric_columns(rows: &[Vec<String>]) -> Vec<bool> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| {
            let mut body = rows.iter().skip(1).map(|row| row[col].as_str()).peekable();
            body.peek().is_some() && body.all(|cell| !cell.is_empty() && cell.bytes().all(|b| b.is_ascii_digit()))
        })
        .collect()
}

fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| {
            rows.iter()
                .flat_map(|row| row[col].lines())
                .map(str::len)
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

fn grid(out: &mut String, rows: &[Vec<String>]) {
    let widths = column_widths(rows);
    let numeric = numeric_columns(rows);
    let rule = |fill: char| {
        let mut line = String::from("+");
        for w in &widths {
            line.extend(std::iter::repeat(fill).take(w + 2));
            line.push('+');
        }
        line
    };
    let _ = writeln!(out, "{}", rule('-'));
    for (n, row) in rows.iter().enumerate() {
        let height = row.iter().map(|cell| cell.lines().count().max(1)).max().unwrap_or(1);
        for line in 0..height {
            out.push('|');
            for (col, cell) in row.iter().enumerate() {
                let text = cell.lines().nth(line).unwrap_or("");
                let right = n > 0 && numeric[col];
                let _ = write!(out, " {} |", pad(text, widths[col], right));
            }
            out.push('\n');
        }
        let _ = writeln!(out, "{}", rule(if n == 0 { '=' } else { '-' }));
    }
}

fn csv(out: &mut String, rows: &[Vec<String>]) {
    for row in rows {
        let _ = writeln!(out, "{}", row.join(","));
    }
}

fn markdown(out: &mut String, rows: &[Vec<String>]) {
    let widths = column_widths(rows);
    let numeric = numeric_columns(rows);
    for (n, row) in rows.iter().enumerate() {
        out.push('|');
        for (col, cell) in row.iter().enumerate() {
            let _ = write!(out, " {} |", pad(cell, widths[col], n > 0 && numeric[col]));
        }
        out.push('\n');
        if n == 0 {
            out.push('|');
            for (col, w) in widths.iter().enumerate() {
                let dashes = "-".repeat(w + 1);
                if numeric[col] {
                    let _ = write!(out, "{dashes}:|");
                } else {
                    let _ = write!(out, ":{dashes}|");
                }
            }
            out.push('\n');
        }
    }
}

fn asciidoc(out: &mut String, rows: &[Vec<String>]) {
    let numeric = numeric_columns(rows);
    let cols = numeric
        .iter()
        .map(|&right| if right { ">" } else { "<" })
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "[cols=\"{cols}\",options=\"header\"]");
    out.push_str("|===\n");
    for row in rows {
        for cell in row {
            let _ = writeln!(out, "| {cell}");
        }
        out.push('\n');
    }
    out.push_str("|===\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mic_calc::table::cell;

    fn sample() -> LayoutTable {
        let mut table = LayoutTable::with_header(vec![cell("A[M][K]"), cell("0"), cell("1")]);
        table.push_row(vec![cell("0"), cell("v0{0}"), vec!["v1{0}".into(), "v1{16}".into()]]);
        table.push_row(vec![cell("1"), cell("v0{1}"), cell("v1{1}")]);
        table
    }

    #[test]
    fn grid_boxes_and_stacks_values() {
        let text = render(&sample(), TableFormat::Grid);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "+---------+-------+--------+");
        assert_eq!(lines[1], "| A[M][K] | 0     | 1      |");
        assert_eq!(lines[2], "+=========+=======+========+");
        assert_eq!(lines[3], "|       0 | v0{0} | v1{0}  |");
        assert_eq!(lines[4], "|         |       | v1{16} |");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn csv_joins_with_spaces() {
        let text = render(&sample(), TableFormat::Csv);
        assert_eq!(text, "A[M][K],0,1\n0,v0{0},v1{0} v1{16}\n1,v0{1},v1{1}\n");
    }

    #[test]
    fn markdown_uses_line_breaks() {
        let text = render(&sample(), TableFormat::Markdown);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[1].starts_with("|--------:|"));
        assert!(lines[2].contains("v1{0}<br />v1{16}"));
    }

    #[test]
    fn asciidoc_frames_the_table() {
        let mut table = sample();
        table.title = Some("Block 1".to_owned());
        let text = render(&table, TableFormat::Asciidoc);
        assert!(text.starts_with("Block 1\n[cols=\">,<,<\",options=\"header\"]\n|===\n"));
        assert!(text.ends_with("|===\n"));
    }
}

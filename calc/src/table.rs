//! Structured layout tables produced by the whole-matrix queries.
//!
//! Rendering (grid, CSV, Markdown, AsciiDoc) belongs to the front end; the
//! core only fixes the cell contents.

/// One table cell: zero or more values.
pub type Cell = Vec<String>;

/// A titled table whose first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutTable {
    /// Optional caption, e.g. `Block 1`.
    pub title: Option<String>,
    /// Header row followed by data rows, all the same width.
    pub rows: Vec<Vec<Cell>>,
}

impl LayoutTable {
    /// An untitled table with `header` as its first row.
    #[must_use]
    pub fn with_header(header: Vec<Cell>) -> Self {
        Self {
            title: None,
            rows: vec![header],
        }
    }

    /// Appends a data row.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// The header row.
    #[must_use]
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map_or(&[], Vec::as_slice)
    }

    /// Data rows after the header.
    #[must_use]
    pub fn body(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of columns, the widest row's width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Swaps rows and columns; short rows are padded with empty cells.
    #[must_use]
    pub fn transpose(self) -> Self {
        let width = self.width();
        let mut rows = vec![Vec::with_capacity(self.rows.len()); width];
        for row in self.rows {
            let mut cells = row.into_iter();
            for column in &mut rows {
                column.push(cells.next().unwrap_or_default());
            }
        }
        Self {
            title: self.title,
            rows,
        }
    }
}

/// A single-value cell.
#[must_use]
pub fn cell(value: impl Into<String>) -> Cell {
    vec![value.into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LayoutTable {
        let mut table = LayoutTable::with_header(vec![cell("A[2][3]"), cell("0"), cell("1"), cell("2")]);
        table.push_row(vec![cell("0"), cell("a"), vec![], vec!["b".into(), "c".into()]]);
        table.push_row(vec![cell("1"), cell("d"), cell("e")]);
        table
    }

    #[test]
    fn header_and_body_split() {
        let table = sample();
        assert_eq!(table.header().len(), 4);
        assert_eq!(table.body().len(), 2);
        assert_eq!(table.width(), 4);
        assert!(LayoutTable::default().body().is_empty());
    }

    #[test]
    fn transpose_swaps_and_pads() {
        let t = sample().transpose();
        assert_eq!(t.rows.len(), 4);
        assert_eq!(t.rows[0], vec![cell("A[2][3]"), cell("0"), cell("1")]);
        assert_eq!(t.rows[3], vec![cell("2"), vec!["b".to_owned(), "c".to_owned()], vec![]]);
        assert_eq!(t.transpose().rows[1][3], vec!["b".to_owned(), "c".to_owned()]);
    }
}

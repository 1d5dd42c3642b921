//! Matrix roles, logical coordinates and element names.

use std::fmt;

/// One operand matrix of a matrix-multiply instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatrixRole {
    /// First multiplicand (`M x K`), encoded in Src0.
    A,
    /// Second multiplicand (`K x N`), encoded in Src1.
    B,
    /// Accumulator input (`M x N`), encoded in Src2.
    C,
    /// Result (`M x N`), encoded in Vdst.
    D,
    /// Structured-sparsity compression indices, encoded in Src2 in place of C.
    K,
}

impl MatrixRole {
    /// Every role, in display order.
    pub const ALL: [MatrixRole; 5] = [
        MatrixRole::A,
        MatrixRole::B,
        MatrixRole::C,
        MatrixRole::D,
        MatrixRole::K,
    ];

    /// Single-letter uppercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixRole::A => "A",
            MatrixRole::B => "B",
            MatrixRole::C => "C",
            MatrixRole::D => "D",
            MatrixRole::K => "K",
        }
    }

    /// Whether the role is the accumulator or the result.
    #[must_use]
    pub fn is_output(self) -> bool {
        matches!(self, MatrixRole::C | MatrixRole::D)
    }

    /// Instruction operand field that carries this matrix.
    #[must_use]
    pub fn source_field(self) -> &'static str {
        match self {
            MatrixRole::A => "Src0",
            MatrixRole::B => "Src1",
            MatrixRole::C | MatrixRole::K => "Src2",
            MatrixRole::D => "Vdst",
        }
    }

    /// Resolves a role letter, ignoring case.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<MatrixRole> {
        MatrixRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(letter.trim()))
    }
}

impl fmt::Display for MatrixRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical position in one operand matrix.
///
/// Indices that a role does not use (for example `j` on A) are carried but
/// ignored by the layout arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalCoordinate {
    /// Matrix the coordinate addresses.
    pub role: MatrixRole,
    /// Row of A, C, D and K.
    pub i: u32,
    /// Column of B, C and D.
    pub j: u32,
    /// Column of A and K, row of B.
    pub k: u32,
    /// Block index.
    pub block: u32,
}

impl LogicalCoordinate {
    /// Creates a coordinate.
    #[must_use]
    pub fn new(role: MatrixRole, i: u32, j: u32, k: u32, block: u32) -> Self {
        Self {
            role,
            i,
            j,
            k,
            block,
        }
    }

    /// The coordinate printed at `(row, col)` of the role's matrix, the
    /// inverse of [`Element::new`].
    #[must_use]
    pub fn from_cell(role: MatrixRole, row: u32, col: u32, block: u32) -> Self {
        match role {
            MatrixRole::A | MatrixRole::K => Self::new(role, row, 0, col, block),
            MatrixRole::B => Self::new(role, 0, col, row, block),
            MatrixRole::C | MatrixRole::D => Self::new(role, row, col, 0, block),
        }
    }
}

/// The rendered identity of a matrix element, e.g. `A[3][1].B2`.
///
/// Only the indices meaningful for the role are kept, so two coordinates that
/// differ in an ignored index produce equal elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    /// Matrix the element belongs to.
    pub role: MatrixRole,
    /// First printed index.
    pub row: u32,
    /// Second printed index.
    pub col: u32,
    /// Block suffix, present only on multi-block instructions.
    pub block: Option<u32>,
}

impl Element {
    /// Names the element at `coord` for an instruction with `blocks` blocks.
    #[must_use]
    pub fn new(coord: &LogicalCoordinate, blocks: u32) -> Self {
        let (row, col) = match coord.role {
            MatrixRole::A | MatrixRole::K => (coord.i, coord.k),
            MatrixRole::B => (coord.k, coord.j),
            MatrixRole::C | MatrixRole::D => (coord.i, coord.j),
        };
        Self {
            role: coord.role,
            row,
            col,
            block: (blocks > 1).then_some(coord.block),
        }
    }

    /// The reduction index of an A, B or K element.
    #[must_use]
    pub fn k(&self) -> Option<u32> {
        match self.role {
            MatrixRole::A | MatrixRole::K => Some(self.col),
            MatrixRole::B => Some(self.row),
            MatrixRole::C | MatrixRole::D => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}][{}]", self.role, self.row, self.col)?;
        if let Some(block) = self.block {
            write!(f, ".B{block}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_names_follow_role_index_order() {
        let a = LogicalCoordinate::new(MatrixRole::A, 3, 9, 1, 0);
        let b = LogicalCoordinate::new(MatrixRole::B, 3, 9, 1, 0);
        let d = LogicalCoordinate::new(MatrixRole::D, 3, 9, 1, 2);
        assert_eq!(Element::new(&a, 1).to_string(), "A[3][1]");
        assert_eq!(Element::new(&b, 1).to_string(), "B[1][9]");
        assert_eq!(Element::new(&d, 4).to_string(), "D[3][9].B2");
    }

    #[test]
    fn ignored_indices_do_not_affect_identity() {
        let first = LogicalCoordinate::new(MatrixRole::A, 2, 0, 5, 0);
        let second = LogicalCoordinate::new(MatrixRole::A, 2, 7, 5, 0);
        assert_eq!(Element::new(&first, 1), Element::new(&second, 1));
        assert_eq!(Element::new(&first, 1).k(), Some(5));
    }

    #[test]
    fn cells_round_trip_through_elements() {
        for role in MatrixRole::ALL {
            let coord = LogicalCoordinate::from_cell(role, 3, 5, 1);
            let element = Element::new(&coord, 2);
            assert_eq!((element.row, element.col, element.block), (3, 5, Some(1)));
        }
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(MatrixRole::from_letter("k"), Some(MatrixRole::K));
        assert_eq!(MatrixRole::from_letter("D"), Some(MatrixRole::D));
        assert_eq!(MatrixRole::from_letter("E"), None);
    }
}

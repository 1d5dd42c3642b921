//! The four layout queries.
//!
//! Every query validates its modifiers first, then works from
//! [`Calculator::locate`] and [`RegisterDictionary`]. Results are structured;
//! the `Display` impls give the canonical one-line-per-value text.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use mic_catalog::Family;
use tracing::warn;

use crate::arch::Calculator;
use crate::compositor::SourceCompositor;
use crate::dictionary::RegisterDictionary;
use crate::error::Result;
use crate::modifiers::{ModifierSet, QueryKind};
use crate::naming::{Location, RegisterSpec};
use crate::role::{Element, LogicalCoordinate, MatrixRole};
use crate::table::{cell, Cell, LayoutTable};
use crate::transform::lane_in_swizzle_image;

/// One location of a located element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLine {
    /// Element queried.
    pub element: Element,
    /// Register and lane holding it.
    pub location: Location,
    /// Register-form source expansion, with output calculation on D.
    pub source: Option<String>,
}

impl fmt::Display for RegisterLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} = Vdst_{} = {source}", self.element, self.location),
            None => write!(f, "{} = {}", self.element, self.location),
        }
    }
}

/// Register and lanes of one element.
///
/// With `output_calculation` on the D matrix, each line also carries the
/// register-form sum that produces the value.
///
/// # Errors
///
/// Returns the modifier validation errors of [`ModifierSet::validate`],
/// [`CalcError::UnsupportedRole`](crate::CalcError::UnsupportedRole) and
/// [`CalcError::CoordinateOutOfBounds`](crate::CalcError::CoordinateOutOfBounds).
pub fn get_register(
    calc: &Calculator,
    coord: &LogicalCoordinate,
    mods: &ModifierSet,
    output_calculation: bool,
) -> Result<Vec<RegisterLine>> {
    mods.validate(calc, coord.role, output_calculation, QueryKind::GetRegister)?;
    let expand = output_calculation && coord.role == MatrixRole::D;
    let placement_mods = if expand { mods.without_movement() } else { *mods };
    let placement = calc.locate(coord, &placement_mods)?;
    let source = if expand {
        Some(SourceCompositor::new(calc, mods)?.register_form(coord)?)
    } else {
        None
    };
    Ok(placement
        .location
        .locations()
        .map(|location| RegisterLine {
            element: placement.element,
            location,
            source: source.clone(),
        })
        .collect())
}

/// One element found at a queried location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    /// Slot and lane.
    pub location: Location,
    /// Element name, decorated with its negation unless expanded.
    pub element: String,
    /// Element-form source expansion, with output calculation on D.
    pub source: Option<String>,
}

impl fmt::Display for EntryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.location, self.element)?;
        if let Some(source) = &self.source {
            write!(f, " = {source}")?;
        }
        Ok(())
    }
}

/// Why a queried lane holds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedReason {
    /// The CBSZ/ABID broadcast reads A from other blocks.
    CbszAbid,
    /// The BLGP swizzle reads B from other lanes.
    Blgp,
    /// The layout leaves the location empty.
    Layout,
}

/// Result of [`matrix_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixEntry {
    /// Every element held in the register's slots at the lane.
    Entries(Vec<EntryLine>),
    /// The lane holds no data of the matrix.
    LaneUnused {
        /// Lane queried.
        lane: u32,
        /// Cause.
        reason: UnusedReason,
    },
}

impl fmt::Display for MatrixEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixEntry::Entries(lines) => {
                for (n, line) in lines.iter().enumerate() {
                    if n > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{line}")?;
                }
                Ok(())
            }
            MatrixEntry::LaneUnused { lane, reason } => match reason {
                UnusedReason::CbszAbid => write!(
                    f,
                    "Due to instruction modifiers CBSZ and ABID, lane {lane} is not used for this instruction."
                ),
                UnusedReason::Blgp => write!(
                    f,
                    "Due to instruction modifier BLGP, lane {lane} is not used for this instruction."
                ),
                UnusedReason::Layout => write!(f, "Lane {lane} holds no data of this matrix."),
            },
        }
    }
}

fn unused(calc: &Calculator, role: MatrixRole, lane: u32, reason: UnusedReason) -> MatrixEntry {
    warn!(
        instruction = calc.descriptor().mnemonic,
        %role,
        lane,
        ?reason,
        "lane holds no matrix data"
    );
    MatrixEntry::LaneUnused { lane, reason }
}

/// Every element held by one register at one lane.
///
/// # Errors
///
/// Returns the modifier validation errors of [`ModifierSet::validate`],
/// [`CalcError::UnsupportedRole`](crate::CalcError::UnsupportedRole),
/// [`CalcError::RegisterOutOfRange`](crate::CalcError::RegisterOutOfRange) and
/// [`CalcError::LaneOutOfRange`](crate::CalcError::LaneOutOfRange).
pub fn matrix_entry(
    calc: &Calculator,
    role: MatrixRole,
    register: u32,
    lane: u32,
    mods: &ModifierSet,
    output_calculation: bool,
) -> Result<MatrixEntry> {
    mods.validate(calc, role, output_calculation, QueryKind::MatrixEntry)?;
    calc.check_register_lane(role, register, lane)?;
    if role == MatrixRole::B
        && mods.blgp != 0
        && !lane_in_swizzle_image(lane, mods.blgp, calc.wave_width())
    {
        return Ok(unused(calc, role, lane, UnusedReason::Blgp));
    }
    let expand = output_calculation && role == MatrixRole::D;
    let placement_mods = if expand { mods.without_movement() } else { *mods };
    let dict = RegisterDictionary::build(calc, role, &placement_mods)?;
    let compositor = if expand {
        Some(SourceCompositor::new(calc, mods)?)
    } else {
        None
    };
    let negation = mods.negation(calc.descriptor());

    let mut lines = Vec::new();
    for slot in calc.register_slots(role, register) {
        let location = slot.at_lane(lane);
        for element in dict.get(&location).unwrap_or_default() {
            let name = element.to_string();
            let line = match &compositor {
                Some(comp) => {
                    let coord = LogicalCoordinate::from_cell(
                        role,
                        element.row,
                        element.col,
                        element.block.unwrap_or(0),
                    );
                    EntryLine {
                        location,
                        element: name,
                        source: Some(comp.element_form(&coord)?),
                    }
                }
                None => EntryLine {
                    location,
                    element: negation.decorate(role, &slot, &name),
                    source: None,
                },
            };
            lines.push(line);
        }
    }
    if lines.is_empty() {
        let broadcast = role == MatrixRole::A && !calc.descriptor().sparse && (mods.cbsz != 0 || mods.abid != 0);
        let reason = if broadcast {
            UnusedReason::CbszAbid
        } else {
            UnusedReason::Layout
        };
        return Ok(unused(calc, role, lane, reason));
    }
    Ok(MatrixEntry::Entries(lines))
}

fn corner(role: MatrixRole, transpose: bool) -> Cell {
    let (rows, cols) = match role {
        MatrixRole::A | MatrixRole::K => ("M", "K"),
        MatrixRole::B => ("K", "N"),
        MatrixRole::C | MatrixRole::D => ("M", "N"),
    };
    let (first, second) = if transpose { (cols, rows) } else { (rows, cols) };
    cell(format!("{role}[{first}][{second}]"))
}

/// Block groups sharing one table: CBSZ makes aligned A blocks identical.
fn block_groups(calc: &Calculator, role: MatrixRole, mods: &ModifierSet) -> Vec<Vec<u32>> {
    let desc = calc.descriptor();
    let blocks = desc.blocks.max(1);
    let group = if role == MatrixRole::A && !desc.sparse {
        1u32.checked_shl(mods.cbsz).unwrap_or(blocks).clamp(1, blocks)
    } else {
        1
    };
    (0..blocks)
        .step_by(group as usize)
        .map(|first| (first..(first + group).min(blocks)).collect())
        .collect()
}

fn block_title(blocks: &[u32]) -> String {
    let listed = blocks.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    if blocks.len() == 1 {
        format!("Block {listed}")
    } else {
        format!("Blocks {listed}")
    }
}

/// Location table of every element of `role`, one table per block group.
///
/// Gfx9 instructions get one table per block, titled with the block; the
/// other families get a single untitled table.
///
/// # Errors
///
/// Returns the modifier validation errors of [`ModifierSet::validate`] and
/// [`CalcError::UnsupportedRole`](crate::CalcError::UnsupportedRole).
pub fn register_layout(
    calc: &Calculator,
    role: MatrixRole,
    mods: &ModifierSet,
    transpose: bool,
) -> Result<Vec<LayoutTable>> {
    mods.validate(calc, role, false, QueryKind::RegisterLayout)?;
    calc.check_role(role)?;
    let (rows, cols) = calc.dimensions(role);
    let negation = mods.negation(calc.descriptor());
    let titled = calc.family() == Family::Gfx9;

    let mut tables = Vec::new();
    for group in block_groups(calc, role, mods) {
        let block = group.first().copied().unwrap_or(0);
        let mut header = vec![corner(role, transpose)];
        header.extend((0..cols).map(|col| cell(col.to_string())));
        let mut table = LayoutTable::with_header(header);
        for row in 0..rows {
            let mut cells = vec![cell(row.to_string())];
            for col in 0..cols {
                let coord = LogicalCoordinate::from_cell(role, row, col, block);
                let placed = calc.locate(&coord, mods)?.location;
                cells.push(
                    placed
                        .locations()
                        .map(|loc| negation.decorate(role, &placed.register, &loc.to_string()))
                        .collect(),
                );
            }
            table.push_row(cells);
        }
        if titled {
            table.title = Some(block_title(&group));
        }
        tables.push(if transpose { table.transpose() } else { table });
    }
    Ok(tables)
}

/// Element table of every register slot and lane of `role`.
///
/// Rows are the lanes that hold data, ascending; columns are register slots
/// in register order.
///
/// # Errors
///
/// Returns the modifier validation errors of [`ModifierSet::validate`] and
/// [`CalcError::UnsupportedRole`](crate::CalcError::UnsupportedRole).
pub fn matrix_layout(
    calc: &Calculator,
    role: MatrixRole,
    mods: &ModifierSet,
    transpose: bool,
) -> Result<LayoutTable> {
    mods.validate(calc, role, false, QueryKind::MatrixLayout)?;
    let dict = RegisterDictionary::build(calc, role, mods)?;
    let negation = mods.negation(calc.descriptor());

    let mut columns = BTreeSet::<RegisterSpec>::new();
    let mut by_lane = BTreeMap::<u32, BTreeMap<RegisterSpec, Cell>>::new();
    for (location, elements) in dict.iter() {
        columns.insert(location.register);
        let held = by_lane
            .entry(location.lane)
            .or_default()
            .entry(location.register)
            .or_default();
        held.extend(
            elements
                .iter()
                .map(|e| negation.decorate(role, &location.register, &e.to_string())),
        );
    }

    let mut header = vec![cell("lane")];
    header.extend(columns.iter().map(|spec| cell(spec.to_string())));
    let mut table = LayoutTable::with_header(header);
    for (lane, mut held) in by_lane {
        let mut row = vec![cell(lane.to_string())];
        row.extend(columns.iter().map(|spec| held.remove(spec).unwrap_or_default()));
        table.push_row(row);
    }
    Ok(if transpose { table.transpose() } else { table })
}

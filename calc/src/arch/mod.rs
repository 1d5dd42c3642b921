//! Per-family layout calculators.
//!
//! [`Calculator`] is the entry point: it binds one instruction descriptor to
//! one wavefront width, checks roles and bounds, and dispatches placement to
//! the family's [`ArchitectureCalculator`] through the closed [`ArchLayout`]
//! variant.

pub mod gfx11;
pub mod gfx12;
pub mod gfx9;

use mic_catalog::{Family, InstructionDescriptor};
use tracing::{debug, trace};

use crate::equation::{Axis, Equation};
use crate::error::{CalcError, Result};
use crate::modifiers::ModifierSet;
use crate::naming::{Location, RegisterSpec};
use crate::role::{Element, LogicalCoordinate, MatrixRole};

pub use gfx11::Gfx11Calculator;
pub use gfx12::Gfx12Calculator;
pub use gfx9::Gfx9Calculator;

/// Where one matrix value lives: a register (or pair, or slice) replicated
/// across one or more lanes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalLocation {
    /// Register, pair or slice.
    pub register: RegisterSpec,
    /// Every lane holding a copy, in ascending order.
    pub lanes: Vec<u32>,
}

impl PhysicalLocation {
    /// A value held by one lane.
    #[must_use]
    pub fn single(register: RegisterSpec, lane: u32) -> Self {
        Self {
            register,
            lanes: vec![lane],
        }
    }

    /// Every `(register, lane)` location.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.lanes.iter().map(|&lane| self.register.at_lane(lane))
    }
}

/// The result of [`Calculator::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Name of the located element.
    pub element: Element,
    /// Where it lives.
    pub location: PhysicalLocation,
}

/// Layout arithmetic of one hardware family.
///
/// Implementations may assume the coordinate is in bounds and the role is
/// legal; [`Calculator`] checks both before dispatching.
pub trait ArchitectureCalculator {
    /// The bound instruction.
    fn descriptor(&self) -> &InstructionDescriptor;

    /// The bound wavefront width.
    fn wave_width(&self) -> u32;

    /// Register and lanes of `coord` under `mods`.
    fn place(&self, coord: &LogicalCoordinate, mods: &ModifierSet) -> PhysicalLocation;

    /// Registers occupied by one matrix, counted in 32-bit registers.
    fn register_count(&self, role: MatrixRole) -> u32;

    /// Lanes a matrix may populate.
    fn lane_count(&self, _role: MatrixRole) -> u32 {
        self.wave_width()
    }

    /// Compression-index sets addressable by ABID or OPSEL; 0 when dense.
    fn compression_set_count(&self) -> u32;

    /// The B lane multiplied with the A value at `a_lane`, out of the lanes
    /// holding the B value.
    fn pair_b_lane(&self, a_lane: u32, b_lanes: &[u32]) -> Option<u32>;

    /// Symbolic formula of `axis` for `role`, with no modifiers applied.
    fn derive_equation(&self, role: MatrixRole, axis: Axis) -> Option<Equation>;
}

/// The closed set of family layouts.
#[derive(Debug, Clone, Copy)]
pub enum ArchLayout {
    /// CDNA1, CDNA2 and CDNA3.
    Gfx9(Gfx9Calculator),
    /// RDNA3.
    Gfx11(Gfx11Calculator),
    /// RDNA4.
    Gfx12(Gfx12Calculator),
}

impl ArchLayout {
    fn bind(desc: InstructionDescriptor, wave_width: u32) -> Self {
        match desc.arch.family() {
            Family::Gfx9 => ArchLayout::Gfx9(Gfx9Calculator::new(desc)),
            Family::Gfx11 => ArchLayout::Gfx11(Gfx11Calculator::new(desc, wave_width)),
            Family::Gfx12 => ArchLayout::Gfx12(Gfx12Calculator::new(desc, wave_width)),
        }
    }

    fn inner(&self) -> &dyn ArchitectureCalculator {
        match self {
            ArchLayout::Gfx9(calc) => calc,
            ArchLayout::Gfx11(calc) => calc,
            ArchLayout::Gfx12(calc) => calc,
        }
    }
}

impl ArchitectureCalculator for ArchLayout {
    fn descriptor(&self) -> &InstructionDescriptor {
        self.inner().descriptor()
    }

    fn wave_width(&self) -> u32 {
        self.inner().wave_width()
    }

    fn place(&self, coord: &LogicalCoordinate, mods: &ModifierSet) -> PhysicalLocation {
        self.inner().place(coord, mods)
    }

    fn register_count(&self, role: MatrixRole) -> u32 {
        self.inner().register_count(role)
    }

    fn lane_count(&self, role: MatrixRole) -> u32 {
        self.inner().lane_count(role)
    }

    fn compression_set_count(&self) -> u32 {
        self.inner().compression_set_count()
    }

    fn pair_b_lane(&self, a_lane: u32, b_lanes: &[u32]) -> Option<u32> {
        self.inner().pair_b_lane(a_lane, b_lanes)
    }

    fn derive_equation(&self, role: MatrixRole, axis: Axis) -> Option<Equation> {
        self.inner().derive_equation(role, axis)
    }
}

/// Storage width of one element of `role`; compression indices are 2 bits.
pub(crate) fn element_bits(desc: &InstructionDescriptor, role: MatrixRole) -> u32 {
    match role {
        MatrixRole::A => desc.a_type.bits(),
        MatrixRole::B => desc.b_type.bits(),
        MatrixRole::C | MatrixRole::D => desc.out_type.bits(),
        MatrixRole::K => 2,
    }
}

/// Printed `(rows, cols)` of `role`'s matrix.
pub(crate) fn dimensions(desc: &InstructionDescriptor, role: MatrixRole) -> (u32, u32) {
    match role {
        MatrixRole::A | MatrixRole::K => (desc.m, desc.stored_k()),
        MatrixRole::B => (desc.k, desc.n),
        MatrixRole::C | MatrixRole::D => (desc.m, desc.n),
    }
}


/// A layout calculator bound to one instruction and one wavefront width.
#[derive(Debug, Clone, Copy)]
pub struct Calculator {
    layout: ArchLayout,
}

impl Calculator {
    /// Binds `desc` at `wave_width`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::WaveWidthNotPermitted`] when the architecture
    /// cannot run matrix instructions at that width.
    pub fn new(desc: &InstructionDescriptor, wave_width: u32) -> Result<Self> {
        if !desc.arch.permits_wave_width(wave_width) {
            return Err(CalcError::wave_width(desc.arch, wave_width));
        }
        debug!(
            instruction = desc.mnemonic,
            arch = %desc.arch,
            wave_width,
            "bound layout calculator"
        );
        Ok(Self {
            layout: ArchLayout::bind(*desc, wave_width),
        })
    }

    /// The bound instruction.
    #[must_use]
    pub fn descriptor(&self) -> &InstructionDescriptor {
        self.layout.descriptor()
    }

    /// The bound wavefront width.
    #[must_use]
    pub fn wave_width(&self) -> u32 {
        self.layout.wave_width()
    }

    /// Layout family of the bound instruction.
    #[must_use]
    pub fn family(&self) -> Family {
        self.descriptor().arch.family()
    }

    /// The family dispatch.
    #[must_use]
    pub fn layout(&self) -> &ArchLayout {
        &self.layout
    }

    /// Storage width of one element of `role`.
    #[must_use]
    pub fn element_bits(&self, role: MatrixRole) -> u32 {
        element_bits(self.descriptor(), role)
    }

    /// Printed `(rows, cols)` of `role`'s matrix.
    #[must_use]
    pub fn dimensions(&self, role: MatrixRole) -> (u32, u32) {
        dimensions(self.descriptor(), role)
    }

    /// Depth of the reduction index for `role`: halved for sparse A and K.
    #[must_use]
    pub fn reduction_depth(&self, role: MatrixRole) -> u32 {
        match role {
            MatrixRole::A | MatrixRole::K => self.descriptor().stored_k(),
            MatrixRole::B | MatrixRole::C | MatrixRole::D => self.descriptor().k,
        }
    }

    /// Whether `role` is an operand: C only when dense, K only when sparse.
    #[must_use]
    pub fn role_supported(&self, role: MatrixRole) -> bool {
        match role {
            MatrixRole::C => !self.descriptor().sparse,
            MatrixRole::K => self.descriptor().sparse,
            MatrixRole::A | MatrixRole::B | MatrixRole::D => true,
        }
    }

    /// Fails unless `role` is an operand.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnsupportedRole`].
    pub fn check_role(&self, role: MatrixRole) -> Result<()> {
        if self.role_supported(role) {
            return Ok(());
        }
        let desc = self.descriptor();
        Err(CalcError::UnsupportedRole {
            instruction: desc.mnemonic.to_owned(),
            arch: desc.arch,
            role,
        })
    }

    /// Every coordinate of `role`, by block, then row, then column.
    #[must_use]
    pub fn coordinates(&self, role: MatrixRole) -> Vec<LogicalCoordinate> {
        let (rows, cols) = self.dimensions(role);
        let blocks = self.descriptor().blocks;
        let mut coords = Vec::with_capacity((rows * cols * blocks) as usize);
        for block in 0..blocks {
            for row in 0..rows {
                for col in 0..cols {
                    coords.push(LogicalCoordinate::from_cell(role, row, col, block));
                }
            }
        }
        coords
    }

    /// Name of the element at `coord`.
    #[must_use]
    pub fn element(&self, coord: &LogicalCoordinate) -> Element {
        Element::new(coord, self.descriptor().blocks)
    }

    fn check_bounds(&self, coord: &LogicalCoordinate) -> Result<()> {
        let desc = self.descriptor();
        let limits = [
            ("i", coord.i, desc.m),
            ("j", coord.j, desc.n),
            ("k", coord.k, self.reduction_depth(coord.role)),
            ("block", coord.block, desc.blocks),
        ];
        for (field, value, limit) in limits {
            if value >= limit {
                return Err(CalcError::out_of_bounds(desc.mnemonic, field, value, limit));
            }
        }
        Ok(())
    }

    /// Element name, register and lanes of `coord` under `mods`.
    ///
    /// Modifiers are applied but not validated; callers validate with
    /// [`ModifierSet::validate`] first.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnsupportedRole`] for a role the instruction does
    /// not have and [`CalcError::CoordinateOutOfBounds`] for an index outside
    /// the matrix.
    pub fn locate(&self, coord: &LogicalCoordinate, mods: &ModifierSet) -> Result<Placement> {
        self.check_role(coord.role)?;
        self.check_bounds(coord)?;
        let location = self.layout.place(coord, mods);
        let element = self.element(coord);
        trace!(%element, register = %location.register, lanes = ?location.lanes, "located");
        Ok(Placement { element, location })
    }

    /// Registers occupied by `role`'s matrix.
    #[must_use]
    pub fn register_count(&self, role: MatrixRole) -> u32 {
        self.layout.register_count(role)
    }

    /// Lanes `role`'s matrix may populate.
    #[must_use]
    pub fn lane_count(&self, role: MatrixRole) -> u32 {
        self.layout.lane_count(role)
    }

    /// Compression-index sets; 0 for dense instructions.
    #[must_use]
    pub fn compression_set_count(&self) -> u32 {
        self.layout.compression_set_count()
    }

    /// Whether `register` and `lane` can hold data of `role`.
    #[must_use]
    pub fn is_valid_register_lane(&self, role: MatrixRole, register: u32, lane: u32) -> bool {
        self.check_register_lane(role, register, lane).is_ok()
    }

    /// Fails unless `register` and `lane` can hold data of `role`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnsupportedRole`], [`CalcError::RegisterOutOfRange`]
    /// or [`CalcError::LaneOutOfRange`].
    pub fn check_register_lane(&self, role: MatrixRole, register: u32, lane: u32) -> Result<()> {
        self.check_role(role)?;
        let instruction = self.descriptor().mnemonic.to_owned();
        let registers = self.register_count(role);
        if register >= registers {
            return Err(CalcError::RegisterOutOfRange {
                instruction,
                role,
                register,
                max: registers.saturating_sub(1),
            });
        }
        let lanes = self.lane_count(role);
        if lane >= lanes {
            return Err(CalcError::LaneOutOfRange {
                instruction,
                role,
                lane,
                max: lanes.saturating_sub(1),
            });
        }
        Ok(())
    }

    /// Every storage slot of `role` data inside 32-bit register `register`.
    ///
    /// A 64-bit pair is named once, from either of its registers.
    #[must_use]
    pub fn register_slots(&self, role: MatrixRole, register: u32) -> Vec<RegisterSpec> {
        let bits = self.element_bits(role);
        match bits {
            64 => vec![RegisterSpec::Pair(register / 2)],
            32 => vec![RegisterSpec::Whole(register)],
            _ => {
                let width = bits.max(1);
                (0..32 / width)
                    .map(|n| RegisterSpec::Slice {
                        register,
                        low: n * width,
                        width,
                    })
                    .collect()
            }
        }
    }

    /// The B lane multiplied with the A value at `a_lane`.
    pub(crate) fn pair_b_lane(&self, a_lane: u32, b_lanes: &[u32]) -> Option<u32> {
        self.layout.pair_b_lane(a_lane, b_lanes)
    }

    /// Symbolic formula of `axis` for `role` at `wave_width`.
    ///
    /// Returns `Ok(None)` when the axis does not apply to the role, for
    /// example `j` of the A matrix or `block` of a single-block instruction.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::WaveWidthNotPermitted`] or
    /// [`CalcError::UnsupportedRole`].
    pub fn derive_equation(&self, role: MatrixRole, axis: Axis, wave_width: u32) -> Result<Option<Equation>> {
        self.check_role(role)?;
        if wave_width == self.wave_width() {
            return Ok(self.layout.derive_equation(role, axis));
        }
        let rebound = Calculator::new(self.descriptor(), wave_width)?;
        Ok(rebound.layout.derive_equation(role, axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mic_catalog::{Architecture, Catalog};

    fn calc(arch: Architecture, mnemonic: &str, wave: u32) -> Calculator {
        let desc = Catalog::full().find(arch, mnemonic).expect("instruction in catalog");
        Calculator::new(desc, wave).expect("permitted wave width")
    }

    #[test]
    fn wave_width_is_checked_on_bind() {
        let desc = Catalog::full()
            .find(Architecture::Cdna2, "v_mfma_f32_32x32x8f16")
            .expect("instruction in catalog");
        assert!(matches!(
            Calculator::new(desc, 32),
            Err(CalcError::WaveWidthNotPermitted { wave_width: 32, .. })
        ));
    }

    #[test]
    fn roles_follow_sparsity() {
        let dense = calc(Architecture::Cdna3, "v_mfma_f32_16x16x16_f16", 64);
        let sparse = calc(Architecture::Cdna3, "v_smfmac_f32_16x16x32_f16", 64);
        assert!(dense.role_supported(MatrixRole::C) && !dense.role_supported(MatrixRole::K));
        assert!(!sparse.role_supported(MatrixRole::C) && sparse.role_supported(MatrixRole::K));
    }

    #[test]
    fn bounds_are_reported_per_field() {
        let c = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 32);
        let err = c
            .locate(&LogicalCoordinate::new(MatrixRole::A, 0, 0, 16, 0), &ModifierSet::default())
            .unwrap_err();
        assert!(matches!(err, CalcError::CoordinateOutOfBounds { field: "k", max: 15, .. }));
    }

    #[test]
    fn coordinates_cover_every_cell() {
        let c = calc(Architecture::Cdna1, "v_mfma_f32_16x16x1f32", 64);
        assert_eq!(c.coordinates(MatrixRole::A).len(), 16 * 4);
        assert_eq!(c.coordinates(MatrixRole::D).len(), 16 * 16 * 4);
    }

    #[test]
    fn register_slots_per_width() {
        let c = calc(Architecture::Cdna2, "v_mfma_f64_16x16x4f64", 64);
        assert_eq!(c.register_slots(MatrixRole::A, 1), vec![RegisterSpec::Pair(0)]);
        let h = calc(Architecture::Cdna2, "v_mfma_f32_32x32x8f16", 64);
        assert_eq!(h.register_slots(MatrixRole::A, 1).len(), 2);
        assert_eq!(h.register_slots(MatrixRole::D, 3), vec![RegisterSpec::Whole(3)]);
    }

    #[test]
    fn register_lane_checks() {
        let c = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 32);
        assert!(c.is_valid_register_lane(MatrixRole::D, 7, 31));
        assert!(matches!(
            c.check_register_lane(MatrixRole::D, 8, 0),
            Err(CalcError::RegisterOutOfRange { max: 7, .. })
        ));
        assert!(matches!(
            c.check_register_lane(MatrixRole::D, 0, 32),
            Err(CalcError::LaneOutOfRange { max: 31, .. })
        ));
    }
}

//! CDNA1, CDNA2 and CDNA3 (MFMA and SMFMAC) register layouts.
//!
//! Every operand spans the full 64-lane wavefront.
//!
//! Inputs place the outer index (row of A, column of B) and the block in the
//! low lanes; the reduction index fills first the slots of one lane, then the
//! next group of `outer x blocks` lanes.
//!
//! Outputs tile rows in groups of four (one for 64-bit data). Each register
//! covers `64 / N` such groups, and small blocks share a register side by side.

use mic_catalog::InstructionDescriptor;

use crate::arch::{dimensions, element_bits, ArchitectureCalculator, PhysicalLocation};
use crate::equation::{
    slot_of_register, Axis, Equation, Expr, RegisterExpr, VAR_BLOCK, VAR_GPR_BITS, VAR_I, VAR_J, VAR_K,
    VAR_LANE,
};
use crate::modifiers::ModifierSet;
use crate::naming::RegisterSpec;
use crate::role::{LogicalCoordinate, MatrixRole};
use crate::transform::{block_broadcast, lane_swizzle};

const LANES: u32 = 64;

/// Layout calculator of the Gfx9 family.
#[derive(Debug, Clone, Copy)]
pub struct Gfx9Calculator {
    desc: InstructionDescriptor,
}

/// Placement constants of an input operand.
#[derive(Debug, Clone, Copy)]
struct InputGeometry {
    outer: u32,
    blocks: u32,
    per_lane: u32,
}

impl InputGeometry {
    fn lane(&self, outer_index: u32, k: u32, block: u32) -> u32 {
        block * self.outer + (k / self.per_lane) * self.outer * self.blocks + outer_index
    }
}

/// Placement constants of the C and D operands.
#[derive(Debug, Clone, Copy)]
struct OutputGeometry {
    /// Rows sharing one lane, in consecutive registers.
    tile: u32,
    /// Row tiles per register.
    tiles_per_register: u32,
    /// Blocks side by side in one register.
    blocks_per_register: u32,
    /// Registers (slots) per block; 0 when several blocks share one.
    slots_per_block: u32,
    n: u32,
}

impl Gfx9Calculator {
    /// Binds `desc`; Gfx9 always runs at wave64.
    #[must_use]
    pub fn new(desc: InstructionDescriptor) -> Self {
        Self { desc }
    }

    fn input_geometry(&self, role: MatrixRole) -> InputGeometry {
        let (outer, depth) = match role {
            MatrixRole::B => (self.desc.n, self.desc.k),
            _ => (self.desc.m, self.desc.stored_k()),
        };
        let outer = outer.max(1);
        let blocks = self.desc.blocks.max(1);
        let groups = (LANES / (outer * blocks)).max(1);
        InputGeometry {
            outer,
            blocks,
            per_lane: (depth / groups).max(1),
        }
    }

    fn output_geometry(&self) -> OutputGeometry {
        let tile = if self.desc.out_type.bits() == 64 { 1 } else { 4 };
        let n = self.desc.n.max(1);
        let m = self.desc.m;
        OutputGeometry {
            tile,
            tiles_per_register: (LANES / n).max(1),
            blocks_per_register: LANES.div_ceil((n * m / tile).max(1)),
            slots_per_block: m * n / LANES,
            n,
        }
    }

    /// Stored A values per lane, which also counts the indices of one set.
    fn index_per_lane(&self) -> u32 {
        self.input_geometry(MatrixRole::A).per_lane
    }

    fn index_set_bits(&self) -> u32 {
        2 * self.index_per_lane()
    }

    fn place_output(&self, coord: &LogicalCoordinate) -> PhysicalLocation {
        let g = self.output_geometry();
        let slot = coord.block * g.slots_per_block
            + (coord.i / (g.tile * g.tiles_per_register)) * g.tile
            + coord.i % g.tile;
        let lane = (coord.block % g.blocks_per_register) * g.n
            + ((coord.i / g.tile) % g.tiles_per_register) * g.blocks_per_register * g.n
            + coord.j;
        PhysicalLocation::single(RegisterSpec::for_slot(self.desc.out_type.bits(), slot), lane)
    }
}

impl ArchitectureCalculator for Gfx9Calculator {
    fn descriptor(&self) -> &InstructionDescriptor {
        &self.desc
    }

    fn wave_width(&self) -> u32 {
        LANES
    }

    fn place(&self, coord: &LogicalCoordinate, mods: &ModifierSet) -> PhysicalLocation {
        let bits = element_bits(&self.desc, coord.role);
        match coord.role {
            MatrixRole::A => {
                let g = self.input_geometry(MatrixRole::A);
                let block = if self.desc.sparse {
                    coord.block
                } else {
                    block_broadcast(coord.block, mods.cbsz, mods.abid)
                };
                let register = RegisterSpec::for_slot(bits, coord.k % g.per_lane);
                PhysicalLocation::single(register, g.lane(coord.i, coord.k, block))
            }
            MatrixRole::B => {
                let g = self.input_geometry(MatrixRole::B);
                let register = RegisterSpec::for_slot(bits, coord.k % g.per_lane);
                let lane = lane_swizzle(g.lane(coord.j, coord.k, coord.block), mods.blgp);
                PhysicalLocation::single(register, lane)
            }
            MatrixRole::K => {
                let g = self.input_geometry(MatrixRole::A);
                let register = RegisterSpec::Slice {
                    register: 0,
                    low: mods.abid * self.index_set_bits() + 2 * (coord.k % g.per_lane),
                    width: 2,
                };
                PhysicalLocation::single(register, g.lane(coord.i, coord.k, coord.block))
            }
            MatrixRole::C | MatrixRole::D => self.place_output(coord),
        }
    }

    fn register_count(&self, role: MatrixRole) -> u32 {
        if role == MatrixRole::K {
            return 1;
        }
        let (rows, cols) = dimensions(&self.desc, role);
        (rows * cols * self.desc.blocks * element_bits(&self.desc, role) / (LANES * 32)).max(1)
    }

    fn compression_set_count(&self) -> u32 {
        if !self.desc.sparse {
            return 0;
        }
        (32 / self.index_set_bits().max(1)).max(1)
    }

    fn pair_b_lane(&self, _a_lane: u32, b_lanes: &[u32]) -> Option<u32> {
        b_lanes.first().copied()
    }

    fn derive_equation(&self, role: MatrixRole, axis: Axis) -> Option<Equation> {
        let d = &self.desc;
        let block = Expr::bounded(VAR_BLOCK, d.blocks);
        let lane = Expr::bounded(VAR_LANE, LANES);
        if axis == Axis::Block && d.blocks <= 1 {
            return None;
        }
        match role {
            MatrixRole::A | MatrixRole::B | MatrixRole::K => {
                let g = self.input_geometry(if role == MatrixRole::B { role } else { MatrixRole::A });
                let (outer_name, outer_axis) = if role == MatrixRole::B {
                    (VAR_J, Axis::J)
                } else {
                    (VAR_I, Axis::I)
                };
                let outer = Expr::bounded(outer_name, g.outer);
                let k = Expr::bounded(VAR_K, if role == MatrixRole::B { d.k } else { d.stored_k() });
                let slot = if role == MatrixRole::K {
                    Expr::bounded(VAR_GPR_BITS, 32).div(2).rem(g.per_lane)
                } else {
                    slot_of_register(element_bits(d, role), self.register_count(role))
                };
                match axis {
                    Axis::Register => Some(Equation::Register(if role == MatrixRole::K {
                        RegisterExpr::Slice {
                            register: Expr::constant(0),
                            low: k.rem(g.per_lane).scale(2),
                            width: 2,
                        }
                    } else {
                        RegisterExpr::for_slot(element_bits(d, role), k.rem(g.per_lane))
                    })),
                    Axis::Lane => Some(Equation::Lanes(vec![Expr::sum([
                        block.scale(g.outer),
                        k.div(g.per_lane).scale(g.outer * g.blocks),
                        outer,
                    ])])),
                    Axis::K => Some(Equation::Value(
                        lane.div(g.outer * g.blocks).scale(g.per_lane).plus(slot),
                    )),
                    Axis::Block => Some(Equation::Value(lane.div(g.outer).rem(g.blocks))),
                    axis if axis == outer_axis => Some(Equation::Value(lane.rem(g.outer))),
                    _ => None,
                }
            }
            MatrixRole::C | MatrixRole::D => {
                let g = self.output_geometry();
                let bits = d.out_type.bits();
                let i = Expr::bounded(VAR_I, d.m);
                let j = Expr::bounded(VAR_J, d.n);
                let slot = slot_of_register(bits, self.register_count(role));
                match axis {
                    Axis::Register => Some(Equation::Register(RegisterExpr::for_slot(
                        bits,
                        Expr::sum([
                            block.scale(g.slots_per_block),
                            i.clone().div(g.tile * g.tiles_per_register).scale(g.tile),
                            i.rem(g.tile),
                        ]),
                    ))),
                    Axis::Lane => Some(Equation::Lanes(vec![Expr::sum([
                        block.rem(g.blocks_per_register).scale(g.n),
                        i.div(g.tile).rem(g.tiles_per_register).scale(g.blocks_per_register * g.n),
                        j,
                    ])])),
                    Axis::I => {
                        let within_block = if g.slots_per_block > 0 {
                            slot.clone().rem(g.slots_per_block)
                        } else {
                            slot.clone()
                        };
                        Some(Equation::Value(Expr::sum([
                            within_block.div(g.tile).scale(g.tile * g.tiles_per_register),
                            lane.div(g.blocks_per_register * g.n)
                                .rem(g.tiles_per_register)
                                .scale(g.tile),
                            slot.rem(g.tile),
                        ])))
                    }
                    Axis::J => Some(Equation::Value(lane.rem(g.n))),
                    Axis::Block => Some(Equation::Value(if g.slots_per_block > 0 {
                        slot.div(g.slots_per_block)
                    } else {
                        lane.div(g.n).rem(g.blocks_per_register)
                    })),
                    Axis::K => None,
                }
            }
        }
    }
}

//! RDNA4 (WMMA and SWMMAC) register layouts.
//!
//! RDNA4 stops replicating inputs. The reduction depth is cut into k-groups
//! of four values (eight for 4-bit data) that rotate through the 16-lane
//! groups of the wavefront, so a wider wave holds fewer slots per lane.
//! Outputs place consecutive rows in consecutive slots and advance the lane
//! group every `16 / groups` rows; 16-bit results are packed two per register.
//!
//! Two 4-bit instructions keep their wave32 placement in wave64 for some
//! operands, leaving lanes 32-63 of those operands empty.

use mic_catalog::InstructionDescriptor;

use crate::arch::{dimensions, element_bits, ArchitectureCalculator, PhysicalLocation};
use crate::equation::{
    slot_of_register, Axis, Equation, Expr, RegisterExpr, VAR_GPR_BITS, VAR_I, VAR_J, VAR_K, VAR_LANE,
};
use crate::modifiers::ModifierSet;
use crate::naming::RegisterSpec;
use crate::role::{LogicalCoordinate, MatrixRole};

/// Operands that populate only lanes 0-31 in wave64.
const HALF_POPULATED: &[(&str, &[MatrixRole])] = &[
    ("v_wmma_i32_16x16x16_iu4", &[MatrixRole::A, MatrixRole::B]),
    ("v_swmmac_i32_16x16x32_iu4", &[MatrixRole::A, MatrixRole::K]),
];

/// Layout calculator of the Gfx12 family.
#[derive(Debug, Clone, Copy)]
pub struct Gfx12Calculator {
    desc: InstructionDescriptor,
    wave_width: u32,
}

/// Placement constants of an input operand.
#[derive(Debug, Clone, Copy)]
struct InputGeometry {
    /// Consecutive k values kept together in one lane.
    k_group: u32,
    /// 16-lane groups the k-groups rotate through.
    lane_groups: u32,
}

impl InputGeometry {
    fn lane(&self, outer: u32, k: u32) -> u32 {
        outer + 16 * ((k / self.k_group) % self.lane_groups)
    }

    fn slot(&self, k: u32) -> u32 {
        (k / (self.k_group * self.lane_groups)) * self.k_group + k % self.k_group
    }
}

impl Gfx12Calculator {
    /// Binds `desc` at `wave_width`.
    #[must_use]
    pub fn new(desc: InstructionDescriptor, wave_width: u32) -> Self {
        Self { desc, wave_width }
    }

    /// Whether `role` keeps its wave32 placement in wave64.
    #[must_use]
    pub fn is_half_populated(&self, role: MatrixRole) -> bool {
        self.wave_width == 64
            && HALF_POPULATED
                .iter()
                .any(|(mnemonic, roles)| *mnemonic == self.desc.mnemonic && roles.contains(&role))
    }

    fn lane_groups(&self, role: MatrixRole) -> u32 {
        if self.is_half_populated(role) {
            2
        } else {
            (self.wave_width / 16).max(1)
        }
    }

    /// Geometry of an input role; the K role follows A.
    fn input_geometry(&self, role: MatrixRole) -> InputGeometry {
        let data_role = if role == MatrixRole::B { MatrixRole::B } else { MatrixRole::A };
        let k_group = if element_bits(&self.desc, data_role) == 4 { 8 } else { 4 };
        InputGeometry {
            k_group,
            lane_groups: self.lane_groups(role),
        }
    }

    fn rows_per_lane_group(&self) -> u32 {
        (16 / self.lane_groups(MatrixRole::D)).max(1)
    }

    /// Stored A values per lane; each has one 2-bit index per set.
    fn index_per_lane(&self) -> u32 {
        let groups = self.lane_groups(MatrixRole::K);
        (self.desc.m * self.desc.stored_k() / (16 * groups)).max(1)
    }

    fn index_sets(&self) -> u32 {
        (32 / (2 * self.index_per_lane())).max(1)
    }

    fn input_outer_axis(role: MatrixRole) -> (&'static str, Axis) {
        if role == MatrixRole::B {
            (VAR_J, Axis::J)
        } else {
            (VAR_I, Axis::I)
        }
    }
}

impl ArchitectureCalculator for Gfx12Calculator {
    fn descriptor(&self) -> &InstructionDescriptor {
        &self.desc
    }

    fn wave_width(&self) -> u32 {
        self.wave_width
    }

    fn place(&self, coord: &LogicalCoordinate, mods: &ModifierSet) -> PhysicalLocation {
        let bits = element_bits(&self.desc, coord.role);
        match coord.role {
            MatrixRole::A | MatrixRole::B => {
                let g = self.input_geometry(coord.role);
                let outer = if coord.role == MatrixRole::B { coord.j } else { coord.i };
                PhysicalLocation::single(RegisterSpec::for_slot(bits, g.slot(coord.k)), g.lane(outer, coord.k))
            }
            MatrixRole::K => {
                let g = self.input_geometry(MatrixRole::K);
                let register = RegisterSpec::Slice {
                    register: 0,
                    low: mods.opsel * (32 / self.index_sets()) + 2 * g.slot(coord.k),
                    width: 2,
                };
                PhysicalLocation::single(register, g.lane(coord.i, coord.k))
            }
            MatrixRole::C | MatrixRole::D => {
                let rows = self.rows_per_lane_group();
                let lane = coord.j + 16 * (coord.i / rows);
                PhysicalLocation::single(RegisterSpec::for_slot(bits, coord.i % rows), lane)
            }
        }
    }

    fn register_count(&self, role: MatrixRole) -> u32 {
        let d = &self.desc;
        match role {
            MatrixRole::A | MatrixRole::B => {
                let (rows, cols) = dimensions(d, role);
                (rows * cols * element_bits(d, role) / (16 * self.lane_groups(role) * 32)).max(1)
            }
            MatrixRole::C | MatrixRole::D => {
                (d.m * d.n * d.out_type.bits() / (self.wave_width * 32)).max(1)
            }
            MatrixRole::K => 1,
        }
    }

    fn lane_count(&self, role: MatrixRole) -> u32 {
        if self.is_half_populated(role) {
            32
        } else {
            self.wave_width
        }
    }

    fn compression_set_count(&self) -> u32 {
        if self.desc.sparse {
            self.index_sets()
        } else {
            0
        }
    }

    fn pair_b_lane(&self, a_lane: u32, _b_lanes: &[u32]) -> Option<u32> {
        Some(a_lane)
    }

    fn derive_equation(&self, role: MatrixRole, axis: Axis) -> Option<Equation> {
        let d = &self.desc;
        let lane = Expr::bounded(VAR_LANE, self.lane_count(role));
        match role {
            MatrixRole::A | MatrixRole::B | MatrixRole::K => {
                let g = self.input_geometry(role);
                let (outer_name, outer_axis) = Self::input_outer_axis(role);
                let depth = if role == MatrixRole::B { d.k } else { d.stored_k() };
                let outer_bound = if role == MatrixRole::B { d.n } else { d.m };
                let k = Expr::bounded(VAR_K, depth);
                let slot_of_k = k
                    .clone()
                    .div(g.k_group * g.lane_groups)
                    .scale(g.k_group)
                    .plus(k.clone().rem(g.k_group));
                let lane_of_k = Expr::bounded(outer_name, outer_bound)
                    .plus(k.div(g.k_group).rem(g.lane_groups).scale(16));
                let slot = if role == MatrixRole::K {
                    Expr::bounded(VAR_GPR_BITS, 32).div(2)
                } else {
                    slot_of_register(element_bits(d, role), self.register_count(role))
                };
                match axis {
                    Axis::Register => Some(Equation::Register(if role == MatrixRole::K {
                        RegisterExpr::Slice {
                            register: Expr::constant(0),
                            low: slot_of_k.scale(2),
                            width: 2,
                        }
                    } else {
                        RegisterExpr::for_slot(element_bits(d, role), slot_of_k)
                    })),
                    Axis::Lane => Some(Equation::Lanes(vec![lane_of_k])),
                    Axis::K => Some(Equation::Value(Expr::sum([
                        slot.clone().div(g.k_group).scale(g.k_group * g.lane_groups),
                        lane.div(16).rem(g.lane_groups).scale(g.k_group),
                        slot.rem(g.k_group),
                    ]))),
                    axis if axis == outer_axis => Some(Equation::Value(lane.rem(16))),
                    _ => None,
                }
            }
            MatrixRole::C | MatrixRole::D => {
                let rows = self.rows_per_lane_group();
                let bits = d.out_type.bits();
                let i = Expr::bounded(VAR_I, d.m);
                match axis {
                    Axis::Register => Some(Equation::Register(RegisterExpr::for_slot(bits, i.rem(rows)))),
                    Axis::Lane => Some(Equation::Lanes(vec![Expr::bounded(VAR_J, d.n).plus(i.div(rows).scale(16))])),
                    Axis::I => Some(Equation::Value(
                        lane.div(16)
                            .scale(rows)
                            .plus(slot_of_register(bits, self.register_count(role))),
                    )),
                    Axis::J => Some(Equation::Value(lane.rem(16))),
                    Axis::K | Axis::Block => None,
                }
            }
        }
    }
}

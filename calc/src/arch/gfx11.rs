//! RDNA3 (WMMA) register layouts.
//!
//! Inputs hold one row of A (or column of B) per 16-lane group, with the
//! whole reduction depth in consecutive slots, and replicate it into every
//! 16-lane group of the wavefront. Outputs interleave rows across the lane
//! groups; 16-bit outputs use one half of each register, chosen by OPSEL[2].

use mic_catalog::InstructionDescriptor;

use crate::arch::{dimensions, element_bits, ArchitectureCalculator, PhysicalLocation};
use crate::equation::{
    slot_of_register, Axis, Equation, Expr, RegisterExpr, VAR_GPR_NUM, VAR_I, VAR_J, VAR_K, VAR_LANE,
};
use crate::modifiers::ModifierSet;
use crate::naming::RegisterSpec;
use crate::role::{LogicalCoordinate, MatrixRole};

/// Layout calculator of the Gfx11 family.
#[derive(Debug, Clone, Copy)]
pub struct Gfx11Calculator {
    desc: InstructionDescriptor,
    wave_width: u32,
}

impl Gfx11Calculator {
    /// Binds `desc` at `wave_width`.
    #[must_use]
    pub fn new(desc: InstructionDescriptor, wave_width: u32) -> Self {
        Self { desc, wave_width }
    }

    fn lane_groups(&self) -> u32 {
        (self.wave_width / 16).max(1)
    }

    /// Slot stride between output rows: 16-bit results skip the other half.
    fn output_skip(&self) -> u32 {
        if self.desc.out_type.bits() == 16 {
            2
        } else {
            1
        }
    }
}

impl ArchitectureCalculator for Gfx11Calculator {
    fn descriptor(&self) -> &InstructionDescriptor {
        &self.desc
    }

    fn wave_width(&self) -> u32 {
        self.wave_width
    }

    fn place(&self, coord: &LogicalCoordinate, mods: &ModifierSet) -> PhysicalLocation {
        let bits = element_bits(&self.desc, coord.role);
        let groups = self.lane_groups();
        match coord.role {
            MatrixRole::A | MatrixRole::B => {
                let outer = if coord.role == MatrixRole::B { coord.j } else { coord.i };
                PhysicalLocation {
                    register: RegisterSpec::for_slot(bits, coord.k),
                    lanes: (0..groups).map(|group| outer + 16 * group).collect(),
                }
            }
            // No compression index exists on Gfx11; the role check rejects K
            // before placement, and a direct call places it nowhere.
            MatrixRole::K => PhysicalLocation {
                register: RegisterSpec::Whole(0),
                lanes: Vec::new(),
            },
            MatrixRole::C | MatrixRole::D => {
                let skip = self.output_skip();
                let half = if skip == 2 { (mods.opsel >> 2) & 1 } else { 0 };
                let slot = skip * (coord.i / groups) + half;
                let lane = 16 * (coord.i % groups) + coord.j;
                PhysicalLocation::single(RegisterSpec::for_slot(bits, slot), lane)
            }
        }
    }

    fn register_count(&self, role: MatrixRole) -> u32 {
        let d = &self.desc;
        match role {
            MatrixRole::A | MatrixRole::B => {
                let (rows, cols) = dimensions(d, role);
                (rows * cols * element_bits(d, role) / 512).max(1)
            }
            MatrixRole::C | MatrixRole::D => (d.m * d.n / self.wave_width).max(1),
            MatrixRole::K => 1,
        }
    }

    fn compression_set_count(&self) -> u32 {
        0
    }

    fn pair_b_lane(&self, a_lane: u32, _b_lanes: &[u32]) -> Option<u32> {
        Some(a_lane)
    }

    fn derive_equation(&self, role: MatrixRole, axis: Axis) -> Option<Equation> {
        let d = &self.desc;
        let groups = self.lane_groups();
        let lane = Expr::bounded(VAR_LANE, self.wave_width);
        match role {
            MatrixRole::A | MatrixRole::B => {
                let bits = element_bits(d, role);
                let (outer_name, outer_axis, outer_bound) = if role == MatrixRole::B {
                    (VAR_J, Axis::J, d.n)
                } else {
                    (VAR_I, Axis::I, d.m)
                };
                let outer = Expr::bounded(outer_name, outer_bound);
                match axis {
                    Axis::Register => Some(Equation::Register(RegisterExpr::for_slot(
                        bits,
                        Expr::bounded(VAR_K, d.k),
                    ))),
                    Axis::Lane => Some(Equation::Lanes(
                        (0..groups)
                            .map(|group| outer.clone().plus(Expr::constant(16 * group)))
                            .collect(),
                    )),
                    Axis::K => Some(Equation::Value(slot_of_register(bits, self.register_count(role)))),
                    axis if axis == outer_axis => Some(Equation::Value(lane.rem(16))),
                    _ => None,
                }
            }
            MatrixRole::C | MatrixRole::D => {
                let bits = d.out_type.bits();
                let i = Expr::bounded(VAR_I, d.m);
                let j = Expr::bounded(VAR_J, d.n);
                match axis {
                    Axis::Register => Some(Equation::Register(RegisterExpr::for_slot(
                        bits,
                        i.div(groups).scale(self.output_skip()),
                    ))),
                    Axis::Lane => Some(Equation::Lanes(vec![i.rem(groups).scale(16).plus(j)])),
                    Axis::I => {
                        let register = Expr::bounded(VAR_GPR_NUM, self.register_count(role));
                        Some(Equation::Value(register.scale(groups).plus(lane.div(16))))
                    }
                    Axis::J => Some(Equation::Value(lane.rem(16))),
                    Axis::K | Axis::Block => None,
                }
            }
            MatrixRole::K => None,
        }
    }
}

//! Canonical register and location names.
//!
//! A register holds one 32-bit value per lane. Narrower elements occupy a bit
//! slice of a register and 64-bit elements occupy an aligned register pair.
//! The rendered forms are:
//!
//! | element width | register | with lane 17 |
//! |---|---|---|
//! | 64 | `v[3:2]` | `v[3:2]{17}` |
//! | 32 | `v1` | `v1{17}` |
//! | 8 | `v0.[23:16]` | `v0{17}.[23:16]` |

use std::fmt;

/// A register, register pair or register bit slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterSpec {
    /// A full 32-bit register.
    Whole(u32),
    /// The pair `v[2n+1:2n]` holding 64-bit slot `n`.
    Pair(u32),
    /// Bits `[low + width - 1 : low]` of one register.
    Slice {
        /// Register number.
        register: u32,
        /// Lowest bit of the slice.
        low: u32,
        /// Width of the slice in bits.
        width: u32,
    },
}

impl RegisterSpec {
    /// Names storage slot `slot` for elements `bits` wide.
    ///
    /// Slots count elements, not registers: slot 2 of 8-bit data is
    /// `v0.[23:16]`, slot 2 of 64-bit data is `v[5:4]`.
    #[must_use]
    pub fn for_slot(bits: u32, slot: u32) -> Self {
        match bits {
            64 => RegisterSpec::Pair(slot),
            32 => RegisterSpec::Whole(slot),
            _ => {
                let per_register = 32 / bits.max(1);
                RegisterSpec::Slice {
                    register: slot / per_register,
                    low: (slot % per_register) * bits,
                    width: bits,
                }
            }
        }
    }

    /// Lowest register number touched.
    #[must_use]
    pub fn base_register(&self) -> u32 {
        match *self {
            RegisterSpec::Whole(register) => register,
            RegisterSpec::Pair(slot) => slot * 2,
            RegisterSpec::Slice { register, .. } => register,
        }
    }

    /// `(high, low)` bit range of a slice.
    #[must_use]
    pub fn bit_range(&self) -> Option<(u32, u32)> {
        match *self {
            RegisterSpec::Slice { low, width, .. } => Some((low + width - 1, low)),
            RegisterSpec::Whole(_) | RegisterSpec::Pair(_) => None,
        }
    }

    /// Whether this is bits `[15:0]`.
    #[must_use]
    pub fn is_low_half(&self) -> bool {
        self.bit_range() == Some((15, 0))
    }

    /// Whether this is bits `[31:16]`.
    #[must_use]
    pub fn is_high_half(&self) -> bool {
        self.bit_range() == Some((31, 16))
    }

    /// Places the register at one lane.
    #[must_use]
    pub fn at_lane(self, lane: u32) -> Location {
        Location {
            register: self,
            lane,
        }
    }

    fn write_register(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RegisterSpec::Whole(register) | RegisterSpec::Slice { register, .. } => {
                write!(f, "v{register}")
            }
            RegisterSpec::Pair(slot) => write!(f, "v[{}:{}]", slot * 2 + 1, slot * 2),
        }
    }

    fn write_bits(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bit_range() {
            Some((high, low)) => write!(f, ".[{high}:{low}]"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RegisterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_register(f)?;
        self.write_bits(f)
    }
}

/// One register (or slice) at one lane: the key of a reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Register, pair or slice.
    pub register: RegisterSpec,
    /// Wavefront lane.
    pub lane: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.register.write_register(f)?;
        write!(f, "{{{}}}", self.lane)?;
        self.register.write_bits(f)
    }
}

//! Instruction modifier fields, their legality rules and negation flags.

use std::fmt;

use mic_catalog::{Architecture, Family, InstructionDescriptor};

use crate::arch::Calculator;
use crate::error::{CalcError, Result};
use crate::naming::RegisterSpec;
use crate::role::MatrixRole;

/// One modifier field of the instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Broadcast group size selector.
    Cbsz,
    /// Broadcast source block (or compression-set on CDNA3 sparse).
    Abid,
    /// B-matrix lane swizzle.
    Blgp,
    /// Operand select (output half on RDNA3, compression-set on RDNA4 sparse).
    Opsel,
    /// Low-half / whole negation.
    Neg,
    /// High-half negation and C absolute value.
    NegHi,
}

impl Modifier {
    /// Field name as written in the ISA guide.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Cbsz => "CBSZ",
            Modifier::Abid => "ABID",
            Modifier::Blgp => "BLGP",
            Modifier::Opsel => "OPSEL",
            Modifier::Neg => "NEG",
            Modifier::NegHi => "NEG_HI",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The query a modifier set is validated for.
///
/// NEG on the D matrix is only meaningful when a query expands D into its
/// sources, which the single-value queries do and the layouts do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Coordinate to location.
    GetRegister,
    /// Location to coordinates.
    MatrixEntry,
    /// Whole-matrix coordinate table.
    RegisterLayout,
    /// Whole-matrix register/lane table.
    MatrixLayout,
}

/// Raw modifier values of one instruction encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet {
    /// CBSZ.
    pub cbsz: u32,
    /// ABID.
    pub abid: u32,
    /// BLGP.
    pub blgp: u32,
    /// OPSEL.
    pub opsel: u32,
    /// NEG.
    pub neg: u32,
    /// NEG_HI.
    pub neg_hi: u32,
}

impl ModifierSet {
    /// The fields that move the A operand: CBSZ and ABID.
    #[must_use]
    pub fn a_only(&self) -> Self {
        Self {
            cbsz: self.cbsz,
            abid: self.abid,
            ..Self::default()
        }
    }

    /// The field that moves the B operand: BLGP.
    #[must_use]
    pub fn b_only(&self) -> Self {
        Self {
            blgp: self.blgp,
            ..Self::default()
        }
    }

    /// The field that moves the C operand: OPSEL.
    #[must_use]
    pub fn c_only(&self) -> Self {
        Self {
            opsel: self.opsel,
            ..Self::default()
        }
    }

    /// The fields that select a compression-index set: ABID or OPSEL.
    #[must_use]
    pub fn index_only(&self) -> Self {
        Self {
            abid: self.abid,
            opsel: self.opsel,
            ..Self::default()
        }
    }

    /// The set with the data-moving fields cleared, keeping OPSEL and NEG.
    #[must_use]
    pub fn without_movement(&self) -> Self {
        Self {
            cbsz: 0,
            abid: 0,
            blgp: 0,
            ..*self
        }
    }

    /// Checks every non-zero field against the instruction, role and query.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::ModifierNotSupported`] when the instruction lacks
    /// the capability, [`CalcError::ModifierNotApplicable`] when the field is
    /// not legal on `role` (or on D without output calculation),
    /// [`CalcError::ModifierOutOfRange`] when a value exceeds its bound and
    /// [`CalcError::InvalidModifierValue`] for forbidden bit patterns.
    pub fn validate(
        &self,
        calc: &Calculator,
        role: MatrixRole,
        output_calculation: bool,
        query: QueryKind,
    ) -> Result<()> {
        let check = Checker {
            desc: calc.descriptor(),
            sets: calc.compression_set_count(),
            role,
            expanded_d: role == MatrixRole::D && output_calculation,
        };
        check.cbsz(self.cbsz)?;
        check.abid(self.abid, self.cbsz)?;
        check.blgp(self.blgp)?;
        check.opsel(self.opsel)?;
        check.neg(self.neg, self.neg_hi, output_calculation, query)
    }

    /// Negation flags for this set on `desc`.
    #[must_use]
    pub fn negation(&self, desc: &InstructionDescriptor) -> Negation {
        if desc.arch.family() == Family::Gfx9 {
            if desc.neg {
                return Negation::whole(self.neg);
            }
            return Negation::default();
        }
        Negation::from_fields(self.neg, self.neg_hi)
    }
}

struct Checker<'a> {
    desc: &'a InstructionDescriptor,
    sets: u32,
    role: MatrixRole,
    expanded_d: bool,
}

impl Checker<'_> {
    fn instruction(&self) -> String {
        self.desc.mnemonic.to_owned()
    }

    fn arch(&self) -> Architecture {
        self.desc.arch
    }

    fn not_supported(&self, field: Modifier) -> CalcError {
        CalcError::ModifierNotSupported {
            instruction: self.instruction(),
            arch: self.arch(),
            field,
        }
    }

    fn not_applicable(&self, field: Modifier, allowed: &'static str) -> CalcError {
        CalcError::ModifierNotApplicable {
            instruction: self.instruction(),
            field,
            role: self.role,
            allowed,
        }
    }

    fn bounded(&self, field: Modifier, value: u32, max: u32) -> Result<()> {
        if value > max {
            return Err(CalcError::ModifierOutOfRange {
                instruction: self.instruction(),
                arch: self.arch(),
                field,
                value,
                max,
            });
        }
        Ok(())
    }

    fn invalid(&self, field: Modifier, value: u32, reason: &'static str) -> CalcError {
        CalcError::InvalidModifierValue {
            instruction: self.instruction(),
            field,
            value,
            reason,
        }
    }

    fn cbsz(&self, cbsz: u32) -> Result<()> {
        if cbsz == 0 {
            return Ok(());
        }
        if !self.desc.cbsz_abid {
            return Err(self.not_supported(Modifier::Cbsz));
        }
        if !(self.role == MatrixRole::A || self.expanded_d) {
            return Err(self.not_applicable(
                Modifier::Cbsz,
                "the A input matrix, or the D output matrix with output calculation",
            ));
        }
        let max = if self.desc.sparse {
            0
        } else {
            self.desc.blocks.max(1).ilog2().min(4)
        };
        self.bounded(Modifier::Cbsz, cbsz, max)
    }

    fn abid(&self, abid: u32, cbsz: u32) -> Result<()> {
        if abid == 0 {
            return Ok(());
        }
        if !self.desc.cbsz_abid {
            return Err(self.not_supported(Modifier::Abid));
        }
        if self.desc.sparse {
            if !(matches!(self.role, MatrixRole::A | MatrixRole::K) || self.expanded_d) {
                return Err(self.not_applicable(
                    Modifier::Abid,
                    "the A and K matrices, or the D output matrix with output calculation",
                ));
            }
            return self.bounded(Modifier::Abid, abid, self.sets.saturating_sub(1));
        }
        if !(self.role == MatrixRole::A || self.expanded_d) {
            return Err(self.not_applicable(
                Modifier::Abid,
                "the A input matrix, or the D output matrix with output calculation",
            ));
        }
        let max = 1u32.checked_shl(cbsz).unwrap_or(u32::MAX).saturating_sub(1);
        self.bounded(Modifier::Abid, abid, max)
    }

    fn blgp(&self, blgp: u32) -> Result<()> {
        if blgp == 0 {
            return Ok(());
        }
        if !self.desc.blgp {
            return Err(self.not_supported(Modifier::Blgp));
        }
        if !(self.role == MatrixRole::B || self.expanded_d) {
            return Err(self.not_applicable(
                Modifier::Blgp,
                "the B input matrix, or the D output matrix with output calculation",
            ));
        }
        self.bounded(Modifier::Blgp, blgp, 7)
    }

    fn opsel(&self, opsel: u32) -> Result<()> {
        if opsel == 0 {
            return Ok(());
        }
        match self.arch().family() {
            Family::Gfx9 => Err(self.not_supported(Modifier::Opsel)),
            Family::Gfx11 => {
                if !self.desc.cd_opsel {
                    return Err(self.not_supported(Modifier::Opsel));
                }
                if !self.role.is_output() {
                    return Err(self.not_applicable(Modifier::Opsel, "the C and D matrices"));
                }
                if opsel != 4 {
                    return Err(self.invalid(Modifier::Opsel, opsel, "only the OPSEL values 0 and 4 are supported"));
                }
                Ok(())
            }
            Family::Gfx12 => {
                if !self.desc.sparse {
                    return Err(self.not_supported(Modifier::Opsel));
                }
                if !(matches!(self.role, MatrixRole::A | MatrixRole::K) || self.expanded_d) {
                    return Err(self.not_applicable(
                        Modifier::Opsel,
                        "the A and K matrices, or the D output matrix with output calculation",
                    ));
                }
                self.bounded(Modifier::Opsel, opsel, self.sets.saturating_sub(1))
            }
        }
    }

    fn neg(&self, neg: u32, neg_hi: u32, output_calculation: bool, query: QueryKind) -> Result<()> {
        if neg == 0 && neg_hi == 0 {
            return Ok(());
        }
        let field = if neg != 0 { Modifier::Neg } else { Modifier::NegHi };
        if !self.desc.neg {
            return Err(self.not_supported(field));
        }
        if self.role == MatrixRole::D {
            let expands = matches!(query, QueryKind::GetRegister | QueryKind::MatrixEntry);
            if !(output_calculation && expands) {
                return Err(self.not_applicable(
                    field,
                    "the A, B and C matrices, or the D matrix when querying a single value with output calculation",
                ));
            }
        }
        self.bounded(Modifier::Neg, neg, 7)?;
        self.bounded(Modifier::NegHi, neg_hi, 7)?;
        if self.arch().family() == Family::Gfx9 {
            if neg_hi != 0 {
                return Err(self.invalid(Modifier::NegHi, neg_hi, "64-bit negation is encoded in NEG alone"));
            }
            return Ok(());
        }
        if self.desc.integer {
            if neg & 0x4 != 0 {
                return Err(self.invalid(Modifier::Neg, neg, "NEG[2] must be zero for integer instructions"));
            }
            if neg_hi != 0 {
                return Err(self.invalid(Modifier::NegHi, neg_hi, "NEG_HI must be zero for integer instructions"));
            }
        }
        if self.desc.sparse && self.arch().family() == Family::Gfx12 {
            if neg & 0x4 != 0 {
                return Err(self.invalid(Modifier::Neg, neg, "sparse instructions have no C operand to negate"));
            }
            if neg_hi & 0x4 != 0 {
                return Err(self.invalid(Modifier::NegHi, neg_hi, "sparse instructions have no C operand to take the absolute value of"));
            }
        }
        Ok(())
    }
}

/// Per-matrix negate and absolute-value flags.
///
/// RDNA negates the low and high 16-bit halves of A and B separately; CDNA3
/// FP64 negates whole values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Negation {
    /// Negate every A value.
    pub a: bool,
    /// Negate A values in bits `[15:0]`.
    pub a_lo: bool,
    /// Negate A values in bits `[31:16]`.
    pub a_hi: bool,
    /// Negate every B value.
    pub b: bool,
    /// Negate B values in bits `[15:0]`.
    pub b_lo: bool,
    /// Negate B values in bits `[31:16]`.
    pub b_hi: bool,
    /// Subtract C instead of adding it.
    pub c: bool,
    /// Take the absolute value of C.
    pub c_abs: bool,
}

impl Negation {
    /// Flags from RDNA NEG/NEG_HI fields.
    #[must_use]
    pub fn from_fields(neg: u32, neg_hi: u32) -> Self {
        Self {
            a_lo: neg & 0x1 != 0,
            a_hi: neg_hi & 0x1 != 0,
            b_lo: neg & 0x2 != 0,
            b_hi: neg_hi & 0x2 != 0,
            c: neg & 0x4 != 0,
            c_abs: neg_hi & 0x4 != 0,
            ..Self::default()
        }
    }

    /// Flags from a CDNA3 FP64 NEG field, which negates whole values.
    #[must_use]
    pub fn whole(neg: u32) -> Self {
        Self {
            a: neg & 0x1 != 0,
            b: neg & 0x2 != 0,
            c: neg & 0x4 != 0,
            ..Self::default()
        }
    }

    /// Whether no value is altered.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Renders `value` of `role`, stored at `register`, with its decoration:
    /// `X`, `-X`, `|X|` or `-|X|`.
    #[must_use]
    pub fn decorate(&self, role: MatrixRole, register: &RegisterSpec, value: &str) -> String {
        let (whole, lo, hi) = match role {
            MatrixRole::A => (self.a, self.a_lo, self.a_hi),
            MatrixRole::B => (self.b, self.b_lo, self.b_hi),
            MatrixRole::C => (self.c, false, false),
            MatrixRole::D | MatrixRole::K => (false, false, false),
        };
        let mut rendered = if role == MatrixRole::C && self.c_abs {
            format!("|{value}|")
        } else {
            value.to_owned()
        };
        if whole || (lo && register.is_low_half()) || (hi && register.is_high_half()) {
            rendered.insert(0, '-');
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_map_to_flags() {
        let n = Negation::from_fields(0b101, 0b110);
        assert!(n.a_lo && !n.a_hi);
        assert!(!n.b_lo && n.b_hi);
        assert!(n.c && n.c_abs);
        assert!(!n.a && !n.b);
    }

    #[test]
    fn decoration_by_half() {
        let n = Negation::from_fields(0b001, 0b010);
        let lo = RegisterSpec::for_slot(16, 0);
        let hi = RegisterSpec::for_slot(16, 1);
        assert_eq!(n.decorate(MatrixRole::A, &lo, "A[0][0]"), "-A[0][0]");
        assert_eq!(n.decorate(MatrixRole::A, &hi, "A[0][1]"), "A[0][1]");
        assert_eq!(n.decorate(MatrixRole::B, &hi, "B[1][0]"), "-B[1][0]");
        assert_eq!(n.decorate(MatrixRole::D, &lo, "D[0][0]"), "D[0][0]");
    }

    #[test]
    fn c_absolute_and_negate() {
        let spec = RegisterSpec::Whole(0);
        let abs = Negation::from_fields(0, 0b100);
        let both = Negation::from_fields(0b100, 0b100);
        assert_eq!(abs.decorate(MatrixRole::C, &spec, "C[0][0]"), "|C[0][0]|");
        assert_eq!(both.decorate(MatrixRole::C, &spec, "C[0][0]"), "-|C[0][0]|");
    }

    #[test]
    fn whole_value_negation() {
        let n = Negation::whole(0b011);
        let pair = RegisterSpec::Pair(0);
        assert_eq!(n.decorate(MatrixRole::A, &pair, "A[0][0]"), "-A[0][0]");
        assert_eq!(n.decorate(MatrixRole::B, &pair, "B[0][0]"), "-B[0][0]");
        assert_eq!(n.decorate(MatrixRole::C, &pair, "C[0][0]"), "C[0][0]");
    }

    #[test]
    fn projections_keep_only_their_fields() {
        let mods = ModifierSet {
            cbsz: 1,
            abid: 1,
            blgp: 3,
            opsel: 4,
            neg: 1,
            neg_hi: 2,
        };
        assert_eq!(mods.a_only(), ModifierSet { cbsz: 1, abid: 1, ..ModifierSet::default() });
        assert_eq!(mods.b_only(), ModifierSet { blgp: 3, ..ModifierSet::default() });
        assert_eq!(mods.c_only(), ModifierSet { opsel: 4, ..ModifierSet::default() });
        assert_eq!(mods.without_movement().neg, 1);
        assert_eq!(mods.without_movement().cbsz, 0);
    }
}

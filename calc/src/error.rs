//! Calculator errors.
//!
//! Every variant carries the instruction and field context needed to render a
//! complete message at the command-line boundary.

use mic_catalog::Architecture;

use crate::modifiers::Modifier;
use crate::role::MatrixRole;

/// Result alias for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;

/// Failures reported by the layout calculators and queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// A coordinate index exceeds the instruction's dimensions.
    #[error("Input value for '{field}', {value}, is too large. Maximum value of {field} for {instruction} is {max}.")]
    CoordinateOutOfBounds {
        /// Instruction mnemonic.
        instruction: String,
        /// Index name: `i`, `j`, `k` or `block`.
        field: &'static str,
        /// Value supplied.
        value: u32,
        /// Largest legal value.
        max: u32,
    },

    /// The role is not an operand of this instruction.
    #[error("The {role} matrix is not an operand of {instruction} on the {arch} architecture.")]
    UnsupportedRole {
        /// Instruction mnemonic.
        instruction: String,
        /// Owning architecture.
        arch: Architecture,
        /// Role requested.
        role: MatrixRole,
    },

    /// The register exceeds the matrix's register count.
    #[error("Input value for 'register', {register}, is too large. Maximum value of register for {instruction} using matrix {role} is {max}.")]
    RegisterOutOfRange {
        /// Instruction mnemonic.
        instruction: String,
        /// Role queried.
        role: MatrixRole,
        /// Register supplied.
        register: u32,
        /// Largest legal register.
        max: u32,
    },

    /// The lane exceeds the wavefront or the role's populated lanes.
    #[error("Input value for 'lane', {lane}, is too large. Maximum value of lane for matrix {role} of {instruction} is {max}.")]
    LaneOutOfRange {
        /// Instruction mnemonic.
        instruction: String,
        /// Role queried.
        role: MatrixRole,
        /// Lane supplied.
        lane: u32,
        /// Largest legal lane.
        max: u32,
    },

    /// A modifier value exceeds its legal bound.
    #[error("The {field} modifier for the instruction {instruction}, in the {arch} architecture, may only contain values between 0 - {max}, inclusive.")]
    ModifierOutOfRange {
        /// Instruction mnemonic.
        instruction: String,
        /// Owning architecture.
        arch: Architecture,
        /// Modifier field.
        field: Modifier,
        /// Value supplied.
        value: u32,
        /// Largest legal value.
        max: u32,
    },

    /// The instruction lacks the capability the modifier needs.
    #[error("The chosen instruction, {instruction}, in the {arch} architecture, does not support the {field} modifier.")]
    ModifierNotSupported {
        /// Instruction mnemonic.
        instruction: String,
        /// Owning architecture.
        arch: Architecture,
        /// Modifier field.
        field: Modifier,
    },

    /// The modifier is supported but not on this role or query.
    #[error("The {field} modifier may not be used on the {role} matrix of {instruction}. It applies to {allowed}.")]
    ModifierNotApplicable {
        /// Instruction mnemonic.
        instruction: String,
        /// Modifier field.
        field: Modifier,
        /// Role queried.
        role: MatrixRole,
        /// Where the modifier is legal.
        allowed: &'static str,
    },

    /// The modifier value is in range but has a forbidden bit pattern.
    #[error("The chosen instruction, {instruction}, cannot have {field} set to {value}: {reason}.")]
    InvalidModifierValue {
        /// Instruction mnemonic.
        instruction: String,
        /// Modifier field.
        field: Modifier,
        /// Value supplied.
        value: u32,
        /// Why the value is rejected.
        reason: &'static str,
    },

    /// The architecture does not run matrix instructions at this width.
    #[error("The wavefront width {wave_width} is not permitted on {arch}. Please choose between: {permitted}.")]
    WaveWidthNotPermitted {
        /// Owning architecture.
        arch: Architecture,
        /// Width supplied.
        wave_width: u32,
        /// Comma-separated legal widths.
        permitted: String,
    },
}

impl CalcError {
    /// Builds a [`CalcError::CoordinateOutOfBounds`].
    pub(crate) fn out_of_bounds(instruction: &str, field: &'static str, value: u32, limit: u32) -> Self {
        Self::CoordinateOutOfBounds {
            instruction: instruction.to_owned(),
            field,
            value,
            max: limit.saturating_sub(1),
        }
    }

    /// Builds a [`CalcError::WaveWidthNotPermitted`] listing the legal widths.
    pub(crate) fn wave_width(arch: Architecture, wave_width: u32) -> Self {
        let permitted = arch
            .family()
            .permitted_wave_widths()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::WaveWidthNotPermitted {
            arch,
            wave_width,
            permitted,
        }
    }
}

//! Core catalog model types.
//!
//! These types describe AMD matrix-multiply instructions as typed Rust data.
//! Every descriptor is a plain `Copy` value assembled at compile time from the
//! per-architecture tables in [`crate::tables`]. The top-level entry point is
//! [`Catalog::full()`](crate::Catalog::full).

use std::fmt;

/// The hardware layout family an architecture belongs to.
///
/// Each family places matrix data into registers with its own arithmetic;
/// architectures inside a family share that arithmetic and differ only in the
/// instructions they offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Family {
    /// CDNA1, CDNA2 and CDNA3 (MFMA / SMFMAC).
    Gfx9,
    /// RDNA3 (WMMA).
    Gfx11,
    /// RDNA4 (WMMA / SWMMAC).
    Gfx12,
}

impl Family {
    /// Returns the lowercase family name (e.g., `"gfx9"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Gfx9 => "gfx9",
            Family::Gfx11 => "gfx11",
            Family::Gfx12 => "gfx12",
        }
    }

    /// Wavefront widths this family can execute matrix instructions in.
    #[must_use]
    pub fn permitted_wave_widths(self) -> &'static [u32] {
        match self {
            Family::Gfx9 => &[64],
            Family::Gfx11 | Family::Gfx12 => &[32, 64],
        }
    }

    /// Name of the compute unit used in throughput statistics.
    #[must_use]
    pub fn compute_unit_name(self) -> &'static str {
        match self {
            Family::Gfx9 => "CU",
            Family::Gfx11 | Family::Gfx12 => "WGP",
        }
    }

    /// Name of the instruction encoding.
    #[must_use]
    pub fn encoding_name(self) -> &'static str {
        match self {
            Family::Gfx9 => "VOP3P-MAI",
            Family::Gfx11 | Family::Gfx12 => "VOP3P",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accelerator architecture with its own instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Architecture {
    /// CDNA1 (gfx908, MI100).
    Cdna1,
    /// CDNA2 (gfx90a, MI200 series).
    Cdna2,
    /// CDNA3 (gfx940-gfx942, MI300 series).
    Cdna3,
    /// RDNA3 (gfx1100-gfx1151).
    Rdna3,
    /// RDNA4 (gfx1200, gfx1201).
    Rdna4,
}

impl Architecture {
    /// Every supported architecture, in catalog order.
    pub const ALL: [Architecture; 5] = [
        Architecture::Cdna1,
        Architecture::Cdna2,
        Architecture::Cdna3,
        Architecture::Rdna3,
        Architecture::Rdna4,
    ];

    /// Returns the canonical lowercase name (e.g., `"cdna3"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::Cdna1 => "cdna1",
            Architecture::Cdna2 => "cdna2",
            Architecture::Cdna3 => "cdna3",
            Architecture::Rdna3 => "rdna3",
            Architecture::Rdna4 => "rdna4",
        }
    }

    /// Returns the layout family of this architecture.
    #[must_use]
    pub fn family(self) -> Family {
        match self {
            Architecture::Cdna1 | Architecture::Cdna2 | Architecture::Cdna3 => Family::Gfx9,
            Architecture::Rdna3 => Family::Gfx11,
            Architecture::Rdna4 => Family::Gfx12,
        }
    }

    /// Alternative names (chip code names, product names, gfx targets).
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Architecture::Cdna1 => &["cdna", "gfx908", "mi100", "arcturus"],
            Architecture::Cdna2 => &["gfx90a", "mi200", "mi210", "mi250", "mi250x", "aldebaran"],
            Architecture::Cdna3 => &[
                "gfx940",
                "gfx941",
                "gfx942",
                "mi300",
                "mi300a",
                "mi300x",
                "aqua_vanjaram",
            ],
            Architecture::Rdna3 => &[
                "gfx1100", "gfx1101", "gfx1102", "gfx1103", "gfx1150", "gfx1151",
            ],
            Architecture::Rdna4 => &["gfx1200", "gfx1201"],
        }
    }

    /// Resolves a canonical name or alias, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Architecture> {
        let wanted = name.trim().to_ascii_lowercase();
        Architecture::ALL
            .into_iter()
            .find(|arch| arch.as_str() == wanted || arch.aliases().contains(&wanted.as_str()))
    }

    /// Whether matrix instructions may run at the given wavefront width.
    #[must_use]
    pub fn permits_wave_width(self, wave_width: u32) -> bool {
        self.family().permitted_wave_widths().contains(&wave_width)
    }

    /// The width a caller should pick when the user did not choose one.
    ///
    /// The core never applies this itself; it is offered to front ends that
    /// must resolve an omitted width before constructing a calculator.
    #[must_use]
    pub fn native_wave_width(self) -> u32 {
        match self.family() {
            Family::Gfx9 => 64,
            Family::Gfx11 | Family::Gfx12 => 32,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Numeric format of a matrix element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum ElementType {
    /// IEEE binary64.
    Fp64,
    /// IEEE binary32.
    Fp32,
    /// TF32-style reduced-mantissa binary32 (CDNA3 `xf32`).
    Xf32,
    /// IEEE binary16.
    Fp16,
    /// Brain floating point.
    Bf16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 8-bit integer.
    Int8,
    /// Signed or unsigned 8-bit integer (chosen by NEG bits).
    Iu8,
    /// Signed or unsigned 4-bit integer (chosen by NEG bits).
    Iu4,
    /// 8-bit float, E4M3.
    Fp8,
    /// 8-bit float, E5M2.
    Bf8,
}

impl ElementType {
    /// Storage width in bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            ElementType::Fp64 => 64,
            ElementType::Fp32 | ElementType::Xf32 | ElementType::Int32 => 32,
            ElementType::Fp16 | ElementType::Bf16 => 16,
            ElementType::Int8 | ElementType::Iu8 | ElementType::Fp8 | ElementType::Bf8 => 8,
            ElementType::Iu4 => 4,
        }
    }

    /// Short identifier as used in mnemonics (e.g., `"bf16"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Fp64 => "fp64",
            ElementType::Fp32 => "fp32",
            ElementType::Xf32 => "xf32",
            ElementType::Fp16 => "fp16",
            ElementType::Bf16 => "bf16",
            ElementType::Int32 => "int32",
            ElementType::Int8 => "int8",
            ElementType::Iu8 => "iu8",
            ElementType::Iu4 => "iu4",
            ElementType::Fp8 => "fp8",
            ElementType::Bf8 => "bf8",
        }
    }

    /// Human-readable description for register type listings.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ElementType::Fp64 => "FP64 (IEEE binary64 floating point)",
            ElementType::Fp32 => "FP32 (IEEE binary32 floating point)",
            ElementType::Xf32 => "XF32 (FP32 with reduced-precision multiplication)",
            ElementType::Fp16 => "FP16 (IEEE binary16 floating point)",
            ElementType::Bf16 => "BF16 (Brain floating point)",
            ElementType::Int32 => "int32 (Signed 32-bit integer)",
            ElementType::Int8 => "int8 (Signed 8-bit integer)",
            ElementType::Iu8 => "IU8 (Signed/unsigned 8-bit integer)",
            ElementType::Iu4 => "IU4 (Signed/unsigned 4-bit integer)",
            ElementType::Fp8 => "FP8 (E4M3 8-bit floating point)",
            ElementType::Bf8 => "BF8 (E5M2 8-bit floating point)",
        }
    }

    /// Whether the type is an integer format.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            ElementType::Int32 | ElementType::Int8 | ElementType::Iu8 | ElementType::Iu4
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matrix-multiply instruction on one architecture.
///
/// Descriptors are immutable once the catalog is assembled. Tables build them
/// with [`InstructionDescriptor::new`] followed by the `const` capability
/// builders below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InstructionDescriptor {
    /// Lowercase mnemonic (e.g., `"v_mfma_f32_32x32x8f16"`).
    pub mnemonic: &'static str,
    /// Owning architecture.
    pub arch: Architecture,
    /// VOP3P opcode.
    pub opcode: u16,
    /// Element type of the A operand (Src0).
    pub a_type: ElementType,
    /// Element type of the B operand (Src1).
    pub b_type: ElementType,
    /// Element type of the C input and D output.
    pub out_type: ElementType,
    /// Rows of A, C and D.
    pub m: u32,
    /// Columns of B, C and D.
    pub n: u32,
    /// Dense reduction depth (columns of A, rows of B).
    pub k: u32,
    /// Number of independent blocks computed at once.
    pub blocks: u32,
    /// Issue-to-completion cycles.
    pub cycles: u32,
    /// Whether the instruction operates on integer data.
    pub integer: bool,
    /// Whether C and D may live in ArchVGPRs (not only AccVGPRs).
    pub c_d_arch: bool,
    /// Byte alignment required of matrix registers.
    pub gpr_byte_align: u32,
    /// BLGP lane-swizzle support.
    pub blgp: bool,
    /// CBSZ/ABID broadcast support.
    pub cbsz_abid: bool,
    /// 4:2 structured sparsity (SMFMAC / SWMMAC).
    pub sparse: bool,
    /// OPSEL[2] chooses the half of 16-bit C/D registers.
    pub cd_opsel: bool,
    /// NEG/NEG_HI support.
    pub neg: bool,
    /// Cycles after issue before a co-executing VALU op may start, when
    /// co-execution is possible at all.
    pub coexec_delay: Option<u32>,
}

impl InstructionDescriptor {
    /// Creates a descriptor with every capability flag cleared.
    ///
    /// `shape` is `[m, n, k, blocks]`, with `k` the dense reduction depth.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        arch: Architecture,
        mnemonic: &'static str,
        opcode: u16,
        a_type: ElementType,
        b_type: ElementType,
        out_type: ElementType,
        shape: [u32; 4],
        cycles: u32,
    ) -> Self {
        Self {
            mnemonic,
            arch,
            opcode,
            a_type,
            b_type,
            out_type,
            m: shape[0],
            n: shape[1],
            k: shape[2],
            blocks: shape[3],
            cycles,
            integer: out_type.is_integer(),
            c_d_arch: false,
            gpr_byte_align: 4,
            blgp: false,
            cbsz_abid: false,
            sparse: false,
            cd_opsel: false,
            neg: false,
            coexec_delay: None,
        }
    }

    /// Enables BLGP.
    #[must_use]
    pub const fn with_blgp(self) -> Self {
        Self { blgp: true, ..self }
    }

    /// Enables CBSZ/ABID.
    #[must_use]
    pub const fn with_cbsz_abid(self) -> Self {
        Self {
            cbsz_abid: true,
            ..self
        }
    }

    /// Marks the instruction as 4:2 structured sparse.
    #[must_use]
    pub const fn with_sparsity(self) -> Self {
        Self {
            sparse: true,
            ..self
        }
    }

    /// Enables OPSEL[2] half selection of C/D.
    #[must_use]
    pub const fn with_cd_opsel(self) -> Self {
        Self {
            cd_opsel: true,
            ..self
        }
    }

    /// Enables NEG/NEG_HI.
    #[must_use]
    pub const fn with_neg(self) -> Self {
        Self { neg: true, ..self }
    }

    /// Allows C/D in ArchVGPRs.
    #[must_use]
    pub const fn with_c_d_arch(self) -> Self {
        Self {
            c_d_arch: true,
            ..self
        }
    }

    /// Sets the register byte alignment.
    #[must_use]
    pub const fn with_alignment(self, gpr_byte_align: u32) -> Self {
        Self {
            gpr_byte_align,
            ..self
        }
    }

    /// Allows VALU co-execution after `delay` cycles.
    #[must_use]
    pub const fn with_coexec(self, delay: u32) -> Self {
        Self {
            coexec_delay: Some(delay),
            ..self
        }
    }

    /// Disallows VALU co-execution.
    #[must_use]
    pub const fn without_coexec(self) -> Self {
        Self {
            coexec_delay: None,
            ..self
        }
    }

    /// Depth of the A operand as stored: `k / 2` for sparse instructions.
    #[must_use]
    pub fn stored_k(&self) -> u32 {
        if self.sparse {
            self.k / 2
        } else {
            self.k
        }
    }

    /// Whether both input types are the 64-bit float format.
    #[must_use]
    pub fn is_fp64(&self) -> bool {
        self.a_type == ElementType::Fp64 && self.out_type == ElementType::Fp64
    }

    /// Total multiply and add operations performed by one issue.
    #[must_use]
    pub fn operations(&self) -> u64 {
        u64::from(self.blocks)
            * u64::from(self.m)
            * u64::from(self.n)
            * u64::from(self.k)
            * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_case_insensitively() {
        assert_eq!(Architecture::from_name("MI300X"), Some(Architecture::Cdna3));
        assert_eq!(Architecture::from_name(" gfx90a "), Some(Architecture::Cdna2));
        assert_eq!(Architecture::from_name("rdna4"), Some(Architecture::Rdna4));
        assert_eq!(Architecture::from_name("gfx1010"), None);
    }

    #[test]
    fn aliases_are_unique_across_architectures() {
        let mut seen = std::collections::HashSet::new();
        for arch in Architecture::ALL {
            assert!(seen.insert(arch.as_str()));
            for alias in arch.aliases() {
                assert!(seen.insert(alias), "alias {alias} listed twice");
            }
        }
    }

    #[test]
    fn wave_widths_follow_family() {
        assert!(Architecture::Cdna2.permits_wave_width(64));
        assert!(!Architecture::Cdna2.permits_wave_width(32));
        assert!(Architecture::Rdna3.permits_wave_width(32));
        assert!(Architecture::Rdna4.permits_wave_width(64));
        assert!(!Architecture::Rdna4.permits_wave_width(16));
    }

    #[test]
    fn builder_sets_flags() {
        let d = InstructionDescriptor::new(
            Architecture::Cdna3,
            "v_smfmac_f32_16x16x32_f16",
            0x62,
            ElementType::Fp16,
            ElementType::Fp16,
            ElementType::Fp32,
            [16, 16, 32, 1],
            16,
        )
        .with_sparsity()
        .with_cbsz_abid()
        .with_coexec(4);
        assert!(d.sparse && d.cbsz_abid && !d.blgp);
        assert_eq!(d.stored_k(), 16);
        assert_eq!(d.coexec_delay, Some(4));
        assert!(!d.integer);
    }
}

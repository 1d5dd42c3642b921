//! CDNA1 (gfx908) MFMA instructions.
//!
//! C and D live only in AccVGPRs on this generation, registers need 4-byte
//! alignment, and dependent VALU work may co-issue 8 cycles after an MFMA.

use crate::model::{Architecture, ElementType, InstructionDescriptor};

use ElementType::{Bf16, Fp16, Fp32, Int32, Int8};

const fn mfma(
    mnemonic: &'static str,
    opcode: u16,
    input: ElementType,
    output: ElementType,
    shape: [u32; 4],
    cycles: u32,
) -> InstructionDescriptor {
    InstructionDescriptor::new(
        Architecture::Cdna1,
        mnemonic,
        opcode,
        input,
        input,
        output,
        shape,
        cycles,
    )
    .with_blgp()
    .with_alignment(4)
    .with_coexec(8)
}

/// Every CDNA1 matrix instruction, in ISA-guide order.
pub const INSTRUCTIONS: &[InstructionDescriptor] = &[
    mfma("v_mfma_f32_32x32x1f32", 0x40, Fp32, Fp32, [32, 32, 1, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_f32_16x16x1f32", 0x41, Fp32, Fp32, [16, 16, 1, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_f32_4x4x1f32", 0x42, Fp32, Fp32, [4, 4, 1, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_f32_32x32x2f32", 0x44, Fp32, Fp32, [32, 32, 2, 1], 64),
    mfma("v_mfma_f32_16x16x4f32", 0x45, Fp32, Fp32, [16, 16, 4, 1], 32),
    mfma("v_mfma_f32_32x32x4f16", 0x48, Fp16, Fp32, [32, 32, 4, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_f32_16x16x4f16", 0x49, Fp16, Fp32, [16, 16, 4, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_f32_4x4x4f16", 0x4a, Fp16, Fp32, [4, 4, 4, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_f32_32x32x8f16", 0x4c, Fp16, Fp32, [32, 32, 8, 1], 64),
    mfma("v_mfma_f32_16x16x16f16", 0x4d, Fp16, Fp32, [16, 16, 16, 1], 32),
    mfma("v_mfma_i32_32x32x4i8", 0x50, Int8, Int32, [32, 32, 4, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_i32_16x16x4i8", 0x51, Int8, Int32, [16, 16, 4, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_i32_4x4x4i8", 0x52, Int8, Int32, [4, 4, 4, 16], 8).with_cbsz_abid(),
    // Both 8-bit dense variants are documented with opcode 0x54.
    mfma("v_mfma_i32_32x32x8i8", 0x54, Int8, Int32, [32, 32, 8, 1], 64),
    mfma("v_mfma_i32_16x16x16i8", 0x54, Int8, Int32, [16, 16, 16, 1], 32),
    mfma("v_mfma_f32_32x32x2bf16", 0x68, Bf16, Fp32, [32, 32, 2, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_f32_16x16x2bf16", 0x69, Bf16, Fp32, [16, 16, 2, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_f32_4x4x2bf16", 0x6b, Bf16, Fp32, [4, 4, 2, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_f32_32x32x4bf16", 0x6c, Bf16, Fp32, [32, 32, 4, 1], 64),
    mfma("v_mfma_f32_16x16x8bf16", 0x6d, Bf16, Fp32, [16, 16, 8, 1], 32),
];

//! CDNA3 (gfx940 - gfx942) MFMA and SMFMAC instructions.
//!
//! CDNA3 keeps the CDNA2 register rules and adds XF32, FP8/BF8 mixes and the
//! 4:2 structured-sparse SMFMAC family. On SMFMAC, ABID picks which set of
//! compression indices the instruction reads from the index register. FP64
//! instructions reuse the BLGP field as a NEG[2:0] selector.

use crate::model::{Architecture, ElementType, InstructionDescriptor};

use ElementType::{Bf16, Bf8, Fp16, Fp32, Fp64, Fp8, Int32, Int8, Xf32};

#[allow(clippy::too_many_arguments)]
const fn base(
    mnemonic: &'static str,
    opcode: u16,
    a_type: ElementType,
    b_type: ElementType,
    output: ElementType,
    shape: [u32; 4],
    cycles: u32,
) -> InstructionDescriptor {
    InstructionDescriptor::new(
        Architecture::Cdna3,
        mnemonic,
        opcode,
        a_type,
        b_type,
        output,
        shape,
        cycles,
    )
    .with_c_d_arch()
    .with_alignment(8)
}

const fn mfma(
    mnemonic: &'static str,
    opcode: u16,
    input: ElementType,
    output: ElementType,
    shape: [u32; 4],
    cycles: u32,
) -> InstructionDescriptor {
    base(mnemonic, opcode, input, input, output, shape, cycles)
        .with_blgp()
        .with_coexec(4)
}

const fn mfma_f8(
    mnemonic: &'static str,
    opcode: u16,
    a_type: ElementType,
    b_type: ElementType,
    shape: [u32; 4],
    cycles: u32,
) -> InstructionDescriptor {
    base(mnemonic, opcode, a_type, b_type, Fp32, shape, cycles)
        .with_blgp()
        .with_coexec(4)
}

const fn smfmac(
    mnemonic: &'static str,
    opcode: u16,
    a_type: ElementType,
    b_type: ElementType,
    output: ElementType,
    shape: [u32; 4],
    cycles: u32,
) -> InstructionDescriptor {
    base(mnemonic, opcode, a_type, b_type, output, shape, cycles)
        .with_sparsity()
        .with_cbsz_abid()
        .with_blgp()
        .with_coexec(4)
}

const fn dmfma(mnemonic: &'static str, opcode: u16, shape: [u32; 4], cycles: u32) -> InstructionDescriptor {
    base(mnemonic, opcode, Fp64, Fp64, Fp64, shape, cycles).with_neg()
}

/// Every CDNA3 matrix instruction, in opcode order.
pub const INSTRUCTIONS: &[InstructionDescriptor] = &[
    mfma("v_mfma_f32_16x16x8_xf32", 0x3e, Xf32, Fp32, [16, 16, 8, 1], 16),
    mfma("v_mfma_f32_32x32x4_xf32", 0x3f, Xf32, Fp32, [32, 32, 4, 1], 32),
    mfma("v_mfma_f32_32x32x1_2b_f32", 0x40, Fp32, Fp32, [32, 32, 1, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_f32_16x16x1_4b_f32", 0x41, Fp32, Fp32, [16, 16, 1, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_f32_4x4x1_16b_f32", 0x42, Fp32, Fp32, [4, 4, 1, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_f32_32x32x2_f32", 0x44, Fp32, Fp32, [32, 32, 2, 1], 64),
    mfma("v_mfma_f32_16x16x4_f32", 0x45, Fp32, Fp32, [16, 16, 4, 1], 32),
    mfma("v_mfma_f32_32x32x4_2b_f16", 0x48, Fp16, Fp32, [32, 32, 4, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_f32_16x16x4_4b_f16", 0x49, Fp16, Fp32, [16, 16, 4, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_f32_4x4x4_16b_f16", 0x4a, Fp16, Fp32, [4, 4, 4, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_f32_32x32x8_f16", 0x4c, Fp16, Fp32, [32, 32, 8, 1], 32),
    mfma("v_mfma_f32_16x16x16_f16", 0x4d, Fp16, Fp32, [16, 16, 16, 1], 16),
    mfma("v_mfma_i32_32x32x4_2b_i8", 0x50, Int8, Int32, [32, 32, 4, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_i32_16x16x4_4b_i8", 0x51, Int8, Int32, [16, 16, 4, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_i32_4x4x4_16b_i8", 0x52, Int8, Int32, [4, 4, 4, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_i32_32x32x16_i8", 0x56, Int8, Int32, [32, 32, 16, 1], 32),
    mfma("v_mfma_i32_16x16x32_i8", 0x57, Int8, Int32, [16, 16, 32, 1], 16),
    mfma("v_mfma_f32_32x32x4_2b_bf16", 0x5d, Bf16, Fp32, [32, 32, 4, 2], 64).with_cbsz_abid(),
    mfma("v_mfma_f32_16x16x4_4b_bf16", 0x5e, Bf16, Fp32, [16, 16, 4, 4], 32).with_cbsz_abid(),
    mfma("v_mfma_f32_4x4x4_16b_bf16", 0x5f, Bf16, Fp32, [4, 4, 4, 16], 8).with_cbsz_abid(),
    mfma("v_mfma_f32_32x32x8_bf16", 0x60, Bf16, Fp32, [32, 32, 8, 1], 32),
    mfma("v_mfma_f32_16x16x16_bf16", 0x61, Bf16, Fp32, [16, 16, 16, 1], 16),
    smfmac("v_smfmac_f32_16x16x32_f16", 0x62, Fp16, Fp16, Fp32, [16, 16, 32, 1], 16),
    smfmac("v_smfmac_f32_32x32x16_f16", 0x64, Fp16, Fp16, Fp32, [32, 32, 16, 1], 32),
    smfmac("v_smfmac_f32_16x16x32_bf16", 0x66, Bf16, Bf16, Fp32, [16, 16, 32, 1], 16),
    smfmac("v_smfmac_f32_32x32x16_bf16", 0x68, Bf16, Bf16, Fp32, [32, 32, 16, 1], 32),
    smfmac("v_smfmac_i32_16x16x64_i8", 0x6a, Int8, Int8, Int32, [16, 16, 64, 1], 16),
    smfmac("v_smfmac_i32_32x32x32_i8", 0x6c, Int8, Int8, Int32, [32, 32, 32, 1], 32),
    dmfma("v_mfma_f64_16x16x4_f64", 0x6e, [16, 16, 4, 1], 32),
    dmfma("v_mfma_f64_4x4x4_4b_f64", 0x6f, [4, 4, 4, 4], 16),
    mfma_f8("v_mfma_f32_16x16x32_bf8_bf8", 0x70, Bf8, Bf8, [16, 16, 32, 1], 16),
    mfma_f8("v_mfma_f32_16x16x32_bf8_fp8", 0x71, Bf8, Fp8, [16, 16, 32, 1], 16),
    mfma_f8("v_mfma_f32_16x16x32_fp8_bf8", 0x72, Fp8, Bf8, [16, 16, 32, 1], 16),
    mfma_f8("v_mfma_f32_16x16x32_fp8_fp8", 0x73, Fp8, Fp8, [16, 16, 32, 1], 16),
    mfma_f8("v_mfma_f32_32x32x16_bf8_bf8", 0x74, Bf8, Bf8, [32, 32, 16, 1], 32),
    mfma_f8("v_mfma_f32_32x32x16_bf8_fp8", 0x75, Bf8, Fp8, [32, 32, 16, 1], 32),
    mfma_f8("v_mfma_f32_32x32x16_fp8_bf8", 0x76, Fp8, Bf8, [32, 32, 16, 1], 32),
    mfma_f8("v_mfma_f32_32x32x16_fp8_fp8", 0x77, Fp8, Fp8, [32, 32, 16, 1], 32),
    smfmac("v_smfmac_f32_16x16x64_bf8_bf8", 0x78, Bf8, Bf8, Fp32, [16, 16, 64, 1], 16),
    smfmac("v_smfmac_f32_16x16x64_bf8_fp8", 0x79, Bf8, Fp8, Fp32, [16, 16, 64, 1], 16),
    smfmac("v_smfmac_f32_16x16x64_fp8_bf8", 0x7a, Fp8, Bf8, Fp32, [16, 16, 64, 1], 16),
    smfmac("v_smfmac_f32_16x16x64_fp8_fp8", 0x7b, Fp8, Fp8, Fp32, [16, 16, 64, 1], 16),
    smfmac("v_smfmac_f32_32x32x32_bf8_bf8", 0x7c, Bf8, Bf8, Fp32, [32, 32, 32, 1], 32),
    smfmac("v_smfmac_f32_32x32x32_bf8_fp8", 0x7d, Bf8, Fp8, Fp32, [32, 32, 32, 1], 32),
    smfmac("v_smfmac_f32_32x32x32_fp8_bf8", 0x7e, Fp8, Bf8, Fp32, [32, 32, 32, 1], 32),
    smfmac("v_smfmac_f32_32x32x32_fp8_fp8", 0x7f, Fp8, Fp8, Fp32, [32, 32, 32, 1], 32),
];

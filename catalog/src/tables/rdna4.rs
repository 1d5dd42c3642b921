//! RDNA4 (gfx12) WMMA and SWMMAC instructions.
//!
//! RDNA4 packs 16-bit outputs densely, so OPSEL never selects a C/D half.
//! On SWMMAC, OPSEL instead picks the compression-index set. FP8/BF8 variants
//! have no NEG support.

use crate::model::{Architecture, ElementType, InstructionDescriptor};

use ElementType::{Bf16, Bf8, Fp16, Fp32, Fp8, Int32, Iu4, Iu8};

#[allow(clippy::too_many_arguments)]
const fn base(
    mnemonic: &'static str,
    opcode: u16,
    a_type: ElementType,
    b_type: ElementType,
    output: ElementType,
    k: u32,
    cycles: u32,
) -> InstructionDescriptor {
    InstructionDescriptor::new(
        Architecture::Rdna4,
        mnemonic,
        opcode,
        a_type,
        b_type,
        output,
        [16, 16, k, 1],
        cycles,
    )
    .with_c_d_arch()
    .with_alignment(4)
}

const fn wmma(
    mnemonic: &'static str,
    opcode: u16,
    input: ElementType,
    output: ElementType,
    k: u32,
    cycles: u32,
) -> InstructionDescriptor {
    base(mnemonic, opcode, input, input, output, k, cycles).with_neg()
}

const fn wmma_f8(
    mnemonic: &'static str,
    opcode: u16,
    a_type: ElementType,
    b_type: ElementType,
) -> InstructionDescriptor {
    base(mnemonic, opcode, a_type, b_type, Fp32, 16, 16)
}

const fn swmmac(
    mnemonic: &'static str,
    opcode: u16,
    input: ElementType,
    output: ElementType,
    k: u32,
    cycles: u32,
) -> InstructionDescriptor {
    base(mnemonic, opcode, input, input, output, k, cycles)
        .with_neg()
        .with_sparsity()
}

const fn swmmac_f8(
    mnemonic: &'static str,
    opcode: u16,
    a_type: ElementType,
    b_type: ElementType,
) -> InstructionDescriptor {
    base(mnemonic, opcode, a_type, b_type, Fp32, 32, 16).with_sparsity()
}

/// Every RDNA4 matrix instruction, in opcode order.
pub const INSTRUCTIONS: &[InstructionDescriptor] = &[
    wmma("v_wmma_f32_16x16x16_f16", 0x40, Fp16, Fp32, 16, 16),
    wmma("v_wmma_f32_16x16x16_bf16", 0x41, Bf16, Fp32, 16, 16),
    wmma("v_wmma_f16_16x16x16_f16", 0x42, Fp16, Fp16, 16, 16),
    wmma("v_wmma_bf16_16x16x16_bf16", 0x43, Bf16, Bf16, 16, 16),
    wmma("v_wmma_i32_16x16x16_iu8", 0x44, Iu8, Int32, 16, 16),
    wmma("v_wmma_i32_16x16x16_iu4", 0x45, Iu4, Int32, 16, 8),
    wmma_f8("v_wmma_f32_16x16x16_fp8_fp8", 0x46, Fp8, Fp8),
    wmma_f8("v_wmma_f32_16x16x16_fp8_bf8", 0x47, Fp8, Bf8),
    wmma_f8("v_wmma_f32_16x16x16_bf8_fp8", 0x48, Bf8, Fp8),
    wmma_f8("v_wmma_f32_16x16x16_bf8_bf8", 0x49, Bf8, Bf8),
    wmma("v_wmma_i32_16x16x32_iu4", 0x4a, Iu4, Int32, 32, 16),
    swmmac("v_swmmac_f32_16x16x32_f16", 0x50, Fp16, Fp32, 32, 16),
    swmmac("v_swmmac_f32_16x16x32_bf16", 0x51, Bf16, Fp32, 32, 16),
    swmmac("v_swmmac_f16_16x16x32_f16", 0x52, Fp16, Fp16, 32, 16),
    swmmac("v_swmmac_bf16_16x16x32_bf16", 0x53, Bf16, Bf16, 32, 16),
    swmmac("v_swmmac_i32_16x16x32_iu8", 0x54, Iu8, Int32, 32, 16),
    swmmac("v_swmmac_i32_16x16x32_iu4", 0x55, Iu4, Int32, 32, 8),
    swmmac("v_swmmac_i32_16x16x64_iu4", 0x56, Iu4, Int32, 64, 16),
    swmmac_f8("v_swmmac_f32_16x16x32_fp8_fp8", 0x57, Fp8, Fp8),
    swmmac_f8("v_swmmac_f32_16x16x32_fp8_bf8", 0x58, Fp8, Bf8),
    swmmac_f8("v_swmmac_f32_16x16x32_bf8_fp8", 0x59, Bf8, Fp8),
    swmmac_f8("v_swmmac_f32_16x16x32_bf8_bf8", 0x5a, Bf8, Bf8),
];

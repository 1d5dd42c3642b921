//! RDNA3 (gfx11) WMMA instructions.
//!
//! Every WMMA computes a single 16x16 tile with no blocks. NEG/NEG_HI are
//! available everywhere; OPSEL[2] exists only where the output is 16 bits wide.

use crate::model::{Architecture, ElementType, InstructionDescriptor};

use ElementType::{Bf16, Fp16, Fp32, Int32, Iu4, Iu8};

const fn wmma(
    mnemonic: &'static str,
    opcode: u16,
    input: ElementType,
    output: ElementType,
    cycles: u32,
) -> InstructionDescriptor {
    InstructionDescriptor::new(
        Architecture::Rdna3,
        mnemonic,
        opcode,
        input,
        input,
        output,
        [16, 16, 16, 1],
        cycles,
    )
    .with_c_d_arch()
    .with_alignment(4)
    .with_neg()
}

/// Every RDNA3 matrix instruction, in opcode order.
pub const INSTRUCTIONS: &[InstructionDescriptor] = &[
    wmma("v_wmma_f32_16x16x16_f16", 0x40, Fp16, Fp32, 32),
    wmma("v_wmma_f32_16x16x16_bf16", 0x41, Bf16, Fp32, 32),
    wmma("v_wmma_f16_16x16x16_f16", 0x42, Fp16, Fp16, 32).with_cd_opsel(),
    wmma("v_wmma_bf16_16x16x16_bf16", 0x43, Bf16, Bf16, 32).with_cd_opsel(),
    wmma("v_wmma_i32_16x16x16_iu8", 0x44, Iu8, Int32, 32),
    wmma("v_wmma_i32_16x16x16_iu4", 0x45, Iu4, Int32, 16),
];

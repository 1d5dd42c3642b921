//! Per-architecture instruction tables.
//!
//! Each module exposes an `INSTRUCTIONS` constant slice. Tables are plain
//! `const` data so the whole catalog is fixed at compile time.

pub mod cdna1;
pub mod cdna2;
pub mod cdna3;
pub mod rdna3;
pub mod rdna4;

use crate::model::{Architecture, InstructionDescriptor};

/// Returns the table for one architecture.
#[must_use]
pub fn instructions(arch: Architecture) -> &'static [InstructionDescriptor] {
    match arch {
        Architecture::Cdna1 => cdna1::INSTRUCTIONS,
        Architecture::Cdna2 => cdna2::INSTRUCTIONS,
        Architecture::Cdna3 => cdna3::INSTRUCTIONS,
        Architecture::Rdna3 => rdna3::INSTRUCTIONS,
        Architecture::Rdna4 => rdna4::INSTRUCTIONS,
    }
}

//! Integrity checks over the whole instruction catalog.
//!
//! These tests guard the table data itself: dimensions that the layout
//! calculators divide by, capability flags that only make sense on some
//! families, and opcode uniqueness.

use std::collections::HashMap;

use mic_catalog::{Architecture, Catalog, ElementType, Family};

// =============================================================================
// Dimensions
// =============================================================================

#[test]
fn dimensions_are_powers_of_two() {
    for inst in Catalog::full().iter() {
        for (name, value) in [("m", inst.m), ("n", inst.n), ("k", inst.k), ("blocks", inst.blocks)] {
            assert!(
                value.is_power_of_two(),
                "{}: {name} = {value} is not a power of two",
                inst.mnemonic
            );
        }
    }
}

#[test]
fn gfx9_tiles_fit_one_wavefront() {
    for inst in Catalog::full().iter().filter(|i| i.arch.family() == Family::Gfx9) {
        assert!(
            inst.m * inst.blocks <= 64 && inst.n * inst.blocks <= 64,
            "{}: blocks overflow 64 lanes",
            inst.mnemonic
        );
        assert!(inst.m * inst.n * inst.blocks >= 64, "{}: output smaller than a register", inst.mnemonic);
    }
}

#[test]
fn rdna_instructions_are_single_16x16_tiles() {
    for inst in Catalog::full()
        .iter()
        .filter(|i| i.arch.family() != Family::Gfx9)
    {
        assert_eq!((inst.m, inst.n, inst.blocks), (16, 16, 1), "{}", inst.mnemonic);
    }
}

#[test]
fn mnemonic_encodes_dimensions() {
    for inst in Catalog::full().iter() {
        let shape = format!("{}x{}x{}", inst.m, inst.n, inst.k);
        assert!(inst.mnemonic.contains(&shape), "{} does not contain {shape}", inst.mnemonic);
    }
}

// =============================================================================
// Capability flags
// =============================================================================

#[test]
fn cbsz_abid_only_on_multi_block_or_sparse() {
    for inst in Catalog::full().iter().filter(|i| i.cbsz_abid) {
        assert_eq!(inst.arch.family(), Family::Gfx9, "{}", inst.mnemonic);
        assert!(inst.blocks > 1 || inst.sparse, "{}", inst.mnemonic);
    }
}

#[test]
fn opsel_output_selection_only_on_rdna3_16bit_outputs() {
    for inst in Catalog::full().iter().filter(|i| i.cd_opsel) {
        assert_eq!(inst.arch, Architecture::Rdna3, "{}", inst.mnemonic);
        assert_eq!(inst.out_type.bits(), 16, "{}", inst.mnemonic);
    }
}

#[test]
fn sparse_instructions_have_sparse_mnemonics() {
    for inst in Catalog::full().iter() {
        let named = inst.mnemonic.starts_with("v_smfmac") || inst.mnemonic.starts_with("v_swmmac");
        assert_eq!(inst.sparse, named, "{}", inst.mnemonic);
    }
}

#[test]
fn cdna3_f64_uses_neg_instead_of_blgp() {
    for inst in Catalog::full().instructions(Architecture::Cdna3) {
        if inst.a_type == ElementType::Fp64 {
            assert!(inst.neg && !inst.blgp, "{}", inst.mnemonic);
            assert_eq!(inst.coexec_delay, None, "{}", inst.mnemonic);
        }
    }
}

#[test]
fn c_d_arch_follows_architecture() {
    for inst in Catalog::full().iter() {
        let expected = inst.arch != Architecture::Cdna1;
        assert_eq!(inst.c_d_arch, expected, "{}", inst.mnemonic);
    }
}

#[test]
fn integer_flag_matches_output_type() {
    for inst in Catalog::full().iter() {
        assert_eq!(inst.integer, inst.out_type.is_integer(), "{}", inst.mnemonic);
    }
}

// =============================================================================
// Opcodes
// =============================================================================

#[test]
fn opcodes_unique_except_documented_i8_duplicate() {
    for arch in Architecture::ALL {
        let mut by_opcode: HashMap<u16, Vec<&str>> = HashMap::new();
        for inst in Catalog::full().instructions(arch) {
            by_opcode.entry(inst.opcode).or_default().push(inst.mnemonic);
        }
        for (opcode, names) in by_opcode {
            if names.len() > 1 {
                assert!(
                    matches!(arch, Architecture::Cdna1 | Architecture::Cdna2),
                    "{arch}: opcode {opcode:#x} shared by {names:?}"
                );
                assert_eq!(opcode, 0x54, "{arch}: opcode {opcode:#x} shared by {names:?}");
            }
        }
    }
}

#[test]
fn every_alias_resolves_to_its_architecture() {
    for arch in Architecture::ALL {
        for alias in arch.aliases() {
            assert_eq!(Architecture::from_name(alias), Some(arch));
            assert_eq!(Architecture::from_name(&alias.to_uppercase()), Some(arch));
        }
    }
}

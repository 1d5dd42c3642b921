//! Layout invariants checked across the catalog.
//!
//! Every fifth instruction of each architecture (starting with the first) is
//! bound at every permitted wave width, and every supported role is laid out
//! once with no modifiers set.

use mic_calc::{Calculator, MatrixRole, ModifierSet, RegisterDictionary, RegisterSpec};
use mic_catalog::{Architecture, Catalog};

const STRIDE: usize = 5;

/// The sampled (calculator, role) pairs.
fn bound_roles() -> Vec<(Calculator, MatrixRole)> {
    let mut bound = Vec::new();
    for arch in Architecture::ALL {
        for desc in Catalog::full().instructions(arch).iter().step_by(STRIDE) {
            for &wave in desc.arch.family().permitted_wave_widths() {
                let calc = Calculator::new(desc, wave).expect("permitted wave width");
                for role in MatrixRole::ALL {
                    if calc.role_supported(role) {
                        bound.push((calc, role));
                    }
                }
            }
        }
    }
    bound
}

/// Highest register a location touches; a pair covers two.
fn last_register(register: &RegisterSpec) -> u32 {
    match register {
        RegisterSpec::Pair(_) => register.base_register() + 1,
        _ => register.base_register(),
    }
}

// =============================================================================
// Occupancy and register counts
// =============================================================================

#[test]
fn layouts_are_collision_free_and_tight() {
    let bound = bound_roles();
    assert!(bound.iter().any(|(calc, _)| calc.wave_width() == 32));
    for (calc, role) in bound {
        let what = format!("{} wave{} {role}", calc.descriptor().mnemonic, calc.wave_width());
        let dict = RegisterDictionary::build(&calc, role, &ModifierSet::default()).expect("dictionary");
        let mut highest = None;
        for (location, held) in dict.iter() {
            assert_eq!(held.len(), 1, "{what} at {location} holds {held:?}");
            assert!(location.lane < calc.lane_count(role), "{what} at {location}");
            highest = highest.max(Some(last_register(&location.register)));
        }
        let highest = highest.expect("a populated layout");
        assert_eq!(calc.register_count(role), highest + 1, "{what}");
    }
}

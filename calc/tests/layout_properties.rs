//! Property-based tests for the layout calculators.
//!
//! Strategies pick any catalog instruction at any permitted wave width, then
//! any coordinate inside (or just outside) its matrices.

use proptest::prelude::*;

use mic_calc::{
    get_register, CalcError, Calculator, LogicalCoordinate, MatrixRole, ModifierSet, QueryKind,
    RegisterDictionary,
};
use mic_catalog::{Catalog, InstructionDescriptor};

fn instructions() -> Vec<&'static InstructionDescriptor> {
    Catalog::full().iter().collect()
}

/// A bound calculator and a role it supports.
fn calculator() -> impl Strategy<Value = (Calculator, MatrixRole)> {
    let count = instructions().len();
    (0..count, any::<bool>(), 0usize..MatrixRole::ALL.len()).prop_map(|(n, wide, r)| {
        let desc = instructions()[n];
        let waves = desc.arch.family().permitted_wave_widths();
        let wave = if wide { waves[waves.len() - 1] } else { waves[0] };
        let calc = Calculator::new(desc, wave).expect("permitted wave width");
        let role = MatrixRole::ALL
            .into_iter()
            .cycle()
            .skip(r)
            .find(|role| calc.role_supported(*role))
            .expect("every instruction has A");
        (calc, role)
    })
}

/// A coordinate of `role` in bounds, scaled from unit fractions.
fn coordinate(calc: &Calculator, role: MatrixRole, fractions: [f64; 3]) -> LogicalCoordinate {
    let (rows, cols) = calc.dimensions(role);
    let pick = |bound: u32, f: f64| ((f64::from(bound) * f) as u32).min(bound - 1);
    let block = pick(calc.descriptor().blocks, fractions[2]);
    LogicalCoordinate::from_cell(role, pick(rows, fractions[0]), pick(cols, fractions[1]), block)
}

/// Raw modifier fields, each zero about half the time.
fn raw_modifiers() -> impl Strategy<Value = [u32; 6]> {
    let field = |max: u32| prop_oneof![Just(0u32), 0..max];
    (field(4), field(16), field(8), field(8), field(8), field(8))
        .prop_map(|(cbsz, abid, blgp, opsel, neg, neg_hi)| [cbsz, abid, blgp, opsel, neg, neg_hi])
}

/// The modifier set built from `raw`, keeping each field only while the
/// instruction still accepts the set for `role`.
fn legal_modifiers(calc: &Calculator, role: MatrixRole, raw: [u32; 6]) -> ModifierSet {
    let setters: [fn(&mut ModifierSet, u32); 6] = [
        |m, v| m.cbsz = v,
        |m, v| m.abid = v,
        |m, v| m.blgp = v,
        |m, v| m.opsel = v,
        |m, v| m.neg = v,
        |m, v| m.neg_hi = v,
    ];
    let mut mods = ModifierSet::default();
    for (set, value) in setters.into_iter().zip(raw) {
        let mut tried = mods;
        set(&mut tried, value);
        if tried.validate(calc, role, false, QueryKind::RegisterLayout).is_ok() {
            mods = tried;
        }
    }
    mods
}

// =============================================================================
// Round trip
// =============================================================================

proptest! {
    /// Every located element is found again at each of its locations.
    #[test]
    fn prop_locations_hold_their_element(
        (calc, role) in calculator(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        c in 0.0f64..1.0,
    ) {
        let coord = coordinate(&calc, role, [a, b, c]);
        let mods = ModifierSet::default();
        let placement = calc.locate(&coord, &mods).expect("in bounds");
        let dict = RegisterDictionary::build(&calc, role, &mods).expect("dictionary");
        for location in placement.location.locations() {
            let held = dict.get(&location).expect("location recorded");
            prop_assert!(held.contains(&placement.element), "{} missing at {}", placement.element, location);
        }
    }

    /// Located registers and lanes pass the register/lane check.
    #[test]
    fn prop_locations_are_valid(
        (calc, role) in calculator(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        c in 0.0f64..1.0,
    ) {
        let coord = coordinate(&calc, role, [a, b, c]);
        let placement = calc.locate(&coord, &ModifierSet::default()).expect("in bounds");
        let register = placement.location.register.base_register();
        for &lane in &placement.location.lanes {
            prop_assert!(
                calc.is_valid_register_lane(role, register, lane),
                "{} {role} at v{register} lane {lane}",
                calc.descriptor().mnemonic
            );
        }
    }
}

// =============================================================================
// Round trip under modifiers
// =============================================================================

proptest! {
    /// With any accepted modifier set, each located element is recorded at
    /// each of its locations in the layout built with the same set.
    #[test]
    fn prop_modified_locations_hold_their_element(
        (calc, role) in calculator(),
        raw in raw_modifiers(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        c in 0.0f64..1.0,
    ) {
        let mods = legal_modifiers(&calc, role, raw);
        prop_assert!(mods.validate(&calc, role, false, QueryKind::RegisterLayout).is_ok());
        let coord = coordinate(&calc, role, [a, b, c]);
        let placement = calc.locate(&coord, &mods).expect("in bounds");
        let dict = RegisterDictionary::build(&calc, role, &mods).expect("dictionary");
        for location in placement.location.locations() {
            let held = dict.get(&location).expect("location recorded");
            prop_assert!(
                held.contains(&placement.element),
                "{} missing at {} under {:?}",
                placement.element,
                location,
                mods
            );
        }
    }

    /// With any accepted modifier set, located registers and lanes stay
    /// inside the operand.
    #[test]
    fn prop_modified_locations_are_valid(
        (calc, role) in calculator(),
        raw in raw_modifiers(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        c in 0.0f64..1.0,
    ) {
        let mods = legal_modifiers(&calc, role, raw);
        let coord = coordinate(&calc, role, [a, b, c]);
        let placement = calc.locate(&coord, &mods).expect("in bounds");
        let register = placement.location.register.base_register();
        prop_assert!(!placement.location.lanes.is_empty());
        for &lane in &placement.location.lanes {
            prop_assert!(
                calc.is_valid_register_lane(role, register, lane),
                "{} {role} at v{register} lane {lane} under {:?}",
                calc.descriptor().mnemonic,
                mods
            );
        }
    }
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    /// Identical queries render identical text.
    #[test]
    fn prop_queries_are_deterministic(
        (calc, role) in calculator(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let coord = coordinate(&calc, role, [a, b, 0.0]);
        let render = || {
            get_register(&calc, &coord, &ModifierSet::default(), false)
                .expect("located")
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(render(), render());
    }
}

// =============================================================================
// Bounds enforcement
// =============================================================================

proptest! {
    /// Indices past the matrix are reported, never clamped.
    #[test]
    fn prop_out_of_bounds_is_rejected((calc, role) in calculator(), overshoot in 0u32..64) {
        let desc = calc.descriptor();
        let coord = LogicalCoordinate::new(role, desc.m + overshoot, 0, 0, 0);
        let err = calc.locate(&coord, &ModifierSet::default()).unwrap_err();
        let is_bounds_error = matches!(err, CalcError::CoordinateOutOfBounds { .. });
        prop_assert!(is_bounds_error);

        let coord = LogicalCoordinate::new(role, 0, 0, 0, desc.blocks + overshoot);
        let is_bounds_error = matches!(
            calc.locate(&coord, &ModifierSet::default()),
            Err(CalcError::CoordinateOutOfBounds { field: "block", .. })
        );
        prop_assert!(is_bounds_error);
    }

    /// Registers past the register count are reported.
    #[test]
    fn prop_register_range_is_enforced((calc, role) in calculator(), overshoot in 0u32..8) {
        let register = calc.register_count(role) + overshoot;
        let is_range_error = matches!(
            calc.check_register_lane(role, register, 0),
            Err(CalcError::RegisterOutOfRange { .. })
        );
        prop_assert!(is_range_error);
    }
}

//! End-to-end layout scenarios across the three families.
//!
//! Each section exercises the public query surface the way the command-line
//! front end does: bind a calculator, validate modifiers, run one query.

use mic_calc::{
    get_register, matrix_entry, matrix_layout, register_layout, CalcError, Calculator,
    LogicalCoordinate, MatrixEntry, MatrixRole, Modifier, ModifierSet, UnusedReason,
};
use mic_catalog::{Architecture, Catalog, InstructionDescriptor};

fn descriptor(arch: Architecture, mnemonic: &str) -> &'static InstructionDescriptor {
    Catalog::full().find(arch, mnemonic).expect("instruction in catalog")
}

fn calc(arch: Architecture, mnemonic: &str, wave: u32) -> Calculator {
    Calculator::new(descriptor(arch, mnemonic), wave).expect("permitted wave width")
}

fn first_location(calc: &Calculator, coord: LogicalCoordinate, mods: &ModifierSet) -> String {
    let lines = get_register(calc, &coord, mods, false).expect("located");
    lines[0].location.to_string()
}

// =============================================================================
// Gfx9 blocks
// =============================================================================

#[test]
fn blocks_stack_along_lanes() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x1f32", 64);
    let none = ModifierSet::default();
    assert_eq!(first_location(&c, LogicalCoordinate::new(MatrixRole::A, 0, 0, 0, 0), &none), "v0{0}");
    assert_eq!(first_location(&c, LogicalCoordinate::new(MatrixRole::A, 0, 0, 0, 1), &none), "v0{32}");
}

#[test]
fn block_names_carry_suffix() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x1f32", 64);
    let lines = get_register(&c, &LogicalCoordinate::new(MatrixRole::D, 5, 7, 0, 1), &ModifierSet::default(), false)
        .expect("located");
    assert!(lines[0].to_string().starts_with("D[5][7].B1 = "));
}

#[test]
fn cbsz_is_bounded_by_block_count() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x1f32", 64);
    let ok = ModifierSet { cbsz: 1, ..ModifierSet::default() };
    assert!(ok.validate(&c, MatrixRole::A, false, mic_calc::QueryKind::GetRegister).is_ok());
    let too_big = ModifierSet { cbsz: 2, ..ModifierSet::default() };
    let err = get_register(&c, &LogicalCoordinate::new(MatrixRole::A, 0, 0, 0, 0), &too_big, false).unwrap_err();
    assert!(matches!(
        err,
        CalcError::ModifierOutOfRange { field: Modifier::Cbsz, value: 2, max: 1, .. }
    ));
}

#[test]
fn abid_picks_broadcast_source() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x1f32", 64);
    let mods = ModifierSet { cbsz: 1, abid: 1, ..ModifierSet::default() };
    let block0 = first_location(&c, LogicalCoordinate::new(MatrixRole::A, 3, 0, 0, 0), &mods);
    assert_eq!(block0, "v0{35}");
}

#[test]
fn blgp_swizzles_b_lanes() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x2f32", 64);
    let mods = ModifierSet { blgp: 3, ..ModifierSet::default() };
    let b = first_location(&c, LogicalCoordinate::new(MatrixRole::B, 0, 4, 0, 0), &mods);
    assert_eq!(b, "v0{20}");
}

#[test]
fn blgp_rejected_on_a() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x2f32", 64);
    let mods = ModifierSet { blgp: 1, ..ModifierSet::default() };
    let err = get_register(&c, &LogicalCoordinate::new(MatrixRole::A, 0, 0, 0, 0), &mods, false).unwrap_err();
    assert!(matches!(err, CalcError::ModifierNotApplicable { field: Modifier::Blgp, .. }));
}

#[test]
fn fp64_uses_register_pairs() {
    let c = calc(Architecture::Cdna2, "v_mfma_f64_16x16x4f64", 64);
    let lines = get_register(&c, &LogicalCoordinate::new(MatrixRole::A, 0, 0, 0, 0), &ModifierSet::default(), false)
        .expect("located");
    assert_eq!(lines[0].location.to_string(), "v[1:0]{0}");
}

// =============================================================================
// Structured sparsity
// =============================================================================

#[test]
fn sparse_flag_gates_k_role() {
    let sparse = *descriptor(Architecture::Cdna3, "v_smfmac_f32_16x16x32_f16");
    let k = LogicalCoordinate::new(MatrixRole::K, 0, 0, 0, 0);

    let c = Calculator::new(&sparse, 64).expect("wave64");
    let lines = get_register(&c, &k, &ModifierSet::default(), false).expect("sparse K located");
    assert!(lines[0].location.register.bit_range().is_some());

    let mut dense = sparse;
    dense.sparse = false;
    let c = Calculator::new(&dense, 64).expect("wave64");
    let err = get_register(&c, &k, &ModifierSet::default(), false).unwrap_err();
    assert!(matches!(err, CalcError::UnsupportedRole { role: MatrixRole::K, .. }));
}

#[test]
fn sparse_has_no_c() {
    let c = calc(Architecture::Cdna3, "v_smfmac_f32_16x16x32_f16", 64);
    let err = register_layout(&c, MatrixRole::C, &ModifierSet::default(), false).unwrap_err();
    assert!(matches!(err, CalcError::UnsupportedRole { role: MatrixRole::C, .. }));
}

#[test]
fn sparse_a_holds_half_of_k() {
    let c = calc(Architecture::Cdna3, "v_smfmac_f32_16x16x32_f16", 64);
    let ok = LogicalCoordinate::new(MatrixRole::A, 0, 0, 15, 0);
    assert!(get_register(&c, &ok, &ModifierSet::default(), false).is_ok());
    let past = LogicalCoordinate::new(MatrixRole::A, 0, 0, 16, 0);
    assert!(matches!(
        get_register(&c, &past, &ModifierSet::default(), false),
        Err(CalcError::CoordinateOutOfBounds { field: "k", max: 15, .. })
    ));
    let b = LogicalCoordinate::new(MatrixRole::B, 0, 0, 31, 0);
    assert!(get_register(&c, &b, &ModifierSet::default(), false).is_ok());
}

#[test]
fn sparse_expansion_has_no_c_term() {
    let c = calc(Architecture::Cdna3, "v_smfmac_f32_16x16x32_f16", 64);
    let lines = get_register(&c, &LogicalCoordinate::new(MatrixRole::D, 0, 0, 0, 0), &ModifierSet::default(), true)
        .expect("expanded");
    let source = lines[0].source.as_deref().expect("source");
    assert!(source.contains("Src2_"));
    assert!(!source.ends_with("Src2_v0{0}"));
}

// =============================================================================
// Gfx11 replication and OPSEL
// =============================================================================

#[test]
fn rdna3_inputs_replicate_per_lane_group() {
    let c32 = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 32);
    let c64 = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 64);
    let coord = LogicalCoordinate::new(MatrixRole::B, 0, 2, 5, 0);
    let none = ModifierSet::default();
    assert_eq!(get_register(&c32, &coord, &none, false).expect("w32").len(), 2);
    assert_eq!(get_register(&c64, &coord, &none, false).expect("w64").len(), 4);
}

#[test]
fn rdna3_opsel_selects_upper_half() {
    let c = calc(Architecture::Rdna3, "v_wmma_f16_16x16x16_f16", 32);
    let coord = LogicalCoordinate::new(MatrixRole::D, 2, 3, 0, 0);
    let low = first_location(&c, coord, &ModifierSet::default());
    let high = first_location(&c, coord, &ModifierSet { opsel: 4, ..ModifierSet::default() });
    assert_eq!(low, "v1{3}.[15:0]");
    assert_eq!(high, "v1{3}.[31:16]");
    let bad = ModifierSet { opsel: 1, ..ModifierSet::default() };
    assert!(get_register(&c, &coord, &bad, false).is_err());
}

#[test]
fn rdna3_negation_decorates_halves() {
    let c = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 32);
    let mods = ModifierSet { neg: 1, ..ModifierSet::default() };
    let table = matrix_layout(&c, MatrixRole::A, &mods, false).expect("layout");
    let first = &table.body()[0];
    assert_eq!(first[1], vec!["-A[0][0]".to_owned()]);
    assert_eq!(first[2], vec!["A[0][1]".to_owned()]);
}

#[test]
fn rdna3_integer_forbids_neg_hi() {
    let c = calc(Architecture::Rdna3, "v_wmma_i32_16x16x16_iu8", 32);
    let mods = ModifierSet { neg_hi: 1, ..ModifierSet::default() };
    assert!(matrix_layout(&c, MatrixRole::A, &mods, false).is_err());
}

// =============================================================================
// Gfx12 sparsity and half population
// =============================================================================

#[test]
fn rdna4_half_populated_lanes() {
    let c = calc(Architecture::Rdna4, "v_wmma_i32_16x16x16_iu4", 64);
    assert_eq!(c.lane_count(MatrixRole::A), 32);
    assert_eq!(c.lane_count(MatrixRole::D), 64);
    assert!(matches!(
        matrix_entry(&c, MatrixRole::A, 0, 40, &ModifierSet::default(), false),
        Err(CalcError::LaneOutOfRange { max: 31, .. })
    ));
}

#[test]
fn rdna4_opsel_selects_index_set() {
    let c = calc(Architecture::Rdna4, "v_swmmac_f32_16x16x32_f16", 32);
    assert!(c.compression_set_count() > 1);
    let coord = LogicalCoordinate::new(MatrixRole::K, 1, 0, 9, 0);
    let base = first_location(&c, coord, &ModifierSet::default());
    let shifted = first_location(&c, coord, &ModifierSet { opsel: 1, ..ModifierSet::default() });
    assert_ne!(base, shifted);
    let past = ModifierSet { opsel: c.compression_set_count(), ..ModifierSet::default() };
    assert!(matches!(
        get_register(&c, &coord, &past, false),
        Err(CalcError::ModifierOutOfRange { field: Modifier::Opsel, .. })
    ));
}

// =============================================================================
// Reverse queries
// =============================================================================

#[test]
fn entry_inverts_register_query() {
    for (arch, mnemonic, wave) in [
        (Architecture::Cdna2, "v_mfma_f32_16x16x16f16", 64),
        (Architecture::Rdna3, "v_wmma_f32_16x16x16_bf16", 64),
        (Architecture::Rdna4, "v_wmma_f32_16x16x16_f16", 32),
    ] {
        let c = calc(arch, mnemonic, wave);
        let coord = LogicalCoordinate::new(MatrixRole::A, 3, 0, 6, 0);
        let line = get_register(&c, &coord, &ModifierSet::default(), false).expect("located").remove(0);
        let register = line.location.register.base_register();
        let entry = matrix_entry(&c, MatrixRole::A, register, line.location.lane, &ModifierSet::default(), false)
            .expect("entry");
        let MatrixEntry::Entries(lines) = entry else {
            panic!("{mnemonic}: lane unexpectedly unused");
        };
        assert!(lines.iter().any(|l| l.element == "A[3][6]"), "{mnemonic}");
    }
}

#[test]
fn unused_lanes_are_reported() {
    let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x2f32", 64);
    let mods = ModifierSet { blgp: 1, ..ModifierSet::default() };
    let entry = matrix_entry(&c, MatrixRole::B, 0, 33, &mods, false).expect("entry");
    assert!(matches!(entry, MatrixEntry::LaneUnused { lane: 33, reason: UnusedReason::Blgp }));
}

#[test]
fn register_layout_covers_matrix() {
    let c = calc(Architecture::Cdna2, "v_mfma_f32_16x16x16f16", 64);
    let tables = register_layout(&c, MatrixRole::B, &ModifierSet::default(), false).expect("layout");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].body().len(), 16);
    assert_eq!(tables[0].width(), 17);
}

//! Register and lane layout calculator for AMD matrix instructions.
//!
//! `mic-calc` answers where each element of the A, B, C, D (and sparse K)
//! matrices of an MFMA, SMFMAC, WMMA or SWMMAC instruction lives in the
//! vector register file, and which elements a register and lane hold. It
//! covers the Gfx9 (CDNA1-3), Gfx11 (RDNA3) and Gfx12 (RDNA4) families,
//! including the CBSZ/ABID, BLGP, OPSEL and NEG modifiers.
//!
//! # Entry Point
//!
//! ```
//! use mic_calc::{get_register, Calculator, LogicalCoordinate, MatrixRole, ModifierSet};
//! use mic_catalog::{Architecture, Catalog};
//!
//! let desc = Catalog::full()
//!     .find(Architecture::Cdna1, "v_mfma_f32_32x32x1f32")
//!     .unwrap();
//! let calc = Calculator::new(desc, 64).unwrap();
//! let a = LogicalCoordinate::new(MatrixRole::A, 0, 0, 0, 1);
//! let lines = get_register(&calc, &a, &ModifierSet::default(), false).unwrap();
//! assert_eq!(lines[0].to_string(), "A[0][0].B1 = v0{32}");
//! ```
//!
//! # Queries
//!
//! | function | direction |
//! |---|---|
//! | [`get_register`] | element to register and lanes |
//! | [`matrix_entry`] | register and lane to elements |
//! | [`register_layout`] | every element, as a table of locations |
//! | [`matrix_layout`] | every location, as a table of elements |
//! | [`InstructionInfo::build`] | dimensions, statistics and equations |

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod arch;
pub mod compositor;
pub mod dictionary;
pub mod equation;
pub mod error;
pub mod info;
pub mod modifiers;
pub mod naming;
pub mod query;
pub mod role;
pub mod table;
pub mod transform;

pub use arch::{ArchitectureCalculator, Calculator, PhysicalLocation, Placement};
pub use compositor::SourceCompositor;
pub use dictionary::RegisterDictionary;
pub use equation::{Axis, Equation, Expr};
pub use error::{CalcError, Result};
pub use info::{InfoSection, InstructionInfo};
pub use modifiers::{Modifier, ModifierSet, Negation, QueryKind};
pub use naming::{Location, RegisterSpec};
pub use query::{
    get_register, matrix_entry, matrix_layout, register_layout, EntryLine, MatrixEntry,
    RegisterLine, UnusedReason,
};
pub use role::{Element, LogicalCoordinate, MatrixRole};
pub use table::{Cell, LayoutTable};

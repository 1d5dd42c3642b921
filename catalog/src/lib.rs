//! AMD matrix instruction catalog encoded as typed Rust data.
//!
//! The `mic-catalog` crate provides the descriptor of every dense and
//! structured-sparse matrix-multiply instruction on CDNA1, CDNA2, CDNA3,
//! RDNA3 and RDNA4: opcode, element types, dimensions, cycle counts and the
//! modifier capabilities that change how operands map onto registers.
//!
//! # Entry Point
//!
//! ```
//! use mic_catalog::{Architecture, Catalog};
//!
//! let catalog = Catalog::full();
//! let mfma = catalog
//!     .find(Architecture::Cdna2, "v_mfma_f32_32x32x8f16")
//!     .unwrap();
//! assert_eq!((mfma.m, mfma.n, mfma.k), (32, 32, 8));
//! ```
//!
//! # Serialization
//!
//! ```
//! let catalog = mic_catalog::Catalog::full();
//! let json = mic_catalog::serializer::json::to_json(catalog, None);
//! assert!(json.is_array());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod model;
#[cfg(feature = "serializers")]
pub mod serializer;
pub mod tables;

use std::collections::HashMap;

pub use error::{CatalogError, Result};
pub use model::{Architecture, ElementType, Family, InstructionDescriptor};

/// The assembled instruction catalog with a per-architecture mnemonic index.
#[derive(Debug)]
pub struct Catalog {
    index: HashMap<Architecture, HashMap<&'static str, &'static InstructionDescriptor>>,
}

impl Catalog {
    /// Returns the complete catalog, assembled on first use.
    #[must_use]
    pub fn full() -> &'static Catalog {
        static CATALOG: std::sync::OnceLock<Catalog> = std::sync::OnceLock::new();
        CATALOG.get_or_init(|| {
            let index = Architecture::ALL
                .into_iter()
                .map(|arch| {
                    let by_name = tables::instructions(arch)
                        .iter()
                        .map(|inst| (inst.mnemonic, inst))
                        .collect();
                    (arch, by_name)
                })
                .collect();
            Catalog { index }
        })
    }

    /// Every instruction of one architecture, in table order.
    #[must_use]
    pub fn instructions(&self, arch: Architecture) -> &'static [InstructionDescriptor] {
        tables::instructions(arch)
    }

    /// Iterates every instruction of every architecture.
    pub fn iter(&self) -> impl Iterator<Item = &'static InstructionDescriptor> {
        Architecture::ALL
            .into_iter()
            .flat_map(|arch| tables::instructions(arch).iter())
    }

    /// Total number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.values().map(HashMap::len).sum()
    }

    /// Whether the catalog is empty (never true for the built-in tables).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds an instruction by mnemonic, ignoring case.
    #[must_use]
    pub fn find(&self, arch: Architecture, mnemonic: &str) -> Option<&'static InstructionDescriptor> {
        let wanted = mnemonic.trim().to_ascii_lowercase();
        self.index
            .get(&arch)
            .and_then(|by_name| by_name.get(wanted.as_str()))
            .copied()
    }

    /// Resolves an architecture name or alias and a mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownArchitecture`] when the architecture name
    /// is not recognized, and [`CatalogError::UnknownInstruction`] when the
    /// architecture has no such mnemonic.
    pub fn lookup(
        &self,
        arch_name: &str,
        mnemonic: &str,
    ) -> Result<&'static InstructionDescriptor> {
        let arch = Architecture::from_name(arch_name)
            .ok_or_else(|| CatalogError::unknown_architecture(arch_name))?;
        self.find(arch, mnemonic)
            .ok_or_else(|| CatalogError::UnknownInstruction {
                arch,
                mnemonic: mnemonic.to_owned(),
            })
    }
}

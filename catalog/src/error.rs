//! Catalog lookup errors.

use crate::model::Architecture;

/// Result alias for catalog lookups.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure to resolve an architecture or instruction by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The name is neither a canonical architecture name nor an alias.
    #[error("Desired architecture, '{name}', is not supported. Please choose between: {choices} or their alternative names.")]
    UnknownArchitecture {
        /// The name as given.
        name: String,
        /// Comma-separated canonical names.
        choices: String,
    },

    /// The architecture has no instruction with this mnemonic.
    #[error("Instruction '{mnemonic}' is not supported in the requested architecture, {arch}.")]
    UnknownInstruction {
        /// The architecture searched.
        arch: Architecture,
        /// The mnemonic as given.
        mnemonic: String,
    },
}

impl CatalogError {
    /// Builds an [`CatalogError::UnknownArchitecture`] listing every canonical name.
    pub fn unknown_architecture(name: impl Into<String>) -> Self {
        let choices = Architecture::ALL
            .iter()
            .map(|arch| arch.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownArchitecture {
            name: name.into(),
            choices,
        }
    }
}

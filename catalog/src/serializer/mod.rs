//! Serializers for the instruction catalog.
//!
//! - **JSON** ([`json`]): one object per instruction, used by
//!   `mic --list-instructions --json`.

pub mod json;

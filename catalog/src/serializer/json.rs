//! JSON serializer for the instruction catalog.
//!
//! Each descriptor becomes one flat object. Derived values the CLI prints in
//! its info report (total operations, stored sparse depth) are included so
//! downstream tools need not recompute them.

use serde_json::{json, Map, Value};

use crate::model::{Architecture, InstructionDescriptor};
use crate::Catalog;

/// Serializes the catalog, or one architecture of it, to a JSON array.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json(catalog: &Catalog, arch: Option<Architecture>) -> Value {
    let entries: Vec<Value> = match arch {
        Some(arch) => catalog.instructions(arch).iter().map(descriptor_to_json).collect(),
        None => catalog.iter().map(descriptor_to_json).collect(),
    };
    Value::Array(entries)
}

/// Serializes a single descriptor.
#[must_use]
pub fn descriptor_to_json(inst: &InstructionDescriptor) -> Value {
    let mut node = match serde_json::to_value(inst) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    node.insert("family".to_owned(), json!(inst.arch.family().as_str()));
    node.insert("operations".to_owned(), json!(inst.operations()));
    if inst.sparse {
        node.insert("stored_k".to_owned(), json!(inst.stored_k()));
    }
    Value::Object(node)
}

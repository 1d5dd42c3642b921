//! Reverse lookup from register locations to matrix elements.

use std::collections::HashMap;

use tracing::debug;

use crate::arch::Calculator;
use crate::error::Result;
use crate::modifiers::ModifierSet;
use crate::naming::Location;
use crate::role::{Element, MatrixRole};

/// Every location of one matrix with the elements it holds.
///
/// Entries keep first-insertion order and element lists keep coordinate
/// order; a location holds several elements only when a modifier broadcasts
/// data or sparsity compresses it.
#[derive(Debug, Clone, Default)]
pub struct RegisterDictionary {
    entries: Vec<(Location, Vec<Element>)>,
    index: HashMap<Location, usize>,
}

impl RegisterDictionary {
    /// Locates every coordinate of `role` under `mods`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnsupportedRole`](crate::CalcError::UnsupportedRole)
    /// when `role` is not an operand of the instruction.
    pub fn build(calc: &Calculator, role: MatrixRole, mods: &ModifierSet) -> Result<Self> {
        calc.check_role(role)?;
        let mut dict = Self::default();
        for coord in calc.coordinates(role) {
            let placement = calc.locate(&coord, mods)?;
            for location in placement.location.locations() {
                dict.insert(location, placement.element);
            }
        }
        debug!(
            instruction = calc.descriptor().mnemonic,
            %role,
            locations = dict.len(),
            "built register dictionary"
        );
        Ok(dict)
    }

    fn insert(&mut self, location: Location, element: Element) {
        match self.index.get(&location) {
            Some(&n) => self.entries[n].1.push(element),
            None => {
                self.index.insert(location, self.entries.len());
                self.entries.push((location, vec![element]));
            }
        }
    }

    /// Elements held at `location`.
    #[must_use]
    pub fn get(&self, location: &Location) -> Option<&[Element]> {
        self.index.get(location).map(|&n| self.entries[n].1.as_slice())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Location, &[Element])> {
        self.entries.iter().map(|(loc, elems)| (loc, elems.as_slice()))
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no location was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::RegisterSpec;
    use mic_catalog::{Architecture, Catalog};

    fn calc(arch: Architecture, mnemonic: &str, wave: u32) -> Calculator {
        let desc = Catalog::full().find(arch, mnemonic).expect("instruction in catalog");
        Calculator::new(desc, wave).expect("permitted wave width")
    }

    #[test]
    fn dense_locations_hold_one_element() {
        let c = calc(Architecture::Cdna2, "v_mfma_f32_16x16x16f16", 64);
        let dict = RegisterDictionary::build(&c, MatrixRole::B, &ModifierSet::default()).expect("dictionary");
        assert_eq!(dict.len(), 16 * 16);
        assert!(dict.iter().all(|(_, elems)| elems.len() == 1));
    }

    #[test]
    fn broadcast_stacks_elements_in_coordinate_order() {
        let c = calc(Architecture::Cdna1, "v_mfma_f32_32x32x1f32", 64);
        let mods = ModifierSet { cbsz: 1, ..ModifierSet::default() };
        let dict = RegisterDictionary::build(&c, MatrixRole::A, &mods).expect("dictionary");
        let held = dict.get(&RegisterSpec::Whole(0).at_lane(0)).expect("lane 0 used");
        let names: Vec<_> = held.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["A[0][0].B0", "A[0][0].B1"]);
        assert!(dict.get(&RegisterSpec::Whole(0).at_lane(32)).is_none());
    }

    #[test]
    fn replicated_inputs_appear_at_every_copy() {
        let c = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 64);
        let dict = RegisterDictionary::build(&c, MatrixRole::A, &ModifierSet::default()).expect("dictionary");
        assert_eq!(dict.len(), 16 * 16 * 4);
        let first = dict.get(&RegisterSpec::for_slot(16, 0).at_lane(48)).expect("copy in lane group 3");
        assert_eq!(first[0].to_string(), "A[0][0]");
    }

    #[test]
    fn missing_role_is_rejected() {
        let c = calc(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16", 32);
        assert!(RegisterDictionary::build(&c, MatrixRole::K, &ModifierSet::default()).is_err());
    }
}

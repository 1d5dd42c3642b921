//! Expansion of a D element into the A, B and C values that produce it.
//!
//! Two renderings exist. The register form names the source registers:
//! `Src0_v0{3}*Src1_v0{5} + ... + Src2_v2{5}`. The element form names the
//! data found there: `A[3][0]*B[0][5] + ... + C[3][5]`. Both honor the
//! data-moving modifiers, so a broadcast or swizzled operand shows the
//! element actually read, and both carry NEG/NEG_HI decorations.
//!
//! Sparse instructions accumulate without C: `D += A x B`, where each stored
//! A value multiplies the B row chosen by its 2-bit index.

use crate::arch::Calculator;
use crate::dictionary::RegisterDictionary;
use crate::error::Result;
use crate::modifiers::{ModifierSet, Negation};
use crate::naming::RegisterSpec;
use crate::role::{Element, LogicalCoordinate, MatrixRole};

/// Builds source expansions of D elements for one calculator and modifier set.
#[derive(Debug)]
pub struct SourceCompositor<'a> {
    calc: &'a Calculator,
    mods: ModifierSet,
    negation: Negation,
    plain_a: RegisterDictionary,
    plain_b: RegisterDictionary,
}

/// One located operand value with the lane chosen for the product.
struct Operand {
    register: RegisterSpec,
    lane: u32,
}

impl<'a> SourceCompositor<'a> {
    /// Prepares expansions under `mods`.
    ///
    /// # Errors
    ///
    /// Propagates dictionary construction failures.
    pub fn new(calc: &'a Calculator, mods: &ModifierSet) -> Result<Self> {
        let none = ModifierSet::default();
        Ok(Self {
            calc,
            mods: *mods,
            negation: mods.negation(calc.descriptor()),
            plain_a: RegisterDictionary::build(calc, MatrixRole::A, &none)?,
            plain_b: RegisterDictionary::build(calc, MatrixRole::B, &none)?,
        })
    }

    fn operand(&self, coord: LogicalCoordinate, mods: &ModifierSet) -> Result<Operand> {
        let placed = self.calc.locate(&coord, mods)?.location;
        let lane = placed.lanes.first().copied().unwrap_or_default();
        Ok(Operand {
            register: placed.register,
            lane,
        })
    }

    /// The A operand, the B operand at the lane paired with A, and the B
    /// operand at the lane that holds its data.
    fn product(&self, d: &LogicalCoordinate, k: u32) -> Result<(Operand, Operand, Operand)> {
        let a = self.operand(
            LogicalCoordinate::new(MatrixRole::A, d.i, 0, k, d.block),
            &self.mods.a_only(),
        )?;
        let b_coord = LogicalCoordinate::new(MatrixRole::B, 0, d.j, k, d.block);
        let b_placed = self.calc.locate(&b_coord, &self.mods.b_only())?.location;
        let paired = self.calc.pair_b_lane(a.lane, &b_placed.lanes).unwrap_or(a.lane);
        let data = b_placed.lanes.first().copied().unwrap_or(paired);
        let b = Operand {
            register: b_placed.register,
            lane: paired,
        };
        let b_data = Operand {
            register: b_placed.register,
            lane: data,
        };
        Ok((a, b, b_data))
    }

    fn c_term(&self, name: &str) -> String {
        let sign = if self.negation.c { " - " } else { " + " };
        if self.negation.c_abs {
            format!("{sign}|{name}|")
        } else {
            format!("{sign}{name}")
        }
    }

    /// Register-form expansion of `d`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::CoordinateOutOfBounds`](crate::CalcError::CoordinateOutOfBounds)
    /// when `d` lies outside the D matrix.
    pub fn register_form(&self, d: &LogicalCoordinate) -> Result<String> {
        if self.calc.descriptor().sparse {
            return self.sparse_register_form(d);
        }
        let mut terms = Vec::new();
        for k in 0..self.calc.descriptor().k {
            let (a, b, _) = self.product(d, k)?;
            let a_name = format!("Src0_{}", a.register.at_lane(a.lane));
            let b_name = format!("Src1_{}", b.register.at_lane(b.lane));
            terms.push(format!(
                "{}*{}",
                self.negation.decorate(MatrixRole::A, &a.register, &a_name),
                self.negation.decorate(MatrixRole::B, &b.register, &b_name)
            ));
        }
        let c_coord = LogicalCoordinate::new(MatrixRole::C, d.i, d.j, 0, d.block);
        let c = self.operand(c_coord, &self.mods.c_only())?;
        let c_name = format!("Src2_{}", c.register.at_lane(c.lane));
        Ok(format!("{}{}", terms.join(" + "), self.c_term(&c_name)))
    }

    /// Element-form expansion of `d`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::CoordinateOutOfBounds`](crate::CalcError::CoordinateOutOfBounds)
    /// when `d` lies outside the D matrix.
    pub fn element_form(&self, d: &LogicalCoordinate) -> Result<String> {
        if self.calc.descriptor().sparse {
            return self.sparse_element_form(d);
        }
        let mut terms = Vec::new();
        for k in 0..self.calc.descriptor().k {
            let (a, b, b_data) = self.product(d, k)?;
            let b_elem = held(&self.plain_b, &b_data)
                .into_iter()
                .next()
                .unwrap_or_else(|| {
                    self.calc
                        .element(&LogicalCoordinate::new(MatrixRole::B, 0, d.j, k, d.block))
                });
            let b_name = self.negation.decorate(MatrixRole::B, &b.register, &b_elem.to_string());
            let a_coord = LogicalCoordinate::new(MatrixRole::A, d.i, 0, k, d.block);
            for a_elem in self.a_elements(&a, &a_coord) {
                terms.push(format!(
                    "{}*{b_name}",
                    self.negation.decorate(MatrixRole::A, &a.register, &a_elem.to_string())
                ));
            }
        }
        let c_elem = self
            .calc
            .element(&LogicalCoordinate::new(MatrixRole::C, d.i, d.j, 0, d.block));
        Ok(format!("{}{}", terms.join(" + "), self.c_term(&c_elem.to_string())))
    }

    /// The A elements read for reduction index `coord.k`: each one held at
    /// the operand's location with that index, or the logical element when
    /// none is.
    fn a_elements(&self, operand: &Operand, coord: &LogicalCoordinate) -> Vec<Element> {
        let matching: Vec<Element> = held(&self.plain_a, operand)
            .into_iter()
            .filter(|e| e.k() == Some(coord.k))
            .collect();
        if matching.is_empty() {
            vec![self.calc.element(coord)]
        } else {
            matching
        }
    }

    /// Whether every B value is negated, whichever half it occupies.
    fn negates_all_b(&self) -> bool {
        self.negation.b || (self.negation.b_lo && self.negation.b_hi)
    }

    fn sparse_b(&self, base: u32, index: &str, j: u32) -> String {
        let name = format!("B[{base}+{index}][{j}]");
        if self.negates_all_b() {
            format!("-{name}")
        } else {
            name
        }
    }

    fn sparse_register_form(&self, d: &LogicalCoordinate) -> Result<String> {
        let mut terms = Vec::new();
        for k in 0..self.calc.descriptor().stored_k() {
            let a = self.operand(
                LogicalCoordinate::new(MatrixRole::A, d.i, 0, k, d.block),
                &self.mods.a_only(),
            )?;
            let index = self.operand(
                LogicalCoordinate::new(MatrixRole::K, d.i, 0, k, d.block),
                &self.mods.index_only(),
            )?;
            let a_name = format!("Src0_{}", a.register.at_lane(a.lane));
            let index_name = format!("Src2_{}", index.register.at_lane(index.lane));
            terms.push(format!(
                "{}*{}",
                self.negation.decorate(MatrixRole::A, &a.register, &a_name),
                self.sparse_b(4 * (k / 2), &index_name, d.j)
            ));
        }
        Ok(terms.join(" + "))
    }

    fn sparse_element_form(&self, d: &LogicalCoordinate) -> Result<String> {
        let mut terms = Vec::new();
        for k in 0..self.calc.descriptor().stored_k() {
            let a_coord = LogicalCoordinate::new(MatrixRole::A, d.i, 0, k, d.block);
            let a = self.operand(a_coord, &self.mods.a_only())?;
            let index = self
                .calc
                .element(&LogicalCoordinate::new(MatrixRole::K, d.i, 0, k, d.block));
            let b_name = self.sparse_b(4 * (k / 2), &index.to_string(), d.j);
            for a_elem in self.a_elements(&a, &a_coord) {
                terms.push(format!(
                    "{}*{b_name}",
                    self.negation.decorate(MatrixRole::A, &a.register, &a_elem.to_string())
                ));
            }
        }
        Ok(terms.join(" + "))
    }
}

/// Every element held at an operand's location in the unmodified layout.
fn held(dict: &RegisterDictionary, operand: &Operand) -> Vec<Element> {
    dict.get(&operand.register.at_lane(operand.lane))
        .map(<[Element]>::to_vec)
        .unwrap_or_default()
}

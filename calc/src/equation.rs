//! Symbolic register/lane equations.
//!
//! Every family describes its layout twice: numerically for placement and
//! symbolically for documentation. The symbolic side is built from the small
//! [`Expr`] algebra below, which folds constants and drops terms that a
//! variable's bound makes trivial, so `(k % 1)` or `floor(lane / 64)` never
//! reach the output.

use std::fmt;

/// Variable name of the row index.
pub const VAR_I: &str = "i";
/// Variable name of the column index.
pub const VAR_J: &str = "j";
/// Variable name of the reduction index.
pub const VAR_K: &str = "k";
/// Variable name of the block index.
pub const VAR_BLOCK: &str = "block";
/// Variable name of the register number in inverse equations.
pub const VAR_GPR_NUM: &str = "GPR_num";
/// Variable name of the lowest bit of a sub-register slice.
pub const VAR_GPR_BITS: &str = "GPR_bits";
/// Variable name of the lane in inverse equations.
pub const VAR_LANE: &str = "lane";

/// An integer expression over named, optionally bounded, variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal.
    Const(u32),
    /// Variable with an exclusive upper bound when known.
    Var {
        /// Name as printed.
        name: &'static str,
        /// Exclusive upper bound.
        bound: Option<u32>,
    },
    /// Sum of two or more terms.
    Sum(Vec<Expr>),
    /// `factor * expr`.
    Scale(u32, Box<Expr>),
    /// `floor(expr / divisor)`.
    FloorDiv(Box<Expr>, u32),
    /// `expr % modulus`.
    Mod(Box<Expr>, u32),
}

impl Expr {
    /// A literal.
    #[must_use]
    pub fn constant(value: u32) -> Self {
        Expr::Const(value)
    }

    /// An unbounded variable.
    #[must_use]
    pub fn var(name: &'static str) -> Self {
        Expr::Var { name, bound: None }
    }

    /// A variable taking values in `0..bound`. A bound of 0 or 1 leaves
    /// only the value 0.
    #[must_use]
    pub fn bounded(name: &'static str, bound: u32) -> Self {
        if bound <= 1 {
            return Expr::Const(0);
        }
        Expr::Var {
            name,
            bound: Some(bound),
        }
    }

    /// `factor * expr`.
    #[must_use]
    pub fn scale(self, factor: u32) -> Self {
        match (factor, self) {
            (0, _) | (_, Expr::Const(0)) => Expr::Const(0),
            (1, expr) => expr,
            (f, Expr::Const(c)) => Expr::Const(f.saturating_mul(c)),
            (f, Expr::Scale(g, inner)) => Expr::Scale(f.saturating_mul(g), inner),
            (f, expr) => Expr::Scale(f, Box::new(expr)),
        }
    }

    /// `floor(expr / divisor)`.
    #[must_use]
    pub fn div(self, divisor: u32) -> Self {
        if divisor <= 1 {
            return self;
        }
        if self.upper_bound().is_some_and(|ub| ub <= divisor) {
            return Expr::Const(0);
        }
        match self {
            Expr::Const(c) => Expr::Const(c / divisor),
            Expr::FloorDiv(inner, d) => Expr::FloorDiv(inner, d.saturating_mul(divisor)),
            Expr::Scale(f, inner) if f % divisor == 0 => inner.scale(f / divisor),
            expr => Expr::FloorDiv(Box::new(expr), divisor),
        }
    }

    /// `expr % modulus`.
    #[must_use]
    pub fn rem(self, modulus: u32) -> Self {
        if modulus <= 1 {
            return Expr::Const(0);
        }
        if self.upper_bound().is_some_and(|ub| ub <= modulus) {
            return self;
        }
        match self {
            Expr::Const(c) => Expr::Const(c % modulus),
            Expr::Mod(inner, m) if m % modulus == 0 => inner.rem(modulus),
            Expr::Scale(f, _) if f % modulus == 0 => Expr::Const(0),
            expr => Expr::Mod(Box::new(expr), modulus),
        }
    }

    /// `self + other`.
    #[must_use]
    pub fn plus(self, other: Expr) -> Self {
        Expr::sum([self, other])
    }

    /// Sum of `terms`, flattened with constants folded into one trailing term.
    #[must_use]
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        let mut constant = 0u32;
        let mut push = |term: Expr, flat: &mut Vec<Expr>| match term {
            Expr::Const(c) => constant = constant.saturating_add(c),
            other => flat.push(other),
        };
        for term in terms {
            match term {
                Expr::Sum(inner) => {
                    for t in inner {
                        push(t, &mut flat);
                    }
                }
                other => push(other, &mut flat),
            }
        }
        if constant > 0 {
            flat.push(Expr::Const(constant));
        }
        match flat.len() {
            0 => Expr::Const(0),
            1 => flat.swap_remove(0),
            _ => Expr::Sum(flat),
        }
    }

    /// Exclusive upper bound of the value, when every variable is bounded.
    #[must_use]
    pub fn upper_bound(&self) -> Option<u32> {
        match self {
            Expr::Const(c) => c.checked_add(1),
            Expr::Var { bound, .. } => *bound,
            Expr::Sum(terms) => terms
                .iter()
                .try_fold(0u32, |acc, t| Some(acc.saturating_add(t.upper_bound()?.saturating_sub(1))))
                .map(|max| max.saturating_add(1)),
            Expr::Scale(f, inner) => inner
                .upper_bound()
                .map(|ub| f.saturating_mul(ub.saturating_sub(1)).saturating_add(1)),
            Expr::FloorDiv(inner, d) => inner.upper_bound().map(|ub| ub.saturating_sub(1) / d + 1),
            Expr::Mod(inner, m) => Some(inner.upper_bound().map_or(*m, |ub| ub.min(*m))),
        }
    }

    /// Evaluates with the given variable bindings. `None` when a variable is
    /// unbound.
    #[must_use]
    pub fn evaluate(&self, bindings: &[(&str, u32)]) -> Option<u32> {
        match self {
            Expr::Const(c) => Some(*c),
            Expr::Var { name, .. } => bindings
                .iter()
                .find(|(bound_name, _)| bound_name == name)
                .map(|(_, value)| *value),
            Expr::Sum(terms) => terms
                .iter()
                .try_fold(0u32, |acc, t| Some(acc + t.evaluate(bindings)?)),
            Expr::Scale(f, inner) => Some(f * inner.evaluate(bindings)?),
            Expr::FloorDiv(inner, d) => Some(inner.evaluate(bindings)? / d),
            Expr::Mod(inner, m) => Some(inner.evaluate(bindings)? % m),
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Sum(_) | Expr::Scale(..) => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Var { name, .. } => f.write_str(name),
            Expr::Sum(terms) => {
                for (n, term) in terms.iter().enumerate() {
                    if n > 0 {
                        f.write_str(" + ")?;
                    }
                    if matches!(term, Expr::Sum(_)) {
                        write!(f, "({term})")?;
                    } else {
                        write!(f, "{term}")?;
                    }
                }
                Ok(())
            }
            Expr::Scale(factor, inner) => {
                write!(f, "{factor} * ")?;
                if matches!(**inner, Expr::Sum(_)) {
                    write!(f, "({inner})")
                } else {
                    write!(f, "{inner}")
                }
            }
            Expr::FloorDiv(inner, d) => {
                f.write_str("floor(")?;
                inner.write_operand(f)?;
                write!(f, " / {d})")
            }
            Expr::Mod(inner, m) => {
                f.write_str("(")?;
                inner.write_operand(f)?;
                write!(f, " % {m})")
            }
        }
    }
}

/// Storage slot index, in elements, of the register named by `GPR_num`
/// and `GPR_bits`.
///
/// `registers` bounds `GPR_num`.
#[must_use]
pub fn slot_of_register(bits: u32, registers: u32) -> Expr {
    let gpr = Expr::bounded(VAR_GPR_NUM, registers);
    match bits {
        64 => gpr.div(2),
        32 => gpr,
        _ => {
            let per_register = 32 / bits.max(1);
            let within = Expr::bounded(VAR_GPR_BITS, 32).div(bits);
            gpr.scale(per_register).plus(within)
        }
    }
}

/// A symbolic register, register pair or register slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterExpr {
    /// A full 32-bit register.
    Whole(Expr),
    /// The pair holding 64-bit slot `expr`.
    Pair(Expr),
    /// A bit slice of one register.
    Slice {
        /// Register number.
        register: Expr,
        /// Lowest bit.
        low: Expr,
        /// Width in bits.
        width: u32,
    },
}

impl RegisterExpr {
    /// Symbolic counterpart of [`RegisterSpec::for_slot`](crate::RegisterSpec::for_slot).
    #[must_use]
    pub fn for_slot(bits: u32, slot: Expr) -> Self {
        match bits {
            64 => RegisterExpr::Pair(slot),
            32 => RegisterExpr::Whole(slot),
            _ => {
                let per_register = 32 / bits.max(1);
                RegisterExpr::Slice {
                    register: slot.clone().div(per_register),
                    low: slot.rem(per_register).scale(bits),
                    width: bits,
                }
            }
        }
    }
}

impl fmt::Display for RegisterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterExpr::Whole(register) => write!(f, "{register}"),
            RegisterExpr::Pair(slot) => {
                let low = slot.clone().scale(2);
                let high = low.clone().plus(Expr::constant(1));
                write!(f, "[{high} : {low}]")
            }
            RegisterExpr::Slice {
                register,
                low,
                width,
            } => {
                let high = low.clone().plus(Expr::constant(width.saturating_sub(1)));
                write!(f, "{register}.[{high} : {low}]")
            }
        }
    }
}

/// The quantity an equation computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Register of a matrix element.
    Register,
    /// Lane (or lanes) of a matrix element.
    Lane,
    /// Row index of the element held at a register and lane.
    I,
    /// Column index of the element held at a register and lane.
    J,
    /// Reduction index of the element held at a register and lane.
    K,
    /// Block index of the element held at a register and lane.
    Block,
}

impl Axis {
    /// Axes of the element-to-register direction.
    pub const FORWARD: [Axis; 2] = [Axis::Register, Axis::Lane];
    /// Axes of the register-to-element direction.
    pub const INVERSE: [Axis; 4] = [Axis::I, Axis::J, Axis::K, Axis::Block];
}

/// One derived formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Equation {
    /// An index value.
    Value(Expr),
    /// A register expression.
    Register(RegisterExpr),
    /// Every lane holding a copy.
    Lanes(Vec<Expr>),
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Equation::Value(expr) => write!(f, "{expr}"),
            Equation::Register(register) => write!(f, "{register}"),
            Equation::Lanes(lanes) => {
                for (n, lane) in lanes.iter().enumerate() {
                    if n > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{lane}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_operations_fold_away() {
        let k = Expr::bounded(VAR_K, 4);
        assert_eq!(k.clone().rem(4), k);
        assert_eq!(k.clone().div(4), Expr::Const(0));
        assert_eq!(k.clone().rem(1), Expr::Const(0));
        assert_eq!(k.clone().div(1), k);
        assert_eq!(Expr::bounded(VAR_BLOCK, 1), Expr::Const(0));
    }

    #[test]
    fn sums_flatten_and_fold_constants() {
        let i = Expr::bounded(VAR_I, 32);
        let sum = Expr::sum([Expr::constant(2), i.clone(), Expr::sum([Expr::constant(3), Expr::var(VAR_J)])]);
        assert_eq!(sum.to_string(), "i + j + 5");
        assert_eq!(Expr::sum([Expr::constant(0)]), Expr::Const(0));
    }

    #[test]
    fn rendering_of_nested_terms() {
        let lane = Expr::bounded(VAR_LANE, 64);
        let expr = lane.clone().div(32).scale(4).plus(lane.rem(4));
        assert_eq!(expr.to_string(), "4 * floor(lane / 32) + (lane % 4)");
        let wrapped = Expr::var(VAR_K).plus(Expr::constant(1)).rem(3);
        assert_eq!(wrapped.to_string(), "((k + 1) % 3)");
    }

    #[test]
    fn evaluation_matches_arithmetic() {
        let k = Expr::bounded(VAR_K, 16);
        let expr = k.clone().div(4).scale(32).plus(Expr::var(VAR_I));
        assert_eq!(expr.evaluate(&[(VAR_K, 9), (VAR_I, 3)]), Some(67));
        assert_eq!(expr.evaluate(&[(VAR_K, 9)]), None);
    }

    #[test]
    fn upper_bounds_propagate() {
        let lane = Expr::bounded(VAR_LANE, 64);
        assert_eq!(lane.clone().div(16).upper_bound(), Some(4));
        assert_eq!(lane.clone().rem(16).upper_bound(), Some(16));
        assert_eq!(lane.clone().rem(16).scale(2).plus(Expr::constant(1)).upper_bound(), Some(32));
        assert_eq!(Expr::var(VAR_K).upper_bound(), None);
    }

    #[test]
    fn register_expressions_render_like_locations() {
        let k = Expr::bounded(VAR_K, 8);
        assert_eq!(RegisterExpr::for_slot(16, k.clone().rem(4)).to_string(), "floor((k % 4) / 2).[16 * (k % 2) + 15 : 16 * (k % 2)]");
        assert_eq!(RegisterExpr::for_slot(32, Expr::constant(0)).to_string(), "0");
        assert_eq!(RegisterExpr::for_slot(64, Expr::bounded(VAR_I, 4)).to_string(), "[2 * i + 1 : 2 * i]");
    }

    #[test]
    fn slot_of_register_per_width() {
        assert_eq!(slot_of_register(32, 4).to_string(), "GPR_num");
        assert_eq!(slot_of_register(64, 4).to_string(), "floor(GPR_num / 2)");
        assert_eq!(slot_of_register(8, 2).to_string(), "4 * GPR_num + floor(GPR_bits / 8)");
        assert_eq!(slot_of_register(16, 1).to_string(), "floor(GPR_bits / 16)");
    }

    #[test]
    fn lanes_join_with_and() {
        let i = Expr::bounded(VAR_I, 16);
        let eq = Equation::Lanes(vec![i.clone(), i.plus(Expr::constant(16))]);
        assert_eq!(eq.to_string(), "i and i + 16");
    }
}

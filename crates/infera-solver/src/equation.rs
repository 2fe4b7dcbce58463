//! Equations: monotone rules defining a key's value.
//!
//! An equation's right-hand side is a small tree of combinators over
//! constants and other keys. Every combinator is monotone over the flat
//! lattice order, which is what lets the solver iterate to a fixed point:
//! raising a dependency can never lower an expression's value.
//!
//! Shape checks happen here, once, at ingestion. Anything that survives
//! [`Expr::validate`] can be evaluated without further error paths, so the
//! solver itself has none.

use crate::key::KeyId;
use crate::lattice::Value;
use infera_common::limits::MAX_EXPR_DEPTH;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Right-hand side of an equation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Expr {
    /// A known lattice value.
    Const(Value),
    /// The current value of another key.
    Key(KeyId),
    /// Disjunction: any informative operand suffices; operands are joined.
    Join(Vec<Expr>),
    /// Conjunction: all operands must agree on one fact. An operand at
    /// `Top` poisons the whole conjunction; a `Bot` operand defers it.
    Meet(Vec<Expr>),
    /// Boolean polarity flip of the operand.
    Negate(Box<Expr>),
}

/// One rule: `lhs` is defined by `rhs`. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Equation {
    pub lhs: KeyId,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: KeyId, rhs: Expr) -> Equation {
        Equation { lhs, rhs }
    }
}

/// Why an equation was rejected at ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EquationError {
    /// A `Join`/`Meet` with no operands has no defined value.
    EmptyCombinator,
    /// `Bot` is a solver-internal placeholder, not a statable fact.
    BottomConstant,
    /// Expression nesting exceeded `MAX_EXPR_DEPTH`.
    TooDeep { depth: usize },
    /// A condition referred to a parameter the member does not have.
    ParamOutOfRange { index: u16, arity: u16 },
}

impl fmt::Display for EquationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquationError::EmptyCombinator => write!(f, "combinator with no operands"),
            EquationError::BottomConstant => write!(f, "constant Bot in equation body"),
            EquationError::TooDeep { depth } => {
                write!(f, "expression depth {depth} exceeds limit {MAX_EXPR_DEPTH}")
            }
            EquationError::ParamOutOfRange { index, arity } => {
                write!(f, "condition on parameter {index} of a member with arity {arity}")
            }
        }
    }
}

impl Expr {
    /// Check the shape of an expression without recursing into it.
    ///
    /// Runs before anything else touches the tree, so it must tolerate
    /// arbitrarily deep input; the walk keeps its own stack.
    pub fn validate(&self) -> Result<(), EquationError> {
        let mut stack: SmallVec<[(&Expr, usize); 8]> = SmallVec::new();
        stack.push((self, 1));

        while let Some((expr, depth)) = stack.pop() {
            if depth > MAX_EXPR_DEPTH {
                return Err(EquationError::TooDeep { depth });
            }
            match expr {
                Expr::Const(Value::Bot) => return Err(EquationError::BottomConstant),
                Expr::Const(_) | Expr::Key(_) => {}
                Expr::Join(operands) | Expr::Meet(operands) => {
                    if operands.is_empty() {
                        return Err(EquationError::EmptyCombinator);
                    }
                    for operand in operands {
                        stack.push((operand, depth + 1));
                    }
                }
                Expr::Negate(operand) => stack.push((operand, depth + 1)),
            }
        }
        Ok(())
    }

    /// Visit every key the expression depends on.
    pub fn for_each_key(&self, f: &mut impl FnMut(KeyId)) {
        let mut stack: SmallVec<[&Expr; 8]> = SmallVec::new();
        stack.push(self);

        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Const(_) => {}
                Expr::Key(id) => f(*id),
                Expr::Join(operands) | Expr::Meet(operands) => stack.extend(operands.iter()),
                Expr::Negate(operand) => stack.push(operand),
            }
        }
    }

    /// Evaluate against a snapshot of key values.
    ///
    /// Only called on validated expressions, so recursion depth is bounded
    /// by `MAX_EXPR_DEPTH`.
    pub fn evaluate(&self, lookup: &impl Fn(KeyId) -> Value) -> Value {
        match self {
            Expr::Const(v) => *v,
            Expr::Key(id) => lookup(*id),
            Expr::Join(operands) => {
                let mut acc = Value::Bot;
                for operand in operands {
                    acc = acc.join(operand.evaluate(lookup));
                    if acc == Value::Top {
                        break;
                    }
                }
                acc
            }
            Expr::Meet(operands) => conjoin(operands.iter().map(|e| e.evaluate(lookup))),
            Expr::Negate(operand) => operand.evaluate(lookup).negate(),
        }
    }
}

/// Conjunction over a whole operand list at once.
///
/// Order-independent by construction: `Top` anywhere wins, and so does a
/// disagreement between informative operands (no single fact can hold);
/// otherwise a `Bot` operand defers the conjunction; otherwise the common
/// fact is the result. Monotone in every operand.
pub(crate) fn conjoin(values: impl Iterator<Item = Value>) -> Value {
    let mut saw_bot = false;
    let mut acc: Option<Value> = None;

    for value in values {
        match value {
            Value::Top => return Value::Top,
            Value::Bot => saw_bot = true,
            v => match acc {
                None => acc = Some(v),
                Some(a) if a == v => {}
                Some(_) => return Value::Top,
            },
        }
    }

    if saw_bot {
        Value::Bot
    } else {
        // Empty conjunctions are rejected at validation.
        acc.unwrap_or(Value::Top)
    }
}

#[cfg(test)]
#[path = "equation_tests.rs"]
mod tests;

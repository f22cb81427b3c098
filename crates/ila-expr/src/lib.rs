//! Bit-vector expression algebra for instruction-level abstractions.
//!
//! Provides the sorts, fixed-width words, expression trees, concrete
//! evaluation, and the deterministic pretty printer shared by the model
//! builder and the synthesis engine.

pub mod eval;
pub mod expr;
pub mod pretty;
pub mod value;

pub use eval::{eval, Env};
pub use expr::{BinOp, Expr, UnaryOp, VarId};
pub use pretty::pretty_expr;
pub use value::{MemArray, Value, Word};

use thiserror::Error;

/// Expression construction or evaluation error.
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("sort mismatch: expected {expected}, found {found}")]
    SortMismatch { expected: Sort, found: Sort },

    #[error("operand sorts differ: {left} vs {right}")]
    OperandMismatch { left: Sort, right: Sort },

    #[error("invalid width {0} (must be 1..=64)")]
    InvalidWidth(u32),

    #[error("variable {0} is not bound in the environment")]
    UnboundVar(VarId),

    #[error("operator {op} is not defined on sort {operand}")]
    BadOperand { op: &'static str, operand: Sort },
}

pub type ExprResult<T> = Result<T, ExprError>;

/// Sort of an expression: boolean, fixed-width bit-vector, or flat memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Bool,
    Bv(u32),
    Mem { addr_width: u32, elem_width: u32 },
}

impl Sort {
    /// Validate width constraints (bit-vector widths are 1..=64).
    pub fn validate(self) -> ExprResult<Self> {
        match self {
            Sort::Bool => Ok(self),
            Sort::Bv(w) if (1..=64).contains(&w) => Ok(self),
            Sort::Bv(w) => Err(ExprError::InvalidWidth(w)),
            Sort::Mem {
                addr_width,
                elem_width,
            } => {
                if !(1..=64).contains(&addr_width) {
                    Err(ExprError::InvalidWidth(addr_width))
                } else if !(1..=64).contains(&elem_width) {
                    Err(ExprError::InvalidWidth(elem_width))
                } else {
                    Ok(self)
                }
            }
        }
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sort::Bool => write!(f, "bool"),
            Sort::Bv(w) => write!(f, "bv{w}"),
            Sort::Mem {
                addr_width,
                elem_width,
            } => write!(f, "mem[{addr_width}->{elem_width}]"),
        }
    }
}

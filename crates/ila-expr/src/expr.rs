//! Expression trees over declared variables.

use crate::{ExprError, ExprResult, Sort, Word};

/// Handle to a declared variable (input, register, or memory).
///
/// Handles are indices into the owning model's declaration table; they are
/// returned at declaration time and passed by value, so expressions never
/// resolve variables through name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Bitwise / logical
    And,
    Or,
    Xor,
    // Arithmetic (wrapping at width)
    Add,
    Sub,
    // Comparison
    Eq,
    Ne,
    Lt,
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// An expression over constants and declared variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Bit-vector literal.
    Const(Word),
    /// Declared variable (current value).
    Var(VarId),
    /// Unary operation.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Binary operation.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Memory read at an address.
    Select { mem: Box<Expr>, addr: Box<Expr> },
    /// Functional memory update at an address.
    Store {
        mem: Box<Expr>,
        addr: Box<Expr>,
        data: Box<Expr>,
    },
    /// Conditional.
    Ite {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

impl Expr {
    pub fn word(value: u64, width: u32) -> Expr {
        Expr::Const(Word::new(value, width))
    }

    pub fn var(id: VarId) -> Expr {
        Expr::Var(id)
    }

    fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Or, left, right)
    }

    pub fn xor(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Xor, left, right)
    }

    pub fn add(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Sub, left, right)
    }

    pub fn eq(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Eq, left, right)
    }

    pub fn ne(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Ne, left, right)
    }

    pub fn lt(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinOp::Lt, left, right)
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn neg(operand: Expr) -> Expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        }
    }

    pub fn select(mem: Expr, addr: Expr) -> Expr {
        Expr::Select {
            mem: Box::new(mem),
            addr: Box::new(addr),
        }
    }

    pub fn store(mem: Expr, addr: Expr, data: Expr) -> Expr {
        Expr::Store {
            mem: Box::new(mem),
            addr: Box::new(addr),
            data: Box::new(data),
        }
    }

    pub fn ite(cond: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
        Expr::Ite {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    /// Compute the sort of this expression against a declaration table.
    ///
    /// `var_sorts[id.0]` is the sort of the variable with that handle.
    pub fn sort(&self, var_sorts: &[Sort]) -> ExprResult<Sort> {
        match self {
            Expr::Const(w) => Ok(Sort::Bv(w.width())),
            Expr::Var(id) => var_sorts
                .get(id.0)
                .copied()
                .ok_or(ExprError::UnboundVar(*id)),
            Expr::Unary { op, operand } => {
                let inner = operand.sort(var_sorts)?;
                match (op, inner) {
                    (UnaryOp::Not, Sort::Bool) | (UnaryOp::Not, Sort::Bv(_)) => Ok(inner),
                    (UnaryOp::Neg, Sort::Bv(_)) => Ok(inner),
                    (UnaryOp::Not, _) => Err(ExprError::BadOperand {
                        op: "not",
                        operand: inner,
                    }),
                    (UnaryOp::Neg, _) => Err(ExprError::BadOperand {
                        op: "neg",
                        operand: inner,
                    }),
                }
            }
            Expr::Binary { op, left, right } => {
                let l = left.sort(var_sorts)?;
                let r = right.sort(var_sorts)?;
                if l != r {
                    return Err(ExprError::OperandMismatch { left: l, right: r });
                }
                match op {
                    BinOp::And | BinOp::Or | BinOp::Xor => match l {
                        Sort::Bool | Sort::Bv(_) => Ok(l),
                        Sort::Mem { .. } => Err(ExprError::BadOperand {
                            op: "bitwise",
                            operand: l,
                        }),
                    },
                    BinOp::Add | BinOp::Sub => match l {
                        Sort::Bv(_) => Ok(l),
                        _ => Err(ExprError::BadOperand {
                            op: "arith",
                            operand: l,
                        }),
                    },
                    BinOp::Eq | BinOp::Ne => match l {
                        Sort::Bool | Sort::Bv(_) => Ok(Sort::Bool),
                        Sort::Mem { .. } => Err(ExprError::BadOperand {
                            op: "compare",
                            operand: l,
                        }),
                    },
                    BinOp::Lt => match l {
                        Sort::Bv(_) => Ok(Sort::Bool),
                        _ => Err(ExprError::BadOperand {
                            op: "compare",
                            operand: l,
                        }),
                    },
                }
            }
            Expr::Select { mem, addr } => {
                let m = mem.sort(var_sorts)?;
                let a = addr.sort(var_sorts)?;
                match m {
                    Sort::Mem {
                        addr_width,
                        elem_width,
                    } => {
                        if a != Sort::Bv(addr_width) {
                            return Err(ExprError::SortMismatch {
                                expected: Sort::Bv(addr_width),
                                found: a,
                            });
                        }
                        Ok(Sort::Bv(elem_width))
                    }
                    _ => Err(ExprError::BadOperand {
                        op: "select",
                        operand: m,
                    }),
                }
            }
            Expr::Store { mem, addr, data } => {
                let m = mem.sort(var_sorts)?;
                let a = addr.sort(var_sorts)?;
                let d = data.sort(var_sorts)?;
                match m {
                    Sort::Mem {
                        addr_width,
                        elem_width,
                    } => {
                        if a != Sort::Bv(addr_width) {
                            return Err(ExprError::SortMismatch {
                                expected: Sort::Bv(addr_width),
                                found: a,
                            });
                        }
                        if d != Sort::Bv(elem_width) {
                            return Err(ExprError::SortMismatch {
                                expected: Sort::Bv(elem_width),
                                found: d,
                            });
                        }
                        Ok(m)
                    }
                    _ => Err(ExprError::BadOperand {
                        op: "store",
                        operand: m,
                    }),
                }
            }
            Expr::Ite {
                cond,
                then_branch,
                else_branch,
            } => {
                let c = cond.sort(var_sorts)?;
                if c != Sort::Bool {
                    return Err(ExprError::SortMismatch {
                        expected: Sort::Bool,
                        found: c,
                    });
                }
                let t = then_branch.sort(var_sorts)?;
                let e = else_branch.sort(var_sorts)?;
                if t != e {
                    return Err(ExprError::OperandMismatch { left: t, right: e });
                }
                Ok(t)
            }
        }
    }
}

//! Concrete evaluation of expressions under a variable environment.

use crate::expr::{BinOp, Expr, UnaryOp};
use crate::value::{Value, Word};
use crate::{ExprError, ExprResult, Sort};

/// Concrete variable environment, indexed by `VarId`.
pub type Env = Vec<Value>;

/// Evaluate an expression under an environment binding every variable.
pub fn eval(expr: &Expr, env: &Env) -> ExprResult<Value> {
    match expr {
        Expr::Const(w) => Ok(Value::Word(*w)),
        Expr::Var(id) => env.get(id.0).cloned().ok_or(ExprError::UnboundVar(*id)),
        Expr::Unary { op, operand } => {
            let v = eval(operand, env)?;
            match (op, v) {
                (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                (UnaryOp::Not, Value::Word(w)) => Ok(Value::Word(w.not())),
                (UnaryOp::Neg, Value::Word(w)) => Ok(Value::Word(w.neg())),
                (_, v) => Err(ExprError::BadOperand {
                    op: "unary",
                    operand: v.sort(),
                }),
            }
        }
        Expr::Binary { op, left, right } => {
            let l = eval(left, env)?;
            let r = eval(right, env)?;
            eval_binary(*op, l, r)
        }
        Expr::Select { mem, addr } => {
            let m = expect_mem(eval(mem, env)?)?;
            let a = expect_word(eval(addr, env)?)?;
            Ok(Value::Word(m.read(a.value())))
        }
        Expr::Store { mem, addr, data } => {
            let m = expect_mem(eval(mem, env)?)?;
            let a = expect_word(eval(addr, env)?)?;
            let d = expect_word(eval(data, env)?)?;
            Ok(Value::Mem(m.write(a.value(), d.value())))
        }
        Expr::Ite {
            cond,
            then_branch,
            else_branch,
        } => {
            let c = eval(cond, env)?;
            match c {
                Value::Bool(true) => eval(then_branch, env),
                Value::Bool(false) => eval(else_branch, env),
                other => Err(ExprError::SortMismatch {
                    expected: Sort::Bool,
                    found: other.sort(),
                }),
            }
        }
    }
}

fn eval_binary(op: BinOp, l: Value, r: Value) -> ExprResult<Value> {
    match op {
        BinOp::And | BinOp::Or | BinOp::Xor => match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
                BinOp::And => a && b,
                BinOp::Or => a || b,
                _ => a ^ b,
            })),
            (Value::Word(a), Value::Word(b)) => {
                let (a, b) = check_widths(a, b)?;
                Ok(Value::Word(match op {
                    BinOp::And => a.and(b),
                    BinOp::Or => a.or(b),
                    _ => a.xor(b),
                }))
            }
            (l, r) => Err(ExprError::OperandMismatch {
                left: l.sort(),
                right: r.sort(),
            }),
        },
        BinOp::Add | BinOp::Sub => {
            let a = expect_word(l)?;
            let b = expect_word(r)?;
            let (a, b) = check_widths(a, b)?;
            Ok(Value::Word(match op {
                BinOp::Add => a.wrapping_add(b),
                _ => a.wrapping_sub(b),
            }))
        }
        BinOp::Eq | BinOp::Ne => {
            let equal = match (&l, &r) {
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Word(a), Value::Word(b)) => {
                    let (a, b) = check_widths(*a, *b)?;
                    a == b
                }
                _ => {
                    return Err(ExprError::OperandMismatch {
                        left: l.sort(),
                        right: r.sort(),
                    })
                }
            };
            Ok(Value::Bool(if op == BinOp::Eq { equal } else { !equal }))
        }
        BinOp::Lt => {
            let a = expect_word(l)?;
            let b = expect_word(r)?;
            let (a, b) = check_widths(a, b)?;
            Ok(Value::Bool(a.value() < b.value()))
        }
    }
}

fn check_widths(a: Word, b: Word) -> ExprResult<(Word, Word)> {
    if a.width() == b.width() {
        Ok((a, b))
    } else {
        Err(ExprError::OperandMismatch {
            left: Sort::Bv(a.width()),
            right: Sort::Bv(b.width()),
        })
    }
}

fn expect_word(v: Value) -> ExprResult<Word> {
    v.as_word().ok_or(ExprError::SortMismatch {
        expected: Sort::Bv(0),
        found: v.sort(),
    })
}

fn expect_mem(v: Value) -> ExprResult<crate::MemArray> {
    match v {
        Value::Mem(m) => Ok(m),
        other => Err(ExprError::BadOperand {
            op: "memory",
            operand: other.sort(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::VarId;
    use crate::MemArray;

    fn env8(vals: &[u64]) -> Env {
        vals.iter().map(|v| Value::word(*v, 8)).collect()
    }

    #[test]
    fn eval_arith_and_compare() {
        let env = env8(&[0xfe]);
        let inc = Expr::add(Expr::var(VarId(0)), Expr::word(1, 8));
        assert_eq!(eval(&inc, &env).unwrap(), Value::word(0xff, 8));

        let cmp = Expr::eq(Expr::var(VarId(0)), Expr::word(0xfe, 8));
        assert_eq!(eval(&cmp, &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn eval_ite_selects_branch() {
        let env = env8(&[0x05]);
        let e = Expr::ite(
            Expr::eq(Expr::var(VarId(0)), Expr::word(5, 8)),
            Expr::word(1, 8),
            Expr::word(2, 8),
        );
        assert_eq!(eval(&e, &env).unwrap(), Value::word(1, 8));
    }

    #[test]
    fn eval_store_then_select() {
        let env: Env = vec![
            Value::Mem(MemArray::filled(8, 8, 0)),
            Value::word(0x20, 8),
            Value::word(0x7f, 8),
        ];
        let stored = Expr::store(
            Expr::var(VarId(0)),
            Expr::var(VarId(1)),
            Expr::var(VarId(2)),
        );
        let read = Expr::select(stored, Expr::var(VarId(1)));
        assert_eq!(eval(&read, &env).unwrap(), Value::word(0x7f, 8));
    }

    #[test]
    fn eval_bitwise_and_unary() {
        let env = env8(&[0b1010_0101]);
        let x = || Expr::var(VarId(0));

        let xored = Expr::xor(x(), Expr::word(0xff, 8));
        assert_eq!(eval(&xored, &env).unwrap(), Value::word(0b0101_1010, 8));
        assert_eq!(eval(&Expr::not(x()), &env).unwrap(), Value::word(0b0101_1010, 8));
        assert_eq!(eval(&Expr::neg(x()), &env).unwrap(), Value::word(0x5b, 8));

        let lt = Expr::lt(x(), Expr::word(0xff, 8));
        assert_eq!(eval(&lt, &env).unwrap(), Value::Bool(true));
        let ne = Expr::ne(x(), Expr::word(0xa5, 8));
        assert_eq!(eval(&ne, &env).unwrap(), Value::Bool(false));
    }

    #[test]
    fn width_mismatch_is_an_error() {
        let env: Env = vec![Value::word(1, 8), Value::word(1, 4)];
        let e = Expr::add(Expr::var(VarId(0)), Expr::var(VarId(1)));
        assert!(eval(&e, &env).is_err());
    }
}

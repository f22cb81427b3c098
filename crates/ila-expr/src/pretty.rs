//! Deterministic pretty printer for expression trees.
//!
//! Output is an s-expression form with hex literals, stable across runs for
//! structurally equal expressions. Exported `.ast` artifacts use this form.

use crate::expr::{BinOp, Expr, UnaryOp};

/// Pretty print an expression to a string.
///
/// `names[id.0]` is the display name of the variable with that handle.
pub fn pretty_expr(expr: &Expr, names: &[String]) -> String {
    let mut printer = PrettyPrinter {
        output: String::new(),
        indent: 0,
        names,
    };
    printer.print_expr(expr);
    printer.output
}

struct PrettyPrinter<'a> {
    output: String,
    indent: usize,
    names: &'a [String],
}

impl PrettyPrinter<'_> {
    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn newline_indent(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn var_name(&self, idx: usize) -> String {
        self.names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("v{idx}"))
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Const(w) => self.write(&w.to_string()),
            Expr::Var(id) => {
                let name = self.var_name(id.0);
                self.write(&name);
            }
            Expr::Unary { op, operand } => {
                self.write("(");
                self.write(match op {
                    UnaryOp::Not => "not",
                    UnaryOp::Neg => "neg",
                });
                self.write(" ");
                self.print_expr(operand);
                self.write(")");
            }
            Expr::Binary { op, left, right } => {
                self.write("(");
                self.write(binop_symbol(*op));
                self.write(" ");
                self.print_expr(left);
                self.write(" ");
                self.print_expr(right);
                self.write(")");
            }
            Expr::Select { mem, addr } => {
                self.write("(select ");
                self.print_expr(mem);
                self.write(" ");
                self.print_expr(addr);
                self.write(")");
            }
            Expr::Store { mem, addr, data } => {
                self.write("(store ");
                self.print_expr(mem);
                self.write(" ");
                self.print_expr(addr);
                self.write(" ");
                self.print_expr(data);
                self.write(")");
            }
            Expr::Ite {
                cond,
                then_branch,
                else_branch,
            } => {
                self.write("(ite ");
                self.print_expr(cond);
                self.indent += 1;
                self.newline_indent();
                self.print_expr(then_branch);
                self.newline_indent();
                self.print_expr(else_branch);
                self.indent -= 1;
                self.write(")");
            }
        }
    }
}

fn binop_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::And => "&",
        BinOp::Or => "|",
        BinOp::Xor => "^",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Eq => "=",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::VarId;

    #[test]
    fn prints_flat_expressions_inline() {
        let names = vec!["cmd".to_string(), "fifo_state".to_string()];
        let e = Expr::and(
            Expr::eq(Expr::var(VarId(0)), Expr::word(2, 3)),
            Expr::eq(Expr::var(VarId(1)), Expr::word(1, 8)),
        );
        assert_eq!(pretty_expr(&e, &names), "(& (= cmd #x2) (= fifo_state #x01))");
    }

    #[test]
    fn ite_branches_are_indented() {
        let names = vec!["go".to_string(), "x".to_string()];
        let e = Expr::ite(
            Expr::var(VarId(0)),
            Expr::word(0, 8),
            Expr::add(Expr::var(VarId(1)), Expr::word(1, 8)),
        );
        assert_eq!(pretty_expr(&e, &names), "(ite go\n  #x00\n  (+ x #x01))");
    }
}

//! Decode predicate generation.
//!
//! The decode space is the Cartesian product of (address, command code,
//! control state), one conjunctive predicate per triple, followed by one
//! predicate per special command-data value written to the status address.
//! Predicates may overlap; position in the list is their priority — the
//! synthesis engine gives later predicates precedence, so the special
//! command-value predicates appended at the end override the general
//! status-write triples they intersect.

use crate::{Model, ModelResult};
use ila_expr::{Expr, Sort, VarId};

/// The inputs and state the decode predicates range over.
#[derive(Debug, Clone, Copy)]
pub struct DecodeSpace {
    /// Command address input.
    pub addr: VarId,
    /// Command opcode input.
    pub cmd: VarId,
    /// Command data input.
    pub data: VarId,
    /// Control state register.
    pub state: VarId,
}

/// Generate the ordered decode predicate list.
///
/// Output length is exactly
/// `addresses.len() * commands.len() * states.len() + specials.len()`.
/// Each special value `v` yields `(addr == special_addr) & (cmd ==
/// special_cmd) & (data == v)`. Empty input sets yield a degenerate list;
/// the synthesis engine reports insufficient coverage later rather than
/// failing here.
pub fn decode_predicates(
    model: &Model,
    space: &DecodeSpace,
    addresses: &[u64],
    commands: &[u64],
    states: &[u64],
    special_addr: u64,
    special_cmd: u64,
    specials: &[u64],
) -> ModelResult<Vec<Expr>> {
    let addr_w = bv_width(model, space.addr)?;
    let cmd_w = bv_width(model, space.cmd)?;
    let data_w = bv_width(model, space.data)?;
    let state_w = bv_width(model, space.state)?;

    let mut predicates = Vec::with_capacity(addresses.len() * commands.len() * states.len());
    for &a in addresses {
        for &c in commands {
            for &s in states {
                predicates.push(Expr::and(
                    Expr::and(
                        Expr::eq(Expr::var(space.addr), Expr::word(a, addr_w)),
                        Expr::eq(Expr::var(space.cmd), Expr::word(c, cmd_w)),
                    ),
                    Expr::eq(Expr::var(space.state), Expr::word(s, state_w)),
                ));
            }
        }
    }
    for &v in specials {
        predicates.push(Expr::and(
            Expr::and(
                Expr::eq(Expr::var(space.addr), Expr::word(special_addr, addr_w)),
                Expr::eq(Expr::var(space.cmd), Expr::word(special_cmd, cmd_w)),
            ),
            Expr::eq(Expr::var(space.data), Expr::word(v, data_w)),
        ));
    }
    Ok(predicates)
}

fn bv_width(model: &Model, id: VarId) -> ModelResult<u32> {
    match model.decl(id)?.sort {
        Sort::Bv(w) => Ok(w),
        other => Err(crate::ModelError::Expr(ila_expr::ExprError::BadOperand {
            op: "decode",
            operand: other,
        })),
    }
}

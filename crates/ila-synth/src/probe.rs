//! Concrete probe sampling for decode regions.
//!
//! A probe is a full assignment to every declared variable. Equality atoms
//! in the region's predicate force input/register values; everything else is
//! drawn from a deterministic RNG. A probe counts for region `i` only if it
//! satisfies predicate `i` and no later predicate, giving later predicates
//! precedence where the decode space overlaps.

use ila_expr::{eval, Env, Expr, Sort, Value, VarId};
use ila_model::Model;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{SynthConfig, SynthResult};

/// Stable 64-bit FNV-1a, used to derive per-element seeds from names.
pub(crate) fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Sample the probe set for decode region `pred_idx`.
///
/// Returns `None` when no satisfying probe is found within the resampling
/// budget — the region is unreachable (e.g. a contradictory predicate) and
/// contributes no arm.
pub(crate) fn sample_region(
    model: &Model,
    decode: &[Expr],
    pred_idx: usize,
    element_seed: u64,
    config: &SynthConfig,
) -> SynthResult<Option<Vec<Env>>> {
    let mut rng = StdRng::seed_from_u64(element_seed ^ (pred_idx as u64).wrapping_mul(0x9e37_79b9));
    let forced = forced_assignments(&decode[pred_idx]);

    let mut probes = Vec::with_capacity(config.probes_per_case);
    let mut attempts = 0usize;
    while probes.len() < config.probes_per_case {
        if attempts >= config.probes_per_case + config.max_resample {
            break;
        }
        attempts += 1;

        let mut env = random_env(model, &mut rng);
        for &(id, value) in &forced {
            if let Sort::Bv(w) = model.sorts()[id.0] {
                env[id.0] = Value::word(value, w);
            }
        }

        // Non-equality atoms (and contradictory conjunctions like
        // x == a & x == b) can leave the predicate unsatisfied by a draw;
        // resample until the attempt budget runs out.
        if eval(&decode[pred_idx], &env)? != Value::Bool(true) {
            continue;
        }
        // Reject probes claimed by a higher-priority (later) predicate.
        let mut shadowed = false;
        for later in &decode[pred_idx + 1..] {
            if eval(later, &env)? == Value::Bool(true) {
                shadowed = true;
                break;
            }
        }
        if !shadowed {
            probes.push(env);
        }
    }

    if probes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(probes))
    }
}

/// Extract `var == const` atoms from a conjunction.
fn forced_assignments(pred: &Expr) -> Vec<(VarId, u64)> {
    let mut out = Vec::new();
    collect_forced(pred, &mut out);
    out
}

fn collect_forced(pred: &Expr, out: &mut Vec<(VarId, u64)>) {
    if let Expr::Binary { op, left, right } = pred {
        match op {
            ila_expr::BinOp::And => {
                collect_forced(left, out);
                collect_forced(right, out);
            }
            ila_expr::BinOp::Eq => match (left.as_ref(), right.as_ref()) {
                (Expr::Var(id), Expr::Const(w)) | (Expr::Const(w), Expr::Var(id)) => {
                    out.push((*id, w.value()));
                }
                _ => {}
            },
            _ => {}
        }
    }
}

/// A full random assignment to every declared variable.
fn random_env(model: &Model, rng: &mut StdRng) -> Env {
    model
        .sorts()
        .iter()
        .map(|sort| match *sort {
            Sort::Bool => Value::Bool(rng.gen()),
            Sort::Bv(w) => Value::word(rng.gen::<u64>(), w),
            Sort::Mem {
                addr_width,
                elem_width,
            } => {
                let mut mem = ila_expr::MemArray::filled(addr_width, elem_width, rng.gen::<u64>());
                for _ in 0..4 {
                    mem = mem.write(rng.gen::<u64>(), rng.gen::<u64>());
                }
                Value::Mem(mem)
            }
        })
        .collect()
}

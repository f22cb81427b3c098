//! Candidate elimination against the oracle.

use ila_expr::{eval, Expr, VarId};
use ila_model::Model;
use tracing::{debug, trace};

use crate::probe::{fnv1a, sample_region};
use crate::{Oracle, Resolved, SynthConfig, SynthError, SynthResult};

/// Synthesize the transition function for one state element.
///
/// Iterative oracle-guided refinement: per decode region, probe concrete
/// assignments and eliminate every candidate whose evaluation disagrees with
/// the oracle's next value on any probe. A candidate surviving every region
/// is the global answer; otherwise the regional survivors are combined into
/// a case-split with the most common pick as default.
pub fn synthesize(
    model: &Model,
    element: VarId,
    candidates: &[Expr],
    decode: &[Expr],
    oracle: &dyn Oracle,
    config: &SynthConfig,
) -> SynthResult<Resolved> {
    let name = model
        .decl(element)
        .map_err(|_| SynthError::Expr(ila_expr::ExprError::UnboundVar(element)))?
        .name
        .clone();
    let element_seed = config.seed ^ fnv1a(name.as_bytes());

    if decode.is_empty() {
        return Err(SynthError::InsufficientDecodeCoverage { element: name });
    }

    // Per-region pick: lowest-index candidate consistent with every probe.
    let mut picks: Vec<Option<usize>> = Vec::with_capacity(decode.len());
    // Candidates consistent with every probed region.
    let mut global: Vec<bool> = vec![true; candidates.len()];
    let mut probed_regions = 0usize;

    for pred_idx in 0..decode.len() {
        let Some(probes) = sample_region(model, decode, pred_idx, element_seed, config)? else {
            trace!(element = %name, predicate = pred_idx, "decode region unreachable, skipped");
            picks.push(None);
            continue;
        };
        probed_regions += 1;

        let mut alive: Vec<bool> = vec![true; candidates.len()];
        for env in &probes {
            let truth = oracle.next_value(element, env)?;
            for (idx, cand) in candidates.iter().enumerate() {
                if alive[idx] && eval(cand, env)? != truth {
                    alive[idx] = false;
                    global[idx] = false;
                }
            }
        }

        let Some(pick) = alive.iter().position(|&a| a) else {
            debug!(element = %name, predicate = pred_idx, "all candidates eliminated");
            return Err(SynthError::Exhausted {
                element: name,
                predicate: pred_idx,
            });
        };
        picks.push(Some(pick));
    }

    if probed_regions == 0 {
        return Err(SynthError::InsufficientDecodeCoverage { element: name });
    }

    if let Some(single) = global.iter().position(|&g| g) {
        debug!(element = %name, candidate = single, "single candidate survives all regions");
        return Ok(Resolved::Single(single));
    }

    // Case-split: default is the most frequent regional pick (ties toward
    // the lowest candidate index), arms cover the regions that differ.
    let mut counts = vec![0usize; candidates.len()];
    for pick in picks.iter().flatten() {
        counts[*pick] += 1;
    }
    let default = counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let arms: Vec<(usize, usize)> = picks
        .iter()
        .enumerate()
        .filter_map(|(pred_idx, pick)| match pick {
            Some(cand_idx) if *cand_idx != default => Some((pred_idx, *cand_idx)),
            _ => None,
        })
        .collect();
    debug!(element = %name, default, arms = arms.len(), "case-split result");
    Ok(Resolved::CaseSplit { arms, default })
}

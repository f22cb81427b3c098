//! Oracle-guided synthesis of next-state transition functions.
//!
//! For each state element the engine eliminates candidate expressions that
//! disagree with the reference simulator on probed assignments, case-splits
//! over the model's decode predicates when no single candidate matches
//! globally, and lowers the result to an expression tree for export.

pub mod driver;
pub mod engine;
pub mod export;
mod probe;

pub use driver::{synthesize_all, ElementOutcome, ReportEntry, SynthReport};
pub use engine::synthesize;
pub use export::export;

use ila_expr::{Env, Expr, ExprError, Value, VarId};
use std::path::PathBuf;
use thiserror::Error;

/// Ground-truth oracle: the cycle-accurate reference simulator.
pub trait Oracle {
    /// Next value of `target` given the current concrete context.
    fn next_value(&self, target: VarId, ctx: &Env) -> Result<Value, OracleError>;
}

/// Oracle evaluation failure. Aborts synthesis for the current element only.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle does not model element '{name}'")]
    UnknownElement { name: String },

    #[error("context is missing a binding for '{name}'")]
    MissingBinding { name: String },

    #[error("context binding for '{name}' has the wrong sort")]
    BadBinding { name: String },
}

/// Per-element synthesis failure.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error("no candidate for '{element}' matches the oracle under decode predicate {predicate}")]
    Exhausted { element: String, predicate: usize },

    #[error("decode predicates constrain no probe for '{element}'")]
    InsufficientDecodeCoverage { element: String },

    #[error("no candidate set declared for '{element}'")]
    MissingCandidates { element: String },

    #[error("failed to write {path}: {source}")]
    ExportIo {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type SynthResult<T> = Result<T, SynthError>;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Base seed for probe sampling. Per-element seeds derive from this and
    /// the element's name only, so results are reproducible and independent
    /// of the other elements.
    pub seed: u64,
    /// Concrete probes drawn per decode predicate region.
    pub probes_per_case: usize,
    /// Resampling attempts before a decode region is deemed unreachable.
    pub max_resample: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            seed: 0xf1f0_0001,
            probes_per_case: 24,
            max_resample: 64,
        }
    }
}

/// A resolved transition function: indices into the element's candidate set,
/// optionally case-split over decode predicate indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// One candidate matches the oracle under every probed decode region.
    Single(usize),
    /// Per-region assignment of candidates.
    CaseSplit {
        /// `(decode predicate index, candidate index)`, ascending by
        /// predicate index, only for regions that differ from the default.
        arms: Vec<(usize, usize)>,
        /// Candidate index for every region without an arm.
        default: usize,
    },
}

impl Resolved {
    /// Lower to an expression tree: an if-chain over decode predicates.
    ///
    /// Arms are tested in reverse declaration order so that later (higher
    /// priority) predicates win where predicates overlap.
    pub fn lower(&self, candidates: &[Expr], decode: &[Expr]) -> Expr {
        match self {
            Resolved::Single(idx) => candidates[*idx].clone(),
            Resolved::CaseSplit { arms, default } => {
                let mut expr = candidates[*default].clone();
                for (pred_idx, cand_idx) in arms {
                    expr = Expr::ite(
                        decode[*pred_idx].clone(),
                        candidates[*cand_idx].clone(),
                        expr,
                    );
                }
                expr
            }
        }
    }
}

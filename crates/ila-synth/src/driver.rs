//! Synthesis driver: every state element in declaration order.

use std::path::{Path, PathBuf};

use ila_expr::Expr;
use ila_model::Model;
use tracing::{info, warn};

use crate::{engine, export, Oracle, Resolved, SynthConfig, SynthError};

/// Per-run report: one entry per state element, in declaration order.
#[derive(Debug)]
pub struct SynthReport {
    pub entries: Vec<ReportEntry>,
}

impl SynthReport {
    /// True when every element synthesized and exported.
    pub fn all_ok(&self) -> bool {
        self.entries
            .iter()
            .all(|e| matches!(e.outcome, ElementOutcome::Exported { .. }))
    }

    pub fn entry(&self, element: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.element == element)
    }
}

#[derive(Debug)]
pub struct ReportEntry {
    pub element: String,
    pub outcome: ElementOutcome,
}

#[derive(Debug)]
pub enum ElementOutcome {
    Exported {
        path: PathBuf,
        resolved: Resolved,
        ast: Expr,
    },
    Failed {
        error: SynthError,
    },
}

/// Synthesize every declared state element against the oracle and export
/// each resolved AST to `<out_dir>/<element>.ast`.
///
/// Elements are independent: a per-element failure (oracle error, exhausted
/// candidate set) is recorded and the run continues. No artifact is written
/// for a failed element.
pub fn synthesize_all(
    model: &Model,
    oracle: &dyn Oracle,
    config: &SynthConfig,
    out_dir: &Path,
) -> SynthReport {
    let mut entries = Vec::new();
    for decl in model.state_elements() {
        let outcome =
            synthesize_element(model, decl.id, decl.name.as_str(), oracle, config, out_dir);
        match &outcome {
            ElementOutcome::Exported { path, .. } => {
                info!(element = %decl.name, path = %path.display(), "synthesized");
            }
            ElementOutcome::Failed { error } => {
                warn!(element = %decl.name, %error, "synthesis failed");
            }
        }
        entries.push(ReportEntry {
            element: decl.name.clone(),
            outcome,
        });
    }
    SynthReport { entries }
}

fn synthesize_element(
    model: &Model,
    id: ila_expr::VarId,
    name: &str,
    oracle: &dyn Oracle,
    config: &SynthConfig,
    out_dir: &Path,
) -> ElementOutcome {
    let Some(candidates) = model.candidates(id) else {
        return ElementOutcome::Failed {
            error: SynthError::MissingCandidates {
                element: name.to_string(),
            },
        };
    };
    match engine::synthesize(model, id, candidates, model.decode(), oracle, config) {
        Ok(resolved) => {
            let ast = resolved.lower(candidates, model.decode());
            match export::export(model, name, &ast, out_dir) {
                Ok(path) => ElementOutcome::Exported {
                    path,
                    resolved,
                    ast,
                },
                Err(error) => ElementOutcome::Failed { error },
            }
        }
        Err(error) => ElementOutcome::Failed { error },
    }
}

//! Persistence of resolved transition ASTs, one file per state element.

use std::fs;
use std::path::{Path, PathBuf};

use ila_expr::{pretty_expr, Expr};
use ila_model::Model;

use crate::{SynthError, SynthResult};

/// Write the resolved expression tree for `element_name` to
/// `<out_dir>/<element_name>.ast`, overwriting any previous artifact.
///
/// The printed form is deterministic, so re-running an unchanged model
/// against an unchanged oracle reproduces the file byte for byte.
pub fn export(
    model: &Model,
    element_name: &str,
    ast: &Expr,
    out_dir: &Path,
) -> SynthResult<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|source| SynthError::ExportIo {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(format!("{element_name}.ast"));
    let mut text = pretty_expr(ast, &model.var_names());
    text.push('\n');
    fs::write(&path, text).map_err(|source| SynthError::ExportIo {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

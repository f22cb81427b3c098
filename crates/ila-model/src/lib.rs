//! The Abstraction: a symbolic model of a peripheral's observable state.
//!
//! A model declares inputs, named constants, and state elements (scalar
//! registers and flat memories). Each state element carries an ordered
//! candidate set of next-value expressions; the synthesis engine later picks
//! the one consistent with the reference simulator. Declarations return
//! `VarId` handles that all later references pass by value.

pub mod decode;

pub use decode::{decode_predicates, DecodeSpace};

use ila_expr::{Expr, ExprError, Sort, VarId, Word};
use thiserror::Error;

/// Model construction error. Fatal for the whole run: a malformed model
/// cannot be partially synthesized meaningfully.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate declaration: {name}")]
    DuplicateDeclaration { name: String },

    #[error("unknown element handle {0}")]
    UnknownElement(VarId),

    #[error("'{name}' is an input, not a state element")]
    NotAStateElement { name: String },

    #[error("empty candidate set for '{name}'")]
    EmptyCandidates { name: String },

    #[error("candidate {index} for '{name}' has sort {found}, element is {expected}")]
    CandidateSortMismatch {
        name: String,
        index: usize,
        expected: Sort,
        found: Sort,
    },

    #[error("decode predicate {index} has sort {found}, expected bool")]
    DecodeSortMismatch { index: usize, found: Sort },

    #[error(transparent)]
    Expr(#[from] ExprError),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Role of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRole {
    /// Externally supplied every step; never synthesized.
    Input,
    /// Scalar state element.
    Register,
    /// Flat memory state element.
    Memory,
}

/// A declared variable.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub id: VarId,
    pub sort: Sort,
    pub role: VarRole,
}

impl VarDecl {
    pub fn is_state_element(&self) -> bool {
        matches!(self.role, VarRole::Register | VarRole::Memory)
    }
}

/// A named constant (address map entries, status flags, command codes).
#[derive(Debug, Clone)]
pub struct ConstDecl {
    pub name: String,
    pub word: Word,
}

/// The symbolic hardware model.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    vars: Vec<VarDecl>,
    sorts: Vec<Sort>,
    consts: Vec<ConstDecl>,
    /// Candidate sets, parallel to `vars`. `None` for inputs and for state
    /// elements whose next binding has not been declared yet.
    candidates: Vec<Option<Vec<Expr>>>,
    decode: Vec<Expr>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Model {
        Model {
            name: name.into(),
            vars: Vec::new(),
            sorts: Vec::new(),
            consts: Vec::new(),
            candidates: Vec::new(),
            decode: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn declare(&mut self, name: &str, sort: Sort, role: VarRole) -> ModelResult<VarId> {
        sort.validate()?;
        if self.vars.iter().any(|v| v.name == name) {
            return Err(ModelError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        let id = VarId(self.vars.len());
        self.vars.push(VarDecl {
            name: name.to_string(),
            id,
            sort,
            role,
        });
        self.sorts.push(sort);
        self.candidates.push(None);
        Ok(id)
    }

    /// Declare an input with the given bit-width.
    pub fn input(&mut self, name: &str, width: u32) -> ModelResult<VarId> {
        self.declare(name, Sort::Bv(width), VarRole::Input)
    }

    /// Declare a scalar register state element.
    pub fn register(&mut self, name: &str, width: u32) -> ModelResult<VarId> {
        self.declare(name, Sort::Bv(width), VarRole::Register)
    }

    /// Declare a flat memory state element.
    pub fn memory(&mut self, name: &str, addr_width: u32, elem_width: u32) -> ModelResult<VarId> {
        self.declare(
            name,
            Sort::Mem {
                addr_width,
                elem_width,
            },
            VarRole::Memory,
        )
    }

    /// Declare a named constant and return it as an expression.
    pub fn named_constant(&mut self, name: &str, value: u64, width: u32) -> ModelResult<Expr> {
        Sort::Bv(width).validate()?;
        if self.consts.iter().any(|c| c.name == name) {
            return Err(ModelError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        let word = Word::new(value, width);
        self.consts.push(ConstDecl {
            name: name.to_string(),
            word,
        });
        Ok(Expr::Const(word))
    }

    /// Bind the ordered candidate set for a state element's next value.
    ///
    /// Every candidate must sort-check to the element's declared sort.
    pub fn set_candidates(&mut self, id: VarId, candidates: Vec<Expr>) -> ModelResult<()> {
        let decl = self
            .vars
            .get(id.0)
            .ok_or(ModelError::UnknownElement(id))?
            .clone();
        if !decl.is_state_element() {
            return Err(ModelError::NotAStateElement { name: decl.name });
        }
        if candidates.is_empty() {
            return Err(ModelError::EmptyCandidates { name: decl.name });
        }
        for (index, cand) in candidates.iter().enumerate() {
            let found = cand.sort(&self.sorts)?;
            if found != decl.sort {
                return Err(ModelError::CandidateSortMismatch {
                    name: decl.name,
                    index,
                    expected: decl.sort,
                    found,
                });
            }
        }
        self.candidates[id.0] = Some(candidates);
        Ok(())
    }

    /// Attach the decode predicate list. Each predicate must be boolean.
    pub fn set_decode(&mut self, predicates: Vec<Expr>) -> ModelResult<()> {
        for (index, pred) in predicates.iter().enumerate() {
            let found = pred.sort(&self.sorts)?;
            if found != Sort::Bool {
                return Err(ModelError::DecodeSortMismatch { index, found });
            }
        }
        self.decode = predicates;
        Ok(())
    }

    pub fn vars(&self) -> &[VarDecl] {
        &self.vars
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn consts(&self) -> &[ConstDecl] {
        &self.consts
    }

    pub fn decl(&self, id: VarId) -> ModelResult<&VarDecl> {
        self.vars.get(id.0).ok_or(ModelError::UnknownElement(id))
    }

    /// Candidate set for a state element, if one has been bound.
    pub fn candidates(&self, id: VarId) -> Option<&[Expr]> {
        self.candidates.get(id.0)?.as_deref()
    }

    pub fn decode(&self) -> &[Expr] {
        &self.decode
    }

    /// State elements (registers and memories) in declaration order.
    pub fn state_elements(&self) -> impl Iterator<Item = &VarDecl> {
        self.vars.iter().filter(|v| v.is_state_element())
    }

    /// Display names for the pretty printer, indexed by `VarId`.
    pub fn var_names(&self) -> Vec<String> {
        self.vars.iter().map(|v| v.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut m = Model::new("dup");
        m.input("cmd", 3).unwrap();
        let err = m.register("cmd", 8).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn candidates_require_a_state_element() {
        let mut m = Model::new("t");
        let inp = m.input("cmd", 3).unwrap();
        let err = m.set_candidates(inp, vec![Expr::word(0, 3)]).unwrap_err();
        assert!(matches!(err, ModelError::NotAStateElement { .. }));

        let err = m.set_candidates(VarId(99), vec![]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownElement(_)));
    }

    #[test]
    fn candidates_must_match_element_sort() {
        let mut m = Model::new("t");
        let r = m.register("r", 8).unwrap();
        let err = m.set_candidates(r, vec![Expr::word(0, 4)]).unwrap_err();
        assert!(matches!(err, ModelError::CandidateSortMismatch { .. }));

        m.set_candidates(r, vec![Expr::var(r), Expr::word(0, 8)])
            .unwrap();
        assert_eq!(m.candidates(r).unwrap().len(), 2);
    }

    #[test]
    fn empty_candidate_set_is_rejected() {
        let mut m = Model::new("t");
        let r = m.register("r", 8).unwrap();
        assert!(matches!(
            m.set_candidates(r, vec![]),
            Err(ModelError::EmptyCandidates { .. })
        ));
    }

    #[test]
    fn decode_predicates_must_be_boolean() {
        let mut m = Model::new("t");
        let r = m.register("r", 8).unwrap();
        let err = m.set_decode(vec![Expr::var(r)]).unwrap_err();
        assert!(matches!(err, ModelError::DecodeSortMismatch { .. }));
    }

    #[test]
    fn zero_width_declarations_are_rejected() {
        let mut m = Model::new("t");
        assert!(m.register("r", 0).is_err());
        assert!(m.memory("m", 8, 65).is_err());
    }
}

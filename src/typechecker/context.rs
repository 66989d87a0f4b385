//! Inference context wrapper holding the current lexical `Scope` during
//! type checking. Cloned frequently (cheap) to snapshot scope state when
//! constructing nested AST nodes; equality is intentionally degenerate
//! (always true) because context identity is not semantically relevant
//! to type equality comparisons.
use std::{cell::RefCell, rc::Rc};

use super::scope::Scope;
use super::trait_store::TraitStore;

#[derive(Debug, Clone)]
pub struct Context {
    pub scope: Scope,
    /// Shared trait/impl store; `Rc<RefCell<_>>` because every checked AST
    /// node carries a cloned `Context` but impls registered by one branch of
    /// the tree must be visible to every other (needed for the two-phase
    /// impl-queue fixpoint in `TypeChecker::check`).
    pub trait_store: Rc<RefCell<TraitStore>>,
    /// Set from `CompileOptions::nossa`; suppresses SSA-only lowering
    /// decisions the checker would otherwise make (e.g. treating a `&`-taken
    /// local as always escaping to the heap).
    pub no_ssa: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            scope: Scope::new(),
            trait_store: Rc::new(RefCell::new(TraitStore::new())),
            no_ssa: false,
        }
    }
}

impl<'a> From<&'a mut Context> for &'a Context {
    fn from(value: &'a mut Context) -> Self {
        value
    }
}

impl PartialEq for Context {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for Context {}

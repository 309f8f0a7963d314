//! Semantic analysis module
//!
//! Provides the scope tree, the binding table, and the builder that
//! constructs both from a parsed module.

pub mod bindings;
pub mod builder;
pub mod scope;

pub use bindings::{
    Binding, BindingId, BindingTable, Definition, DefinitionKind, Reference, ReferenceKind,
    UnresolvedReference,
};
pub use builder::{ScopeGraphBuilder, SemanticModel};
pub use scope::{AncestorIter, Scope, ScopeId, ScopeKind, ScopeTree};

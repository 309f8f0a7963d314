//! Binding table: declared names, their definitions, and their references
//!
//! A binding is one logical name in one scope. Re-declaring a name in a
//! scope where it is already bound does not create a second binding; the
//! new definition is appended, which is how merged declarations (several
//! `namespace N` blocks, overload signatures) stay one unit.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::Span;

use super::scope::{ScopeId, ScopeTree};

pub type BindingId = Id<Binding>;

/// Declaration form that introduced a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    /// Parameter of a body-less signature (overloads, declare functions,
    /// call/construct/method signatures, function-type literals).
    SignatureParam,
    /// Constructor parameter property (`constructor(private x)`).
    ParamProperty,
    /// Literal `this` parameter.
    ThisParam,
    CatchParam,
    Import,
    Interface,
    TypeAlias,
    TypeParam,
    Enum,
    EnumMember,
    Namespace,
    /// Key binder of a mapped type (`{ [K in Keys]: ... }`).
    MappedTypeParam,
}

/// One syntactic introduction of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// Span of the whole declaration node. For namespaces this is the span
    /// the body scope also carries, which is what the self-reference
    /// membership test compares.
    pub span: Span,
    /// Span of the declared identifier, used as the report position.
    pub name_span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub span: Span,
    /// Scope the use-site occurs in.
    pub from: ScopeId,
    pub kind: ReferenceKind,
}

#[derive(Debug)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub scope: ScopeId,
    pub definitions: Vec<Definition>,
    pub references: Vec<Reference>,
    pub is_exported: bool,
    /// Monotonic: flips false -> true, never back.
    pub used: bool,
    /// Set when an override report has been emitted for this binding, so
    /// merged declarations report at most once.
    pub reported: bool,
}

impl Binding {
    /// Identifier position of the first definition.
    pub fn name_span(&self) -> Span {
        self.definitions
            .first()
            .map(|d| d.name_span)
            .unwrap_or_default()
    }

    pub fn has_definition_kind(&self, kind: DefinitionKind) -> bool {
        self.definitions.iter().any(|d| d.kind == kind)
    }

    pub fn is_parameter(&self) -> bool {
        self.has_definition_kind(DefinitionKind::Param)
    }

    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }

    /// True when every reference is a write (assigned but never read).
    pub fn is_write_only(&self) -> bool {
        !self.references.is_empty()
            && self
                .references
                .iter()
                .all(|r| r.kind == ReferenceKind::Write)
    }
}

/// A use-site whose name resolved to no binding in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub name: String,
    pub span: Span,
    pub scope: ScopeId,
    pub kind: ReferenceKind,
}

pub struct BindingTable {
    bindings: Arena<Binding>,
    by_scope: HashMap<ScopeId, HashMap<String, BindingId>>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            bindings: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    /// Declares `name` in `scope`. If the name is already bound there the
    /// definition is merged onto the existing binding.
    pub fn declare(
        &mut self,
        name: &str,
        scope: ScopeId,
        definition: Definition,
        is_exported: bool,
    ) -> BindingId {
        if let Some(&existing) = self.by_scope.get(&scope).and_then(|m| m.get(name)) {
            let binding = &mut self.bindings[existing];
            binding.definitions.push(definition);
            binding.is_exported |= is_exported;
            return existing;
        }

        let id = self.bindings.alloc_with_id(|id| Binding {
            id,
            name: name.to_string(),
            scope,
            definitions: vec![definition],
            references: Vec::new(),
            is_exported,
            used: false,
            reported: false,
        });

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);

        id
    }

    /// Resolves `name` starting at `scope` and walking the parent chain.
    pub fn lookup(&self, name: &str, scope: ScopeId, scopes: &ScopeTree) -> Option<BindingId> {
        for ancestor in scopes.ancestors(scope) {
            if let Some(&id) = self.by_scope.get(&ancestor.id).and_then(|m| m.get(name)) {
                return Some(id);
            }
        }
        None
    }

    /// Looks `name` up in exactly one scope, without chain walking.
    pub fn lookup_local(&self, name: &str, scope: ScopeId) -> Option<BindingId> {
        self.by_scope.get(&scope).and_then(|m| m.get(name)).copied()
    }

    pub fn add_reference(&mut self, id: BindingId, reference: Reference) {
        self.bindings[id].references.push(reference);
    }

    /// The mark-used primitive: resolves `name` from `scope` up the chain
    /// and flips the used flag. Returns false when the name is unbound.
    /// Idempotent; the flag never flips back.
    pub fn mark_used(&mut self, name: &str, scope: ScopeId, scopes: &ScopeTree) -> bool {
        match self.lookup(name, scope, scopes) {
            Some(id) => {
                self.bindings[id].used = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_binding_used(&mut self, id: BindingId) {
        self.bindings[id].used = true;
    }

    pub fn mark_reported(&mut self, id: BindingId) {
        self.bindings[id].reported = true;
    }

    pub fn set_exported(&mut self, id: BindingId) {
        self.bindings[id].is_exported = true;
    }

    pub fn get(&self, id: BindingId) -> &Binding {
        &self.bindings[id]
    }

    /// Bindings declared directly in `scope`, in declaration order.
    pub fn bindings_in_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Binding> {
        self.bindings
            .iter()
            .map(|(_, b)| b)
            .filter(move |b| b.scope == scope)
    }

    /// All bindings in declaration order.
    pub fn all_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().map(|(_, b)| b)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::scope::ScopeKind;
    use swc_common::{BytePos, DUMMY_SP};

    fn span_at(lo: u32, hi: u32) -> Span {
        Span::new(BytePos(lo), BytePos(hi))
    }

    fn def(kind: DefinitionKind, lo: u32, hi: u32) -> Definition {
        Definition {
            kind,
            span: span_at(lo, hi),
            name_span: span_at(lo, lo + 1),
        }
    }

    fn setup() -> (ScopeTree, ScopeId) {
        let mut scopes = ScopeTree::new();
        let module = scopes.create_scope(ScopeKind::Module, None, DUMMY_SP);
        (scopes, module)
    }

    #[test]
    fn declare_and_lookup_in_same_scope() {
        let (scopes, module) = setup();
        let mut table = BindingTable::new();

        let id = table.declare("x", module, def(DefinitionKind::Const, 1, 12), false);

        assert_eq!(table.lookup("x", module, &scopes), Some(id));
        assert_eq!(table.get(id).name, "x");
        assert_eq!(table.get(id).definitions.len(), 1);
        assert!(!table.get(id).used);
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let (mut scopes, module) = setup();
        let inner = scopes.create_scope(ScopeKind::Function, Some(module), DUMMY_SP);
        let mut table = BindingTable::new();

        let id = table.declare("outer", module, def(DefinitionKind::Let, 1, 10), false);

        assert_eq!(table.lookup("outer", inner, &scopes), Some(id));
    }

    #[test]
    fn shadowing_creates_separate_bindings() {
        let (mut scopes, module) = setup();
        let inner = scopes.create_scope(ScopeKind::Function, Some(module), DUMMY_SP);
        let mut table = BindingTable::new();

        let outer_id = table.declare("x", module, def(DefinitionKind::Const, 1, 12), false);
        let inner_id = table.declare("x", inner, def(DefinitionKind::Const, 20, 32), false);

        assert_ne!(outer_id, inner_id);
        assert_eq!(table.lookup("x", inner, &scopes), Some(inner_id));
        assert_eq!(table.lookup("x", module, &scopes), Some(outer_id));
    }

    #[test]
    fn redeclaration_in_same_scope_merges_definitions() {
        let (_, module) = setup();
        let mut table = BindingTable::new();

        let first = table.declare("ns", module, def(DefinitionKind::Namespace, 1, 30), false);
        let second = table.declare("ns", module, def(DefinitionKind::Namespace, 40, 70), false);

        assert_eq!(first, second);
        assert_eq!(table.get(first).definitions.len(), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn merge_keeps_exported_flag_sticky() {
        let (_, module) = setup();
        let mut table = BindingTable::new();

        let id = table.declare("f", module, def(DefinitionKind::Function, 1, 20), true);
        table.declare("f", module, def(DefinitionKind::Namespace, 30, 60), false);

        assert!(table.get(id).is_exported);
    }

    #[test]
    fn lookup_local_does_not_walk_chain() {
        let (mut scopes, module) = setup();
        let inner = scopes.create_scope(ScopeKind::Function, Some(module), DUMMY_SP);
        let mut table = BindingTable::new();

        table.declare("x", module, def(DefinitionKind::Const, 1, 12), false);

        assert!(table.lookup_local("x", module).is_some());
        assert!(table.lookup_local("x", inner).is_none());
    }

    #[test]
    fn mark_used_resolves_through_chain() {
        let (mut scopes, module) = setup();
        let inner = scopes.create_scope(ScopeKind::Block, Some(module), DUMMY_SP);
        let mut table = BindingTable::new();

        let id = table.declare("x", module, def(DefinitionKind::Let, 1, 10), false);

        assert!(table.mark_used("x", inner, &scopes));
        assert!(table.get(id).used);
        assert!(!table.mark_used("missing", inner, &scopes));
    }

    #[test]
    fn mark_used_is_idempotent() {
        let (scopes, module) = setup();
        let mut table = BindingTable::new();

        let id = table.declare("x", module, def(DefinitionKind::Let, 1, 10), false);

        table.mark_used("x", module, &scopes);
        let after_first = table.get(id).used;
        table.mark_used("x", module, &scopes);

        assert!(after_first);
        assert!(table.get(id).used);
        assert_eq!(table.get(id).references.len(), 0);
    }

    #[test]
    fn references_track_kind_and_origin() {
        let (mut scopes, module) = setup();
        let inner = scopes.create_scope(ScopeKind::Function, Some(module), DUMMY_SP);
        let mut table = BindingTable::new();

        let id = table.declare("x", module, def(DefinitionKind::Let, 1, 10), false);
        table.add_reference(
            id,
            Reference {
                span: span_at(20, 21),
                from: inner,
                kind: ReferenceKind::Read,
            },
        );
        table.add_reference(
            id,
            Reference {
                span: span_at(30, 31),
                from: module,
                kind: ReferenceKind::Write,
            },
        );

        let binding = table.get(id);
        assert_eq!(binding.references.len(), 2);
        assert_eq!(binding.references[0].from, inner);
        assert!(!binding.is_write_only());
    }

    #[test]
    fn write_only_requires_all_writes() {
        let (_, module) = setup();
        let mut table = BindingTable::new();

        let id = table.declare("x", module, def(DefinitionKind::Let, 1, 10), false);
        table.add_reference(
            id,
            Reference {
                span: span_at(20, 21),
                from: module,
                kind: ReferenceKind::Write,
            },
        );

        assert!(table.get(id).is_write_only());
    }

    #[test]
    fn bindings_in_scope_preserves_declaration_order() {
        let (mut scopes, module) = setup();
        let other = scopes.create_scope(ScopeKind::Function, Some(module), DUMMY_SP);
        let mut table = BindingTable::new();

        table.declare("a", module, def(DefinitionKind::Const, 1, 10), false);
        table.declare("b", other, def(DefinitionKind::Const, 11, 20), false);
        table.declare("c", module, def(DefinitionKind::Const, 21, 30), false);

        let names: Vec<&str> = table
            .bindings_in_scope(module)
            .map(|b| b.name.as_str())
            .collect();

        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn name_span_comes_from_first_definition() {
        let (_, module) = setup();
        let mut table = BindingTable::new();

        let id = table.declare("ns", module, def(DefinitionKind::Namespace, 5, 30), false);
        table.declare("ns", module, def(DefinitionKind::Namespace, 40, 70), false);

        assert_eq!(table.get(id).name_span(), span_at(5, 6));
    }
}

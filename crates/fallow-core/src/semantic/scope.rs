//! Lexical scope tree for binding and reference analysis
//!
//! Scopes form a rooted tree stored in an arena with parent indices, so
//! ancestor walks are plain index chasing and the tree is cycle-free by
//! construction.

use id_arena::{Arena, Id};
use swc_common::Span;

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    ArrowFunction,
    Block,
    For,
    While,
    Switch,
    Try,
    Catch,
    Class,
    /// Body of a `namespace`/`module` declaration. The scope's span is the
    /// span of the whole declaration node, not just the block.
    Namespace,
    /// Body of an `enum` declaration holding the member bindings.
    Enum,
    /// Type-level scope: function-type literals, call/construct/method
    /// signatures, mapped types, generic parameter lists.
    Type,
}

impl ScopeKind {
    /// Scopes that `var` and function declarations hoist into.
    pub fn is_hoist_target(self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::ArrowFunction
                | ScopeKind::Namespace
        )
    }

    /// Scopes that introduce runtime variables. Namespace bodies are
    /// declarative and deliberately excluded.
    pub fn is_variable_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::ArrowFunction
        )
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    root: Option<ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn create_scope(
        &mut self,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        span: Span,
    ) -> ScopeId {
        let id = self.arena.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
        });

        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }

        if self.root.is_none() {
            self.root = Some(id);
        }

        id
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.arena[id]
    }

    pub fn parent(&self, id: ScopeId) -> Option<&Scope> {
        self.arena[id].parent.map(|p| &self.arena[p])
    }

    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        self.arena[id].children.iter().map(|&c| &self.arena[c])
    }

    /// Walks the parent chain starting at `id` itself.
    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    pub fn is_descendant_of(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(scope).any(|s| s.id == ancestor)
    }

    /// Nearest scope (including `from`) that `var` declarations land in.
    pub fn hoisting_scope(&self, from: ScopeId) -> ScopeId {
        self.ancestors(from)
            .find(|s| s.kind.is_hoist_target())
            .map(|s| s.id)
            .unwrap_or(from)
    }

    /// Nearest variable-introducing scope, including `from` itself.
    pub fn variable_scope(&self, from: ScopeId) -> ScopeId {
        self.ancestors(from)
            .find(|s| s.kind.is_variable_scope())
            .map(|s| s.id)
            .unwrap_or(from)
    }
}

pub struct AncestorIter<'a> {
    tree: &'a ScopeTree,
    current: Option<ScopeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let scope = &self.tree.arena[current_id];
        self.current = scope.parent;
        Some(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::{BytePos, DUMMY_SP};

    fn dummy_span() -> Span {
        DUMMY_SP
    }

    fn span_at(lo: u32, hi: u32) -> Span {
        Span::new(BytePos(lo), BytePos(hi))
    }

    #[test]
    fn creates_root_scope() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());

        assert_eq!(tree.root(), Some(module));

        let scope = tree.get(module);
        assert_eq!(scope.kind, ScopeKind::Module);
        assert!(scope.parent.is_none());
        assert!(scope.children.is_empty());
    }

    #[test]
    fn nested_scopes_have_correct_parent() {
        let mut tree = ScopeTree::new();

        let module = tree.create_scope(ScopeKind::Module, None, span_at(1, 100));
        let func = tree.create_scope(ScopeKind::Function, Some(module), span_at(10, 90));
        let block = tree.create_scope(ScopeKind::Block, Some(func), span_at(20, 80));

        assert_eq!(tree.get(block).parent, Some(func));
        assert_eq!(tree.get(func).parent, Some(module));
        assert!(tree.get(module).parent.is_none());

        assert_eq!(tree.get(module).children, vec![func]);
        assert_eq!(tree.get(func).children, vec![block]);
        assert!(tree.get(block).children.is_empty());
    }

    #[test]
    fn ancestors_iterator_starts_at_self() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());
        let func = tree.create_scope(ScopeKind::Function, Some(module), dummy_span());
        let block = tree.create_scope(ScopeKind::Block, Some(func), dummy_span());

        let ancestors: Vec<ScopeKind> = tree.ancestors(block).map(|s| s.kind).collect();

        assert_eq!(
            ancestors,
            vec![ScopeKind::Block, ScopeKind::Function, ScopeKind::Module]
        );
    }

    #[test]
    fn is_descendant_of_checks_ancestry() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());
        let func = tree.create_scope(ScopeKind::Function, Some(module), dummy_span());
        let block = tree.create_scope(ScopeKind::Block, Some(func), dummy_span());

        assert!(tree.is_descendant_of(block, block));
        assert!(tree.is_descendant_of(block, func));
        assert!(tree.is_descendant_of(block, module));
        assert!(!tree.is_descendant_of(module, func));
        assert!(!tree.is_descendant_of(func, block));
    }

    #[test]
    fn hoisting_scope_skips_blocks() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());
        let func = tree.create_scope(ScopeKind::Function, Some(module), dummy_span());
        let for_scope = tree.create_scope(ScopeKind::For, Some(func), dummy_span());
        let block = tree.create_scope(ScopeKind::Block, Some(for_scope), dummy_span());

        assert_eq!(tree.hoisting_scope(block), func);
        assert_eq!(tree.hoisting_scope(func), func);
        assert_eq!(tree.hoisting_scope(module), module);
    }

    #[test]
    fn hoisting_scope_stops_at_namespace() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());
        let ns = tree.create_scope(ScopeKind::Namespace, Some(module), dummy_span());
        let block = tree.create_scope(ScopeKind::Block, Some(ns), dummy_span());

        assert_eq!(tree.hoisting_scope(block), ns);
    }

    #[test]
    fn variable_scope_skips_namespace() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());
        let ns = tree.create_scope(ScopeKind::Namespace, Some(module), dummy_span());
        let inner = tree.create_scope(ScopeKind::Namespace, Some(ns), dummy_span());

        assert_eq!(tree.variable_scope(inner), module);
        assert_eq!(tree.variable_scope(ns), module);
        assert_eq!(tree.variable_scope(module), module);
    }

    #[test]
    fn variable_scope_stops_at_function() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());
        let func = tree.create_scope(ScopeKind::ArrowFunction, Some(module), dummy_span());
        let block = tree.create_scope(ScopeKind::Block, Some(func), dummy_span());

        assert_eq!(tree.variable_scope(block), func);
    }

    #[test]
    fn namespace_scope_carries_declaration_span() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, span_at(1, 100));
        let ns = tree.create_scope(ScopeKind::Namespace, Some(module), span_at(10, 60));

        assert_eq!(tree.get(ns).span, span_at(10, 60));
    }

    #[test]
    fn all_scope_kinds_can_be_created() {
        let mut tree = ScopeTree::new();
        let module = tree.create_scope(ScopeKind::Module, None, dummy_span());

        let kinds = vec![
            ScopeKind::Global,
            ScopeKind::Function,
            ScopeKind::ArrowFunction,
            ScopeKind::Block,
            ScopeKind::For,
            ScopeKind::While,
            ScopeKind::Switch,
            ScopeKind::Try,
            ScopeKind::Catch,
            ScopeKind::Class,
            ScopeKind::Namespace,
            ScopeKind::Enum,
            ScopeKind::Type,
        ];

        for kind in kinds {
            let scope_id = tree.create_scope(kind, Some(module), dummy_span());
            assert_eq!(tree.get(scope_id).kind, kind);
        }
    }
}

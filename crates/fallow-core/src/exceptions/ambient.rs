//! Usage propagation for declarations inside `declare` subtrees
//!
//! An ambient declaration asserts that a name exists somewhere else; its
//! own binding has no runtime body to be referenced from, and it commonly
//! shadows an outer binding purely to give it a type. Both the ambient
//! binding and that outer binding are exempt.

use crate::semantic::{BindingId, ScopeId, SemanticModel};

/// Marks an ambient binding used, then looks the same name up directly in
/// the nearest variable-introducing scope and marks a hit there too.
///
/// The outer lookup is by name, not by resolved identity: an unrelated
/// outer binding that happens to share the name is also marked. That
/// over-approximation is intentional and pinned by tests.
pub(crate) fn propagate(model: &mut SemanticModel, binding: BindingId, scope: ScopeId) {
    model.bindings.mark_binding_used(binding);

    let variable_scope = model.scope_tree.variable_scope(scope);
    if variable_scope == scope {
        return;
    }

    let outer = {
        let name = model.bindings.get(binding).name.as_str();
        model.bindings.lookup_local(name, variable_scope)
    };
    if let Some(outer) = outer {
        model.bindings.mark_binding_used(outer);
    }
}

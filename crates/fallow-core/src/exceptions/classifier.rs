//! Eager usage marking for declaration forms the zero-reference rule
//! cannot judge
//!
//! Each handler marks bindings used and nothing else; no handler ever
//! reports a binding. The handlers are pure functions of the shape and the
//! scope graph.

use swc_ecma_ast::{Param, TsFnParam, TsParamPropParam};

use super::patterns::PatternLeaves;
use crate::semantic::{ScopeId, SemanticModel};

/// Parameters of a body-less function exist to document the signature.
/// Every leaf of every parameter pattern is used by definition.
pub(crate) fn mark_fn_signature_params(model: &mut SemanticModel, params: &[Param], scope: ScopeId) {
    for param in params {
        for leaf in PatternLeaves::new(&param.pat) {
            model
                .bindings
                .mark_used(leaf.id.sym.as_str(), scope, &model.scope_tree);
        }
    }
}

/// Same as [`mark_fn_signature_params`], for type-level signatures whose
/// parameters are not wrapped in `Param`.
pub(crate) fn mark_type_member_params(
    model: &mut SemanticModel,
    params: &[TsFnParam],
    scope: ScopeId,
) {
    for param in params {
        for leaf in PatternLeaves::from_fn_param(param) {
            model
                .bindings
                .mark_used(leaf.id.sym.as_str(), scope, &model.scope_tree);
        }
    }
}

/// Enum members may reference each other but never have to; absence of a
/// reference to a member is not evidence of dead code. Marks everything
/// declared in the enum's own scope, which holds exactly the members. The
/// enum name itself lives in the outer scope and stays subject to the
/// generic verdict.
pub(crate) fn mark_enum_members(model: &mut SemanticModel, scope: ScopeId) {
    mark_all_in_scope(model, scope);
}

/// The key binder of a mapped type is language mechanics; mentioning it in
/// the value position is optional.
pub(crate) fn mark_mapped_type_binder(model: &mut SemanticModel, scope: ScopeId) {
    mark_all_in_scope(model, scope);
}

/// Constructor parameter properties become class members on declaration.
/// Member usage is out of scope here, so the parameter counts as used.
pub(crate) fn mark_param_property(
    model: &mut SemanticModel,
    param: &TsParamPropParam,
    scope: ScopeId,
) {
    match param {
        TsParamPropParam::Ident(ident) => {
            model
                .bindings
                .mark_used(ident.id.sym.as_str(), scope, &model.scope_tree);
        }
        TsParamPropParam::Assign(assign) => {
            for leaf in PatternLeaves::new(&assign.left) {
                model
                    .bindings
                    .mark_used(leaf.id.sym.as_str(), scope, &model.scope_tree);
            }
        }
    }
}

/// A literal `this` parameter is a receiver type annotation, never an
/// addressable value.
pub(crate) fn mark_this_param(model: &mut SemanticModel, scope: ScopeId) {
    model.bindings.mark_used("this", scope, &model.scope_tree);
}

fn mark_all_in_scope(model: &mut SemanticModel, scope: ScopeId) {
    let ids: Vec<_> = model
        .bindings
        .bindings_in_scope(scope)
        .map(|b| b.id)
        .collect();
    for id in ids {
        model.bindings.mark_binding_used(id);
    }
}

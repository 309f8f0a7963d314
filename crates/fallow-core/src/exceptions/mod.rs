//! Exception rules layered over the generic unused-binding verdict
//!
//! The generic rule reports any binding with zero references. Several
//! TypeScript declaration forms are structurally "used" without a single
//! reference edge (signature parameters, enum members, mapped-type key
//! binders, parameter properties, `this` parameters, ambient declarations),
//! and one form needs the opposite correction: a namespace referenced only
//! from inside its own bodies has references yet is still dead.
//!
//! While building the scope graph, the builder records one [`DeclShape`]
//! per declaration form it recognizes, in document order. [`apply`] drains
//! that queue through a single match and dispatches each shape to its
//! handler. All handlers mutate the same scope graph; marking a binding
//! used is idempotent, so dispatch order between sibling shapes does not
//! matter.

pub mod ambient;
pub mod classifier;
pub mod patterns;
pub mod self_reference;

pub use patterns::PatternLeaves;

use swc_common::Span;
use swc_ecma_ast::{Param, TsFnParam, TsParamPropParam};
use thiserror::Error;

use crate::semantic::{BindingId, ScopeId, SemanticModel};

/// Declaration forms with usage semantics the generic zero-reference rule
/// cannot see. Recorded by the scope-graph builder, consumed by [`apply`].
#[derive(Clone, Copy)]
pub enum DeclShape<'ast> {
    /// Parameter list of a function declaration without a body (overload
    /// signatures, `declare function`, abstract methods).
    FnSignature {
        params: &'ast [Param],
        scope: ScopeId,
    },
    /// Parameter list of a type-level signature (interface members,
    /// call/construct signatures, function-type literals).
    TypeMemberSignature {
        params: &'ast [TsFnParam],
        scope: ScopeId,
    },
    /// Body scope of an enum declaration.
    EnumContainer { scope: ScopeId },
    /// Scope holding the key binder of a mapped type.
    MappedTypeBinder { scope: ScopeId },
    /// Constructor parameter property (`constructor(private x)`).
    ParamProperty {
        param: &'ast TsParamPropParam,
        scope: ScopeId,
    },
    /// Literal `this` parameter at the head of a parameter list.
    ThisParam { scope: ScopeId },
    /// Body scope of a namespace declaration.
    NamespaceBody { scope: ScopeId },
    /// A binding declared inside a `declare` subtree.
    AmbientDecl {
        binding: BindingId,
        scope: ScopeId,
    },
}

/// A scope-graph invariant the exception pass depends on does not hold.
/// Fatal for the analysis run; the caller aborts instead of guessing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("namespace body scope has no enclosing scope")]
    DetachedNamespaceBody { span: Span },
}

/// An override report: the binding has references, but every one of them
/// originates inside its own declaration, so it is still unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedReport {
    pub name: String,
    /// Action word slotted into the message, `"defined"` for declarations
    /// and `"assigned a value"` for write-only bindings.
    pub action: &'static str,
    /// Optional clause appended to the message.
    pub additional: Option<String>,
    /// Identifier position of the first definition.
    pub span: Span,
}

impl UnusedReport {
    pub fn message(&self) -> String {
        match &self.additional {
            Some(clause) => format!("'{}' is {} but never used ({clause})", self.name, self.action),
            None => format!("'{}' is {} but never used", self.name, self.action),
        }
    }
}

/// Runs every recorded shape against the scope graph and returns the
/// override reports. Exemptions are silent flag flips; only the
/// self-reference check produces reports.
pub fn apply(
    shapes: &[DeclShape<'_>],
    model: &mut SemanticModel,
) -> Result<Vec<UnusedReport>, InvariantViolation> {
    let mut reports = Vec::new();

    for &shape in shapes {
        match shape {
            DeclShape::FnSignature { params, scope } => {
                classifier::mark_fn_signature_params(model, params, scope);
            }
            DeclShape::TypeMemberSignature { params, scope } => {
                classifier::mark_type_member_params(model, params, scope);
            }
            DeclShape::EnumContainer { scope } => {
                classifier::mark_enum_members(model, scope);
            }
            DeclShape::MappedTypeBinder { scope } => {
                classifier::mark_mapped_type_binder(model, scope);
            }
            DeclShape::ParamProperty { param, scope } => {
                classifier::mark_param_property(model, param, scope);
            }
            DeclShape::ThisParam { scope } => {
                classifier::mark_this_param(model, scope);
            }
            DeclShape::NamespaceBody { scope } => {
                self_reference::resolve(model, scope, &mut reports)?;
            }
            DeclShape::AmbientDecl { binding, scope } => {
                ambient::propagate(model, binding, scope);
            }
        }
    }

    Ok(reports)
}

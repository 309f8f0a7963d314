//! Detection of namespaces referenced only from inside their own bodies
//!
//! A namespace that mentions itself (recursive qualification, aliases of
//! its own members) accumulates reference edges without ever being used by
//! outside code. The generic rule sees a nonzero reference count and stays
//! silent; this check overrides it.
//!
//! Merged declarations of one namespace name share a single binding with
//! one definition per body, and are judged as a unit: a reference inside
//! any of the bodies is a self-reference for all of them.

use swc_common::Span;

use super::{InvariantViolation, UnusedReport};
use crate::semantic::{DefinitionKind, ScopeId, SemanticModel};

/// Runs the self-reference check for one namespace body scope.
///
/// Examines every binding declared in the scope enclosing the body. A
/// binding qualifies when it has at least one namespace definition and at
/// least one reference; it is reported when every reference originates in
/// a scope nested inside one of its namespace bodies. Zero-reference
/// namespaces are left to the generic rule.
pub(crate) fn resolve(
    model: &mut SemanticModel,
    namespace_scope: ScopeId,
    reports: &mut Vec<UnusedReport>,
) -> Result<(), InvariantViolation> {
    let body = model.scope_tree.get(namespace_scope);
    let enclosing = body
        .parent
        .ok_or(InvariantViolation::DetachedNamespaceBody { span: body.span })?;

    let candidates: Vec<_> = model
        .bindings
        .bindings_in_scope(enclosing)
        .map(|b| b.id)
        .collect();

    for id in candidates {
        let binding = model.bindings.get(id);
        if binding.reported {
            continue;
        }

        let namespace_spans: Vec<Span> = binding
            .definitions
            .iter()
            .filter(|d| d.kind == DefinitionKind::Namespace)
            .map(|d| d.span)
            .collect();
        if namespace_spans.is_empty() {
            continue;
        }
        if binding.references.is_empty() {
            continue;
        }

        // Each namespace body scope carries the span of its declaration
        // node, so membership is a span test on the ancestor chain.
        let self_referenced_only = binding.references.iter().all(|reference| {
            model
                .scope_tree
                .ancestors(reference.from)
                .any(|scope| namespace_spans.contains(&scope.span))
        });
        if !self_referenced_only {
            continue;
        }

        let report = UnusedReport {
            name: binding.name.clone(),
            action: "defined",
            additional: None,
            span: binding.name_span(),
        };
        model.bindings.mark_reported(id);
        reports.push(report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::apply;
    use crate::parser::ParsedFile;
    use crate::semantic::{BindingTable, ScopeGraphBuilder, ScopeKind, ScopeTree};
    use swc_common::BytePos;

    fn run(code: &str) -> (SemanticModel, Vec<UnusedReport>) {
        let parsed = ParsedFile::from_source("test.ts", code);
        let module = parsed.module().expect("parse failed");
        let (mut model, shapes) = ScopeGraphBuilder::build_with_shapes(module);
        let reports = apply(&shapes, &mut model).expect("exception pass failed");
        (model, reports)
    }

    #[test]
    fn namespace_referenced_only_inside_itself_is_reported() {
        let (_, reports) = run(r#"
namespace Registry {
    export function lookup(): void {
        Registry.lookup();
    }
}
"#);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "Registry");
        assert_eq!(reports[0].action, "defined");
    }

    #[test]
    fn nested_recursive_mention_still_counts_as_internal() {
        let (_, reports) = run(r#"
namespace Tree {
    export function walk(): void {
        function descend(): void {
            Tree.walk();
        }
        descend();
    }
}
"#);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "Tree");
    }

    #[test]
    fn merged_bodies_are_judged_collectively_and_reported_once() {
        let (model, reports) = run(r#"
namespace Store {
    export const limit = 1;
}
namespace Store {
    export function capacity(): number {
        return Store.limit;
    }
}
"#);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "Store");

        let binding = model
            .bindings
            .all_bindings()
            .find(|b| b.name == "Store")
            .unwrap();
        assert_eq!(binding.definitions.len(), 2);
        assert!(binding.reported);
        assert_eq!(reports[0].span, binding.definitions[0].name_span);
    }

    #[test]
    fn external_reference_prevents_the_override() {
        let (_, reports) = run(r#"
namespace Flags {
    export const verbose = true;
}
const enabled = Flags.verbose;
"#);
        assert!(reports.is_empty());
    }

    #[test]
    fn zero_reference_namespace_is_left_to_the_generic_rule() {
        let (model, reports) = run("namespace Idle { export const tick = 1; }");
        assert!(reports.is_empty());

        let binding = model
            .bindings
            .all_bindings()
            .find(|b| b.name == "Idle")
            .unwrap();
        assert!(!binding.reported);
        assert!(binding.references.is_empty());
    }

    #[test]
    fn non_namespace_bindings_are_not_examined() {
        let (_, reports) = run(r#"
const data = 1;
namespace Wrapper {
    export const inner = data;
}
"#);
        assert!(reports.is_empty());
    }

    #[test]
    fn merged_function_and_namespace_report_at_first_definition() {
        let (model, reports) = run(r#"
function make(): void {}
namespace make {
    export const marker = make;
}
"#);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "make");

        let binding = model
            .bindings
            .all_bindings()
            .find(|b| b.name == "make")
            .unwrap();
        assert_eq!(binding.definitions[0].kind, DefinitionKind::Function);
        assert_eq!(reports[0].span, binding.definitions[0].name_span);
    }

    #[test]
    fn namespace_scope_without_parent_is_fatal() {
        let mut scopes = ScopeTree::new();
        let span = Span::new(BytePos(1), BytePos(20));
        let orphan = scopes.create_scope(ScopeKind::Namespace, None, span);
        let mut model = SemanticModel {
            scope_tree: scopes,
            bindings: BindingTable::new(),
            unresolved_references: Vec::new(),
        };
        let mut reports = Vec::new();

        let err = resolve(&mut model, orphan, &mut reports).unwrap_err();
        assert_eq!(err, InvariantViolation::DetachedNamespaceBody { span });
        assert!(reports.is_empty());
    }
}

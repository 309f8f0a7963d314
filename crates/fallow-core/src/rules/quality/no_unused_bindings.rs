//! no-unused-bindings rule (Q001): Detects bindings declared but never used
//!
//! Scope-aware detection over the full binding table: variables, functions,
//! classes, imports, interfaces, type aliases, enums, type parameters, and
//! namespaces. It correctly handles:
//! - Bindings used in closures and in type positions (cross-scope references)
//! - Underscore-prefixed names (intentionally unused)
//! - Write-only bindings (assigned but never read)
//! - Parameters before a used parameter ("args: after-used" pattern)
//! - Catch clause parameters - often intentionally unused
//! - Signature-only parameter lists, enum members, mapped-type key binders,
//!   parameter properties, and `this` parameters (exempt by construction)
//! - `declare`-flagged subtrees (ambient names exempt themselves and any
//!   same-name binding in the nearest variable-introducing scope)
//! - Namespaces referenced only from inside their own bodies (reported
//!   unused despite the nonzero reference count)

use std::collections::{HashMap, HashSet};

use swc_common::Span;

use crate::declare_rule;
use crate::diagnostic::{Diagnostic, Fix};
use crate::exceptions;
use crate::parser::ParsedFile;
use crate::rules::{Rule, RuleError, RuleMetadata, Severity};
use crate::semantic::bindings::{Binding, DefinitionKind};
use crate::semantic::builder::ScopeGraphBuilder;
use crate::semantic::scope::ScopeId;

declare_rule!(
    NoUnusedBindings,
    id = "Q001",
    name = "no-unused-bindings",
    description = "Disallow bindings that are declared but never used",
    category = Quality,
    severity = Warning,
    examples = "// Bad\nconst unused = 1;\n\n// Good\nconst used = 1;\nrun(used);\n\n// Allowed (underscore prefix)\nconst _intentionallyUnused = 1;"
);

/// Collect parameters that should be ignored because they precede a used
/// parameter in the same parameter list. Callback APIs impose positional
/// parameters, so only parameters after the last used one are reportable.
fn collect_ignored_params<'a>(bindings: impl Iterator<Item = &'a Binding>) -> HashSet<Span> {
    // Group parameters by their function scope.
    let mut params_by_scope: HashMap<ScopeId, Vec<(Span, bool)>> = HashMap::new();

    for binding in bindings {
        if binding.is_parameter() {
            let is_used = binding.has_references();
            params_by_scope
                .entry(binding.scope)
                .or_default()
                .push((binding.name_span(), is_used));
        }
    }

    let mut ignored = HashSet::new();

    for (_scope_id, mut params) in params_by_scope {
        // Sort by byte offset to recover declaration order.
        params.sort_by_key(|(span, _)| span.lo.0);

        let last_used_idx = params.iter().rposition(|(_, is_used)| *is_used);

        if let Some(last_idx) = last_used_idx {
            for (span, is_used) in params.iter().take(last_idx) {
                if !is_used {
                    ignored.insert(*span);
                }
            }
        }
    }

    ignored
}

fn suggestion_for(name: &str) -> String {
    format!(
        "Remove unused binding '{}' or prefix with underscore if intentionally unused",
        name
    )
}

impl Rule for NoUnusedBindings {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Result<Vec<Diagnostic>, RuleError> {
        let Some(module) = file.module() else {
            return Ok(Vec::new());
        };

        let (mut model, shapes) = ScopeGraphBuilder::build_with_shapes(module);
        let override_reports = exceptions::apply(&shapes, &mut model)?;

        let ignored_params = collect_ignored_params(model.bindings.all_bindings());

        // Override reports go through the same export and naming filters as
        // the generic scan. Reports carry the first definition's identifier
        // span, so suppression is a span test.
        let suppressed: HashSet<Span> = model
            .bindings
            .all_bindings()
            .filter(|b| b.is_exported || b.name.starts_with('_'))
            .map(|b| b.name_span())
            .collect();

        let mut diagnostics = Vec::new();
        let file_path = file.metadata().filename.clone();

        for report in &override_reports {
            if suppressed.contains(&report.span) {
                continue;
            }

            let (line, column, end_line, end_column) = file.span_to_range(report.span);
            diagnostics.push(
                Diagnostic::new(
                    "Q001",
                    Severity::Warning,
                    report.message(),
                    &file_path,
                    line,
                    column,
                )
                .with_end(end_line, end_column)
                .with_suggestion(suggestion_for(&report.name)),
            );
        }

        for binding in model.bindings.all_bindings() {
            if binding.reported || binding.used || binding.is_exported {
                continue;
            }

            if binding.name.starts_with('_') {
                continue;
            }

            // Catch clause parameters are often intentionally unused for
            // empty catch blocks, e.g. catch (e) {}.
            if binding.has_definition_kind(DefinitionKind::CatchParam) {
                continue;
            }

            if binding.is_parameter() && ignored_params.contains(&binding.name_span()) {
                continue;
            }

            let is_unused = !binding.has_references();
            let is_write_only = binding.is_write_only();

            if !is_unused && !is_write_only {
                continue;
            }

            let message = if is_write_only {
                format!("'{}' is assigned a value but never used", binding.name)
            } else {
                format!("'{}' is defined but never used", binding.name)
            };

            let (line, column, end_line, end_column) = file.span_to_range(binding.name_span());

            let mut diagnostic = Diagnostic::new(
                "Q001",
                Severity::Warning,
                message,
                &file_path,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_suggestion(suggestion_for(&binding.name));

            // The underscore rename is only offered when the binding has no
            // references at all. Write-only bindings still have assignment
            // sites the rename would not update.
            if is_unused {
                diagnostic = diagnostic.with_fix(Fix::replace(
                    "Prefix with underscore",
                    format!("_{}", binding.name),
                    line,
                    column,
                    end_line,
                    end_column,
                ));
            }

            diagnostics.push(diagnostic);
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_rule(code: &str) -> Vec<Diagnostic> {
        let file = ParsedFile::from_source("test.ts", code);
        let rule = NoUnusedBindings::new();
        rule.check(&file).expect("rule run failed")
    }

    fn run_rule_tsx(code: &str) -> Vec<Diagnostic> {
        let file = ParsedFile::from_source("test.tsx", code);
        let rule = NoUnusedBindings::new();
        rule.check(&file).expect("rule run failed")
    }

    #[test]
    fn detects_unused_const() {
        let diagnostics = run_rule("const x = 1;");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "Q001");
        assert_eq!(diagnostics[0].message, "'x' is defined but never used");
    }

    #[test]
    fn ignores_used_variable() {
        let diagnostics = run_rule("const x = 1; run(x);");

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn detects_multiple_unused_bindings() {
        let code = r#"
const a = 1;
let b = 2;
var c = 3;
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn ignores_exported_binding() {
        let diagnostics = run_rule("export const x = 1;");

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ignores_underscore_prefix() {
        let code = r#"
const _unused = 1;
function greet(_ignored: string) {}
greet("hi");
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ignores_unused_catch_param() {
        let code = r#"
try {
    risky();
} catch (e) {}
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn detects_unused_function_param() {
        let code = r#"
function greet(name: string, extra: number) {
    console.log(name);
}
greet("hi", 1);
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("extra"));
    }

    #[test]
    fn ignores_unused_param_before_used_param() {
        let code = r#"
items.forEach((item, index) => {
    console.log(index);
});
"#;
        let diagnostics = run_rule(code);

        let item_diagnostics: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("item"))
            .collect();

        assert!(
            item_diagnostics.is_empty(),
            "Unused param before used param should be ignored"
        );
    }

    #[test]
    fn still_detects_params_after_last_used() {
        let code = r#"
function test(a: number, b: number, c: number) {
    console.log(a);
}
test(1, 2, 3);
"#;
        let diagnostics = run_rule(code);

        let bc_diagnostics: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("'b'") || d.message.contains("'c'"))
            .collect();

        assert_eq!(
            bc_diagnostics.len(),
            2,
            "Unused params after the last used one should be detected"
        );
    }

    #[test]
    fn all_params_flagged_when_none_used() {
        let code = r#"
function test(a: number, b: number) {
    console.log("none used");
}
test(1, 2);
"#;
        let diagnostics = run_rule(code);

        let param_diagnostics: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("'a'") || d.message.contains("'b'"))
            .collect();

        assert_eq!(param_diagnostics.len(), 2);
    }

    #[test]
    fn closure_variable_not_flagged() {
        let code = r#"
function createCounter() {
    let count = 0;
    return function () {
        count += 1;
        return count;
    };
}
createCounter();
"#;
        let diagnostics = run_rule(code);

        assert!(
            !diagnostics.iter().any(|d| d.message.contains("count")),
            "Binding used in a closure should not be flagged"
        );
    }

    #[test]
    fn shadowed_binding_tracked_separately() {
        let code = r#"
const x = 1;
function wrap() {
    const x = 2;
    return x;
}
console.log(x);
wrap();
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn write_only_binding_detected() {
        let code = r#"
let total = 0;
total = 1;
total = 2;
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "'total' is assigned a value but never used"
        );
    }

    #[test]
    fn update_expression_counts_as_write() {
        let code = r#"
let counter = 0;
counter++;
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("assigned a value"));
    }

    #[test]
    fn destructuring_assignment_default_counts_as_use() {
        let code = r#"
const fallback = 1;
let slot;
[slot = fallback] = [2];
run(slot);
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn for_of_over_existing_binding_is_write_only() {
        let code = r#"
let cursor = 0;
for (cursor of [1, 2]) {}
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "'cursor' is assigned a value but never used"
        );
    }

    #[test]
    fn unused_using_declaration_detected() {
        let code = r#"
function run(open: () => Disposable) {
    using handle = open();
}
run(acquire);
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'handle' is defined but never used");
    }

    #[test]
    fn binding_read_and_written_not_flagged() {
        let code = r#"
let x = 1;
x = 2;
report(x);
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unused_zero_reference_binding_offers_underscore_fix() {
        let diagnostics = run_rule("const stale = 1;");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].fixes.len(), 1);
        assert_eq!(diagnostics[0].fixes[0].title, "Prefix with underscore");
    }

    #[test]
    fn write_only_binding_gets_no_fix() {
        let code = r#"
let total = 0;
total = 1;
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].fixes.is_empty());
    }

    #[test]
    fn detects_unused_import() {
        let diagnostics = run_rule(r#"import { helper } from "./helper";"#);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'helper' is defined but never used");
    }

    #[test]
    fn import_used_in_type_position_not_flagged() {
        let code = r#"
import { Config } from "./config";
export function load(raw: string): Config {
    return JSON.parse(raw);
}
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn detects_unused_interface_and_type_alias() {
        let code = r#"
interface Options {
    verbose: boolean;
}
type Level = "info" | "warn";
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().any(|d| d.message.contains("Options")));
        assert!(diagnostics.iter().any(|d| d.message.contains("Level")));
    }

    #[test]
    fn detects_unused_type_param() {
        let code = r#"
function pass<T>(value: number): number {
    return value;
}
pass(1);
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'T' is defined but never used");
    }

    // === Signature parameter exemption ===

    #[test]
    fn overload_signature_params_never_flagged() {
        let code = r#"
function pick(slot: number): string;
function pick(slot: number, fallback: string): string {
    return fallback ?? String(slot);
}
pick(1);
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn declare_function_params_never_flagged() {
        let code = r#"
declare function render(template: string, data: unknown): string;
render("x", {});
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn interface_method_params_never_flagged() {
        let code = r#"
export interface Codec {
    encode(input: string, pretty: boolean): string;
    (raw: string): Codec;
    new (seed: number): Codec;
}
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn function_type_params_never_flagged() {
        let code = r#"
export type Handler = (event: string, payload: unknown) => void;
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn destructured_signature_params_never_flagged() {
        let code = r#"
declare function apply(cb: (a: number, { b, c }: { b: number; c: number }) => void): void;
apply(() => {});
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    // === Enum member exemption ===

    #[test]
    fn enum_members_never_flagged() {
        let code = r#"
enum Level { Low, High }
export const start: Level = Level.Low;
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty(), "enum members are exempt");
    }

    #[test]
    fn unused_enum_name_still_flagged() {
        let diagnostics = run_rule("enum Ghost { A, B }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'Ghost' is defined but never used");
    }

    // === Mapped type binder exemption ===

    #[test]
    fn mapped_type_key_never_flagged() {
        let code = r#"
export type Flags = { [K in "a" | "b"]: boolean };
"#;
        let diagnostics = run_rule(code);

        assert!(
            !diagnostics.iter().any(|d| d.message.contains("'K'")),
            "mapped-type key binder is exempt even when unreferenced"
        );
    }

    // === Parameter property and this-parameter exemption ===

    #[test]
    fn constructor_param_property_never_flagged() {
        let code = r#"
export class Database {
    constructor(private pool: number, readonly name = "main") {}
}
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn this_param_never_flagged() {
        let code = r#"
export function listen(this: Window, tag: string) {
    console.log(tag);
}
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    // === Ambient declarations ===

    #[test]
    fn declare_const_never_flagged() {
        let diagnostics = run_rule("declare const VERSION: string;");

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ambient_shadow_exempts_outer_binding() {
        let code = r#"
const sharedName = 1;
declare namespace host {
    const sharedName: number;
}
"#;
        let diagnostics = run_rule(code);

        // The ambient redeclaration exempts the outer binding of the same
        // name even though the outer one has no references of its own.
        assert!(
            !diagnostics.iter().any(|d| d.message.contains("sharedName")),
            "ambient shadow should exempt the outer binding"
        );
    }

    #[test]
    fn ambient_exemption_is_by_name_not_identity() {
        // The outer name matches the ambient one only by spelling; the
        // exemption still applies. The over-approximation is deliberate and
        // pinned here.
        let code = r#"
const cache = new Map();
declare namespace host {
    const cache: number;
}
"#;
        let diagnostics = run_rule(code);

        assert!(!diagnostics.iter().any(|d| d.message.contains("cache")));
    }

    // === Namespace self-reference override ===

    #[test]
    fn namespace_used_only_inside_itself_is_flagged() {
        let code = r#"
namespace Registry {
    export const entries: string[] = [];
    export function add(entry: string) {
        Registry.entries.push(entry);
    }
}
"#;
        let diagnostics = run_rule(code);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "'Registry' is defined but never used"
        );
    }

    #[test]
    fn merged_namespace_reported_once_at_first_declaration() {
        let code = r#"
namespace Store {
    export const a = 1;
}
namespace Store {
    export function get(): number {
        return Store.a;
    }
}
"#;
        let diagnostics = run_rule(code);

        let store_diagnostics: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.message.contains("Store"))
            .collect();

        assert_eq!(store_diagnostics.len(), 1);
        assert_eq!(store_diagnostics[0].line, 2, "report at first declaration");
    }

    #[test]
    fn namespace_with_external_reference_not_flagged() {
        let code = r#"
namespace Registry {
    export const entries: string[] = [];
    export function add(entry: string) {
        Registry.entries.push(entry);
    }
}
Registry.add("boot");
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn exported_namespace_not_flagged_by_override() {
        let code = r#"
export namespace Registry {
    export const entries: string[] = [];
    export function add(entry: string) {
        Registry.entries.push(entry);
    }
}
"#;
        let diagnostics = run_rule(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn namespace_with_zero_references_uses_generic_message() {
        let diagnostics = run_rule("namespace Empty { }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'Empty' is defined but never used");
    }

    #[test]
    fn recursive_function_reference_defeats_namespace_override() {
        let code = r#"
function describe(): string {
    return describe.label;
}
namespace describe {
    export const label = "probe";
}
"#;
        let diagnostics = run_rule(code);

        // The function and the namespace merge into one binding. The
        // recursive mention sits in the function body, outside every
        // namespace body, so the override does not apply.
        assert!(
            !diagnostics.iter().any(|d| d.message.contains("describe")),
            "reference from outside the namespace body defeats the override"
        );
    }

    // === JSX ===

    #[test]
    fn jsx_component_usage_counts_as_reference() {
        let code = r#"
import Button from "./button";
export const App = () => <Button label="go" />;
"#;
        let diagnostics = run_rule_tsx(code);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unused_import_in_tsx_still_flagged() {
        let code = r#"
import Button from "./button";
export const App = () => <div />;
"#;
        let diagnostics = run_rule_tsx(code);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Button"));
    }

    #[test]
    fn metadata_is_correct() {
        let rule = NoUnusedBindings::new();
        let metadata = rule.metadata();

        assert_eq!(metadata.id, "Q001");
        assert_eq!(metadata.name, "no-unused-bindings");
        assert_eq!(metadata.category, crate::rules::RuleCategory::Quality);
        assert_eq!(metadata.severity, Severity::Warning);
    }

    #[test]
    fn suggestion_provided() {
        let diagnostics = run_rule("const x = 1;");

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].suggestion.is_some());
    }
}

//! Scope graph construction from a parsed module
//!
//! A single traversal builds the scope tree and binding table, resolves
//! identifier references against the scope chain, and records a
//! [`DeclShape`] for every declaration form the exception pass recognizes
//! (signature parameter lists, enum bodies, mapped-type binders, parameter
//! properties, `this` parameters, namespace bodies, ambient declarations).
//! References that precede their declaration in source order are
//! re-resolved in a deferred pass once the traversal has seen every
//! declaration. Shapes are recorded in document order and carry borrowed
//! AST nodes, so they are consumed before the module is dropped.

use std::collections::HashSet;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, CatchClause, Class, ClassDecl, Decl, DefaultDecl, FnDecl, ForInStmt,
    ForOfStmt, ForStmt, Function, Ident, Module, ModuleDecl, ModuleItem, ObjectPatProp, Pat, Stmt,
    SwitchStmt, TryStmt, TsEnumDecl, TsFnParam, TsInterfaceDecl, TsModuleDecl, TsNamespaceBody,
    TsTypeAliasDecl, TsTypeAnn, TsTypeParamDecl, VarDeclKind, WhileStmt,
};

use super::bindings::{
    BindingId, BindingTable, Definition, DefinitionKind, Reference, ReferenceKind,
    UnresolvedReference,
};
use super::scope::{ScopeId, ScopeKind, ScopeTree};
use crate::exceptions::DeclShape;

pub struct ScopeGraphBuilder<'ast> {
    pub scope_tree: ScopeTree,
    pub bindings: BindingTable,
    current_scope: Option<ScopeId>,
    declaration_spans: HashSet<Span>,
    unresolved_references: Vec<UnresolvedReference>,
    shapes: Vec<DeclShape<'ast>>,
    ambient_depth: u32,
}

impl Default for ScopeGraphBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// The finished scope graph. Owns no AST nodes.
pub struct SemanticModel {
    pub scope_tree: ScopeTree,
    pub bindings: BindingTable,
    pub unresolved_references: Vec<UnresolvedReference>,
}

impl<'ast> ScopeGraphBuilder<'ast> {
    pub fn new() -> Self {
        Self {
            scope_tree: ScopeTree::new(),
            bindings: BindingTable::new(),
            current_scope: None,
            declaration_spans: HashSet::new(),
            unresolved_references: Vec::new(),
            shapes: Vec::new(),
            ambient_depth: 0,
        }
    }

    pub fn build(module: &'ast Module) -> SemanticModel {
        let (model, _) = Self::build_with_shapes(module);
        model
    }

    /// Builds the graph and returns the recorded declaration shapes for
    /// the exception pass.
    pub fn build_with_shapes(module: &'ast Module) -> (SemanticModel, Vec<DeclShape<'ast>>) {
        let mut builder = Self::new();
        builder.visit_module(module);
        builder.resolve_deferred_references();
        (
            SemanticModel {
                scope_tree: builder.scope_tree,
                bindings: builder.bindings,
                unresolved_references: builder.unresolved_references,
            },
            builder.shapes,
        )
    }

    fn visit_module(&mut self, module: &'ast Module) {
        let module_scope = self
            .scope_tree
            .create_scope(ScopeKind::Module, None, module.span);
        self.current_scope = Some(module_scope);

        // Function declarations are visible before their statement, so
        // declare them in a first pass without entering their bodies.
        for item in &module.body {
            self.hoist_module_item(item);
        }

        for item in &module.body {
            self.visit_module_item(item);
        }
    }

    fn hoist_module_item(&mut self, item: &'ast ModuleItem) {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export_decl)) => {
                if let Decl::Fn(fn_decl) = &export_decl.decl {
                    self.hoist_fn_decl(fn_decl, true);
                }
            }
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(fn_decl))) => {
                self.hoist_fn_decl(fn_decl, false);
            }
            _ => {}
        }
    }

    fn hoist_fn_decl(&mut self, fn_decl: &'ast FnDecl, is_exported: bool) {
        if fn_decl.declare {
            self.ambient_depth += 1;
        }
        self.declare_binding(
            fn_decl.ident.sym.as_str(),
            DefinitionKind::Function,
            fn_decl.function.span,
            fn_decl.ident.span,
            is_exported,
        );
        if fn_decl.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_module_item(&mut self, item: &'ast ModuleItem) {
        match item {
            ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
            ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
        }
    }

    fn visit_module_decl(&mut self, decl: &'ast ModuleDecl) {
        match decl {
            ModuleDecl::ExportDecl(export_decl) => {
                self.visit_decl(&export_decl.decl, true);
            }
            ModuleDecl::ExportDefaultDecl(export_default) => match &export_default.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        self.declare_binding(
                            ident.sym.as_str(),
                            DefinitionKind::Function,
                            fn_expr.function.span,
                            ident.span,
                            true,
                        );
                    }
                    self.visit_function(&fn_expr.function, fn_expr.ident.as_ref().map(|i| i.span));
                }
                DefaultDecl::Class(class_expr) => {
                    if let Some(ident) = &class_expr.ident {
                        self.declare_binding(
                            ident.sym.as_str(),
                            DefinitionKind::Class,
                            class_expr.class.span,
                            ident.span,
                            true,
                        );
                    }
                    self.visit_class(&class_expr.class);
                }
                DefaultDecl::TsInterfaceDecl(interface) => {
                    self.visit_ts_interface(interface, true);
                }
            },
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    match specifier {
                        swc_ecma_ast::ImportSpecifier::Named(named) => {
                            self.declare_import(&named.local);
                        }
                        swc_ecma_ast::ImportSpecifier::Default(default) => {
                            self.declare_import(&default.local);
                        }
                        swc_ecma_ast::ImportSpecifier::Namespace(namespace) => {
                            self.declare_import(&namespace.local);
                        }
                    }
                }
            }
            ModuleDecl::ExportDefaultExpr(export_expr) => {
                self.visit_expr(&export_expr.expr);
            }
            ModuleDecl::ExportNamed(named_export) => {
                // `export { foo }` reads a local binding; `export { foo }
                // from 'mod'` does not.
                if named_export.src.is_none() {
                    for specifier in &named_export.specifiers {
                        if let swc_ecma_ast::ExportSpecifier::Named(named) = specifier {
                            if let swc_ecma_ast::ModuleExportName::Ident(ident) = &named.orig {
                                self.visit_ident_reference(ident);
                            }
                        }
                    }
                }
            }
            ModuleDecl::TsImportEquals(import_equals) => {
                self.declare_binding(
                    import_equals.id.sym.as_str(),
                    DefinitionKind::Import,
                    import_equals.span,
                    import_equals.id.span,
                    false,
                );
                if let swc_ecma_ast::TsModuleRef::TsEntityName(entity) = &import_equals.module_ref {
                    self.visit_ts_entity_name(entity);
                }
            }
            ModuleDecl::TsExportAssignment(export_assignment) => {
                self.visit_expr(&export_assignment.expr);
            }
            _ => {}
        }
    }

    fn declare_import(&mut self, local: &Ident) {
        self.declare_binding(
            local.sym.as_str(),
            DefinitionKind::Import,
            local.span,
            local.span,
            false,
        );
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl, false),
            Stmt::Block(block) => self.visit_block_stmt(block),
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::Throw(throw_stmt) => {
                self.visit_expr(&throw_stmt.arg);
            }
            Stmt::For(for_stmt) => self.visit_for_stmt(for_stmt),
            Stmt::ForIn(for_in) => self.visit_for_in_stmt(for_in),
            Stmt::ForOf(for_of) => self.visit_for_of_stmt(for_of),
            Stmt::While(while_stmt) => self.visit_while_stmt(while_stmt),
            Stmt::DoWhile(do_while) => {
                self.visit_stmt(&do_while.body);
                self.visit_expr(&do_while.test);
            }
            Stmt::Switch(switch_stmt) => self.visit_switch_stmt(switch_stmt),
            Stmt::Try(try_stmt) => self.visit_try_stmt(try_stmt),
            Stmt::With(with_stmt) => {
                self.visit_stmt(&with_stmt.body);
            }
            Stmt::Labeled(labeled) => {
                self.visit_stmt(&labeled.body);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Expr(expr_stmt) => {
                self.visit_expr(&expr_stmt.expr);
            }
            _ => {}
        }
    }

    fn visit_decl(&mut self, decl: &'ast Decl, is_exported: bool) {
        match decl {
            Decl::Var(var_decl) => {
                if var_decl.declare {
                    self.ambient_depth += 1;
                }
                let kind = var_definition_kind(var_decl.kind);
                for declarator in &var_decl.decls {
                    self.declare_pat(&declarator.name, kind, is_exported);
                    if let Some(init) = &declarator.init {
                        self.visit_expr(init);
                    }
                }
                if var_decl.declare {
                    self.ambient_depth -= 1;
                }
            }
            // `using` / `await using` bind like `const`.
            Decl::Using(using_decl) => {
                for declarator in &using_decl.decls {
                    self.declare_pat(&declarator.name, DefinitionKind::Const, is_exported);
                    if let Some(init) = &declarator.init {
                        self.visit_expr(init);
                    }
                }
            }
            Decl::Fn(fn_decl) => self.visit_fn_decl(fn_decl, is_exported),
            Decl::Class(class_decl) => self.visit_class_decl(class_decl, is_exported),
            Decl::TsInterface(interface) => self.visit_ts_interface(interface, is_exported),
            Decl::TsTypeAlias(alias) => self.visit_ts_type_alias(alias, is_exported),
            Decl::TsEnum(ts_enum) => self.visit_ts_enum(ts_enum, is_exported),
            Decl::TsModule(ts_module) => self.visit_ts_module_decl(ts_module, is_exported),
            _ => {}
        }
    }

    fn visit_fn_decl(&mut self, fn_decl: &'ast FnDecl, is_exported: bool) {
        if fn_decl.declare {
            self.ambient_depth += 1;
        }
        self.declare_binding(
            fn_decl.ident.sym.as_str(),
            DefinitionKind::Function,
            fn_decl.function.span,
            fn_decl.ident.span,
            is_exported,
        );
        self.visit_function(&fn_decl.function, Some(fn_decl.ident.span));
        if fn_decl.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_function(&mut self, func: &'ast Function, name_span: Option<Span>) {
        let has_body = func.body.is_some();
        let span = func
            .body
            .as_ref()
            .map(|b| b.span)
            .unwrap_or_else(|| name_span.unwrap_or(func.span));

        let parent_scope = self.current_scope;
        let func_scope = self
            .scope_tree
            .create_scope(ScopeKind::Function, parent_scope, span);
        self.current_scope = Some(func_scope);

        if let Some(type_params) = &func.type_params {
            self.declare_type_params(type_params);
        }

        // Overload signatures still declare their parameters so the
        // exception pass has bindings to exempt.
        let param_kind = if has_body {
            DefinitionKind::Param
        } else {
            DefinitionKind::SignatureParam
        };
        for param in &func.params {
            for decorator in &param.decorators {
                self.visit_expr(&decorator.expr);
            }
            self.declare_param_pat(&param.pat, param_kind);
        }

        if let Some(return_type) = &func.return_type {
            self.visit_ts_type(&return_type.type_ann);
        }

        match &func.body {
            Some(body) => {
                for stmt in &body.stmts {
                    self.visit_stmt(stmt);
                }
            }
            None => {
                self.shapes.push(DeclShape::FnSignature {
                    params: &func.params,
                    scope: func_scope,
                });
            }
        }

        self.current_scope = parent_scope;
    }

    fn visit_class_decl(&mut self, class_decl: &'ast ClassDecl, is_exported: bool) {
        if class_decl.declare {
            self.ambient_depth += 1;
        }
        self.declare_binding(
            class_decl.ident.sym.as_str(),
            DefinitionKind::Class,
            class_decl.class.span,
            class_decl.ident.span,
            is_exported,
        );
        self.visit_class(&class_decl.class);
        if class_decl.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_class(&mut self, class: &'ast Class) {
        let parent_scope = self.current_scope;

        for decorator in &class.decorators {
            self.visit_expr(&decorator.expr);
        }

        let class_scope = self
            .scope_tree
            .create_scope(ScopeKind::Class, parent_scope, class.span);
        self.current_scope = Some(class_scope);

        // Type parameters are visible in the heritage clauses, so both are
        // handled inside the class scope.
        if let Some(type_params) = &class.type_params {
            self.declare_type_params(type_params);
        }
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }
        if let Some(super_type_params) = &class.super_type_params {
            for arg in &super_type_params.params {
                self.visit_ts_type(arg);
            }
        }
        for implemented in &class.implements {
            self.visit_expr(&implemented.expr);
            if let Some(type_args) = &implemented.type_args {
                for arg in &type_args.params {
                    self.visit_ts_type(arg);
                }
            }
        }

        for member in &class.body {
            match member {
                swc_ecma_ast::ClassMember::Method(method) => {
                    self.visit_prop_name(&method.key);
                    for decorator in &method.function.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    self.visit_function(&method.function, None);
                }
                swc_ecma_ast::ClassMember::PrivateMethod(method) => {
                    for decorator in &method.function.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    self.visit_function(&method.function, None);
                }
                swc_ecma_ast::ClassMember::Constructor(ctor) => {
                    self.visit_constructor(ctor, class_scope);
                }
                swc_ecma_ast::ClassMember::ClassProp(prop) => {
                    self.visit_prop_name(&prop.key);
                    if let Some(value) = &prop.value {
                        self.visit_expr(value);
                    }
                    if let Some(type_ann) = &prop.type_ann {
                        self.visit_ts_type(&type_ann.type_ann);
                    }
                }
                swc_ecma_ast::ClassMember::PrivateProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.visit_expr(value);
                    }
                    if let Some(type_ann) = &prop.type_ann {
                        self.visit_ts_type(&type_ann.type_ann);
                    }
                }
                swc_ecma_ast::ClassMember::StaticBlock(block) => {
                    for stmt in &block.body.stmts {
                        self.visit_stmt(stmt);
                    }
                }
                _ => {}
            }
        }

        self.current_scope = parent_scope;
    }

    fn visit_constructor(&mut self, ctor: &'ast swc_ecma_ast::Constructor, class_scope: ScopeId) {
        let ctor_scope =
            self.scope_tree
                .create_scope(ScopeKind::Function, Some(class_scope), ctor.span);
        self.current_scope = Some(ctor_scope);

        for param in &ctor.params {
            match param {
                swc_ecma_ast::ParamOrTsParamProp::Param(p) => {
                    for decorator in &p.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    self.declare_param_pat(&p.pat, DefinitionKind::Param);
                }
                swc_ecma_ast::ParamOrTsParamProp::TsParamProp(ts_param) => {
                    for decorator in &ts_param.decorators {
                        self.visit_expr(&decorator.expr);
                    }
                    match &ts_param.param {
                        swc_ecma_ast::TsParamPropParam::Ident(binding_ident) => {
                            self.declare_binding(
                                binding_ident.id.sym.as_str(),
                                DefinitionKind::ParamProperty,
                                binding_ident.id.span,
                                binding_ident.id.span,
                                false,
                            );
                            if let Some(type_ann) = &binding_ident.type_ann {
                                self.visit_ts_type(&type_ann.type_ann);
                            }
                        }
                        swc_ecma_ast::TsParamPropParam::Assign(assign_pat) => {
                            self.declare_pat(
                                &assign_pat.left,
                                DefinitionKind::ParamProperty,
                                false,
                            );
                            self.visit_expr(&assign_pat.right);
                        }
                    }
                    self.shapes.push(DeclShape::ParamProperty {
                        param: &ts_param.param,
                        scope: ctor_scope,
                    });
                }
            }
        }

        if let Some(body) = &ctor.body {
            for stmt in &body.stmts {
                self.visit_stmt(stmt);
            }
        }

        self.current_scope = Some(class_scope);
    }

    fn visit_ts_interface(&mut self, interface: &'ast TsInterfaceDecl, is_exported: bool) {
        if interface.declare {
            self.ambient_depth += 1;
        }
        self.declare_binding(
            interface.id.sym.as_str(),
            DefinitionKind::Interface,
            interface.span,
            interface.id.span,
            is_exported,
        );

        let parent_scope = self.current_scope;
        if let Some(type_params) = &interface.type_params {
            let type_scope =
                self.scope_tree
                    .create_scope(ScopeKind::Type, parent_scope, interface.span);
            self.current_scope = Some(type_scope);
            self.declare_type_params(type_params);
        }

        for extends in &interface.extends {
            self.visit_expr(&extends.expr);
            if let Some(type_args) = &extends.type_args {
                for arg in &type_args.params {
                    self.visit_ts_type(arg);
                }
            }
        }
        for member in &interface.body.body {
            self.visit_ts_type_element(member);
        }

        self.current_scope = parent_scope;
        if interface.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_ts_type_alias(&mut self, alias: &'ast TsTypeAliasDecl, is_exported: bool) {
        if alias.declare {
            self.ambient_depth += 1;
        }
        self.declare_binding(
            alias.id.sym.as_str(),
            DefinitionKind::TypeAlias,
            alias.span,
            alias.id.span,
            is_exported,
        );

        let parent_scope = self.current_scope;
        if let Some(type_params) = &alias.type_params {
            let type_scope = self
                .scope_tree
                .create_scope(ScopeKind::Type, parent_scope, alias.span);
            self.current_scope = Some(type_scope);
            self.declare_type_params(type_params);
        }
        self.visit_ts_type(&alias.type_ann);

        self.current_scope = parent_scope;
        if alias.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_ts_enum(&mut self, ts_enum: &'ast TsEnumDecl, is_exported: bool) {
        if ts_enum.declare {
            self.ambient_depth += 1;
        }
        self.declare_binding(
            ts_enum.id.sym.as_str(),
            DefinitionKind::Enum,
            ts_enum.span,
            ts_enum.id.span,
            is_exported,
        );

        let parent_scope = self.current_scope;
        let enum_scope = self
            .scope_tree
            .create_scope(ScopeKind::Enum, parent_scope, ts_enum.span);
        self.current_scope = Some(enum_scope);

        for member in &ts_enum.members {
            if let swc_ecma_ast::TsEnumMemberId::Ident(ident) = &member.id {
                self.declare_binding(
                    ident.sym.as_str(),
                    DefinitionKind::EnumMember,
                    member.span,
                    ident.span,
                    false,
                );
            }
            if let Some(init) = &member.init {
                self.visit_expr(init);
            }
        }
        self.shapes.push(DeclShape::EnumContainer { scope: enum_scope });

        self.current_scope = parent_scope;
        if ts_enum.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_ts_module_decl(&mut self, module_decl: &'ast TsModuleDecl, is_exported: bool) {
        if module_decl.declare {
            self.ambient_depth += 1;
        }

        // String-named modules and `declare global` blocks bind no lexical
        // name; only identifier-named namespaces do. The definition span is
        // the whole declaration node, which the body scope also carries.
        if !module_decl.global {
            if let swc_ecma_ast::TsModuleName::Ident(ident) = &module_decl.id {
                self.declare_binding(
                    ident.sym.as_str(),
                    DefinitionKind::Namespace,
                    module_decl.span,
                    ident.span,
                    is_exported,
                );
            }
        }

        let parent_scope = self.current_scope;
        let namespace_scope =
            self.scope_tree
                .create_scope(ScopeKind::Namespace, parent_scope, module_decl.span);
        self.current_scope = Some(namespace_scope);
        self.shapes.push(DeclShape::NamespaceBody {
            scope: namespace_scope,
        });

        if let Some(body) = &module_decl.body {
            self.visit_ts_namespace_body(body);
        }

        self.current_scope = parent_scope;
        if module_decl.declare {
            self.ambient_depth -= 1;
        }
    }

    fn visit_ts_namespace_body(&mut self, body: &'ast TsNamespaceBody) {
        match body {
            TsNamespaceBody::TsModuleBlock(block) => {
                for item in &block.body {
                    self.hoist_module_item(item);
                }
                for item in &block.body {
                    self.visit_module_item(item);
                }
            }
            TsNamespaceBody::TsNamespaceDecl(ns_decl) => {
                // `namespace A.B {}` nests B inside A; B is implicitly
                // exported from A.
                self.declare_binding(
                    ns_decl.id.sym.as_str(),
                    DefinitionKind::Namespace,
                    ns_decl.span,
                    ns_decl.id.span,
                    true,
                );
                let parent_scope = self.current_scope;
                let nested_scope =
                    self.scope_tree
                        .create_scope(ScopeKind::Namespace, parent_scope, ns_decl.span);
                self.current_scope = Some(nested_scope);
                self.shapes.push(DeclShape::NamespaceBody {
                    scope: nested_scope,
                });
                self.visit_ts_namespace_body(&ns_decl.body);
                self.current_scope = parent_scope;
            }
        }
    }

    fn visit_block_stmt(&mut self, block: &'ast BlockStmt) {
        let parent_scope = self.current_scope;
        let block_scope = self
            .scope_tree
            .create_scope(ScopeKind::Block, parent_scope, block.span);
        self.current_scope = Some(block_scope);

        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }

        self.current_scope = parent_scope;
    }

    fn visit_for_stmt(&mut self, for_stmt: &'ast ForStmt) {
        let parent_scope = self.current_scope;
        let for_scope = self
            .scope_tree
            .create_scope(ScopeKind::For, parent_scope, for_stmt.span);
        self.current_scope = Some(for_scope);

        if let Some(init) = &for_stmt.init {
            match init {
                swc_ecma_ast::VarDeclOrExpr::VarDecl(var_decl) => {
                    let kind = var_definition_kind(var_decl.kind);
                    for declarator in &var_decl.decls {
                        self.declare_pat(&declarator.name, kind, false);
                        if let Some(init) = &declarator.init {
                            self.visit_expr(init);
                        }
                    }
                }
                swc_ecma_ast::VarDeclOrExpr::Expr(expr) => {
                    self.visit_expr(expr);
                }
            }
        }

        if let Some(test) = &for_stmt.test {
            self.visit_expr(test);
        }
        if let Some(update) = &for_stmt.update {
            self.visit_expr(update);
        }

        self.visit_stmt(&for_stmt.body);
        self.current_scope = parent_scope;
    }

    fn visit_for_in_stmt(&mut self, for_in: &'ast ForInStmt) {
        let parent_scope = self.current_scope;
        let for_scope = self
            .scope_tree
            .create_scope(ScopeKind::For, parent_scope, for_in.span);
        self.current_scope = Some(for_scope);

        self.visit_for_head(&for_in.left);
        self.visit_expr(&for_in.right);
        self.visit_stmt(&for_in.body);
        self.current_scope = parent_scope;
    }

    fn visit_for_of_stmt(&mut self, for_of: &'ast ForOfStmt) {
        let parent_scope = self.current_scope;
        let for_scope = self
            .scope_tree
            .create_scope(ScopeKind::For, parent_scope, for_of.span);
        self.current_scope = Some(for_scope);

        self.visit_for_head(&for_of.left);
        self.visit_expr(&for_of.right);
        self.visit_stmt(&for_of.body);
        self.current_scope = parent_scope;
    }

    /// Loop heads either declare fresh bindings (`for (const x of ...)`)
    /// or assign into existing ones (`for (x of ...)`, `for ([a, b] of ...)`).
    fn visit_for_head(&mut self, head: &'ast swc_ecma_ast::ForHead) {
        match head {
            swc_ecma_ast::ForHead::VarDecl(var_decl) => {
                let kind = var_definition_kind(var_decl.kind);
                for declarator in &var_decl.decls {
                    self.declare_pat(&declarator.name, kind, false);
                }
            }
            swc_ecma_ast::ForHead::UsingDecl(using_decl) => {
                for declarator in &using_decl.decls {
                    self.declare_pat(&declarator.name, DefinitionKind::Const, false);
                }
            }
            swc_ecma_ast::ForHead::Pat(pat) => self.visit_pat_write(pat),
        }
    }

    fn visit_while_stmt(&mut self, while_stmt: &'ast WhileStmt) {
        let parent_scope = self.current_scope;
        let while_scope =
            self.scope_tree
                .create_scope(ScopeKind::While, parent_scope, while_stmt.span);
        self.current_scope = Some(while_scope);

        self.visit_expr(&while_stmt.test);
        self.visit_stmt(&while_stmt.body);
        self.current_scope = parent_scope;
    }

    fn visit_switch_stmt(&mut self, switch_stmt: &'ast SwitchStmt) {
        let parent_scope = self.current_scope;
        let switch_scope =
            self.scope_tree
                .create_scope(ScopeKind::Switch, parent_scope, switch_stmt.span);
        self.current_scope = Some(switch_scope);

        self.visit_expr(&switch_stmt.discriminant);

        for case in &switch_stmt.cases {
            if let Some(test) = &case.test {
                self.visit_expr(test);
            }
            for stmt in &case.cons {
                self.visit_stmt(stmt);
            }
        }

        self.current_scope = parent_scope;
    }

    fn visit_try_stmt(&mut self, try_stmt: &'ast TryStmt) {
        let parent_scope = self.current_scope;
        let try_scope =
            self.scope_tree
                .create_scope(ScopeKind::Try, parent_scope, try_stmt.block.span);
        self.current_scope = Some(try_scope);

        for stmt in &try_stmt.block.stmts {
            self.visit_stmt(stmt);
        }

        self.current_scope = parent_scope;

        if let Some(catch) = &try_stmt.handler {
            self.visit_catch_clause(catch);
        }

        if let Some(finalizer) = &try_stmt.finalizer {
            let finally_scope =
                self.scope_tree
                    .create_scope(ScopeKind::Block, parent_scope, finalizer.span);
            self.current_scope = Some(finally_scope);

            for stmt in &finalizer.stmts {
                self.visit_stmt(stmt);
            }

            self.current_scope = parent_scope;
        }
    }

    fn visit_catch_clause(&mut self, catch: &'ast CatchClause) {
        let parent_scope = self.current_scope;
        let catch_scope = self
            .scope_tree
            .create_scope(ScopeKind::Catch, parent_scope, catch.span);
        self.current_scope = Some(catch_scope);

        if let Some(param) = &catch.param {
            self.declare_pat(param, DefinitionKind::CatchParam, false);
        }

        for stmt in &catch.body.stmts {
            self.visit_stmt(stmt);
        }

        self.current_scope = parent_scope;
    }

    fn visit_expr(&mut self, expr: &'ast swc_ecma_ast::Expr) {
        match expr {
            swc_ecma_ast::Expr::Ident(ident) => {
                self.visit_ident_reference(ident);
            }
            swc_ecma_ast::Expr::Arrow(arrow) => self.visit_arrow_expr(arrow),
            swc_ecma_ast::Expr::Fn(fn_expr) => {
                // A function expression's name is only visible inside its
                // own body; it is not a declaration in the outer scope.
                self.visit_function(&fn_expr.function, fn_expr.ident.as_ref().map(|i| i.span));
            }
            swc_ecma_ast::Expr::Class(class_expr) => {
                self.visit_class(&class_expr.class);
            }
            swc_ecma_ast::Expr::Call(call) => {
                if let Some(callee_expr) = call.callee.as_expr() {
                    self.visit_expr(callee_expr);
                }
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
                if let Some(type_args) = &call.type_args {
                    for arg in &type_args.params {
                        self.visit_ts_type(arg);
                    }
                }
            }
            swc_ecma_ast::Expr::New(new_expr) => {
                self.visit_expr(&new_expr.callee);
                if let Some(args) = &new_expr.args {
                    for arg in args {
                        self.visit_expr(&arg.expr);
                    }
                }
                if let Some(type_args) = &new_expr.type_args {
                    for arg in &type_args.params {
                        self.visit_ts_type(arg);
                    }
                }
            }
            swc_ecma_ast::Expr::Member(member) => {
                self.visit_expr(&member.obj);
                if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            swc_ecma_ast::Expr::Array(arr) => {
                for elem in arr.elems.iter().flatten() {
                    self.visit_expr(&elem.expr);
                }
            }
            swc_ecma_ast::Expr::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        swc_ecma_ast::PropOrSpread::Spread(spread) => {
                            self.visit_expr(&spread.expr);
                        }
                        swc_ecma_ast::PropOrSpread::Prop(prop) => match prop.as_ref() {
                            swc_ecma_ast::Prop::Shorthand(ident) => {
                                self.visit_ident_reference(ident);
                            }
                            swc_ecma_ast::Prop::Method(method) => {
                                self.visit_prop_name(&method.key);
                                self.visit_function(&method.function, None);
                            }
                            swc_ecma_ast::Prop::KeyValue(kv) => {
                                self.visit_prop_name(&kv.key);
                                self.visit_expr(&kv.value);
                            }
                            swc_ecma_ast::Prop::Getter(getter) => {
                                self.visit_prop_name(&getter.key);
                                if let Some(body) = &getter.body {
                                    let parent = self.current_scope;
                                    let scope = self.scope_tree.create_scope(
                                        ScopeKind::Function,
                                        parent,
                                        body.span,
                                    );
                                    self.current_scope = Some(scope);
                                    for stmt in &body.stmts {
                                        self.visit_stmt(stmt);
                                    }
                                    self.current_scope = parent;
                                }
                            }
                            swc_ecma_ast::Prop::Setter(setter) => {
                                self.visit_prop_name(&setter.key);
                                if let Some(body) = &setter.body {
                                    let parent = self.current_scope;
                                    let scope = self.scope_tree.create_scope(
                                        ScopeKind::Function,
                                        parent,
                                        body.span,
                                    );
                                    self.current_scope = Some(scope);
                                    self.declare_param_pat(&setter.param, DefinitionKind::Param);
                                    for stmt in &body.stmts {
                                        self.visit_stmt(stmt);
                                    }
                                    self.current_scope = parent;
                                }
                            }
                            swc_ecma_ast::Prop::Assign(assign) => {
                                self.visit_expr(&assign.value);
                            }
                        },
                    }
                }
            }
            swc_ecma_ast::Expr::Assign(assign) => {
                if let swc_ecma_ast::AssignTarget::Simple(
                    swc_ecma_ast::SimpleAssignTarget::Ident(ident),
                ) = &assign.left
                {
                    self.record_reference(&ident.id, ReferenceKind::Write);
                } else {
                    self.visit_assign_target(&assign.left);
                }
                self.visit_expr(&assign.right);
            }
            swc_ecma_ast::Expr::Bin(bin) => {
                self.visit_expr(&bin.left);
                self.visit_expr(&bin.right);
            }
            swc_ecma_ast::Expr::Unary(unary) => {
                self.visit_expr(&unary.arg);
            }
            swc_ecma_ast::Expr::Update(update) => {
                if let swc_ecma_ast::Expr::Ident(ident) = &*update.arg {
                    self.record_reference(ident, ReferenceKind::Write);
                } else {
                    self.visit_expr(&update.arg);
                }
            }
            swc_ecma_ast::Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                self.visit_expr(&cond.cons);
                self.visit_expr(&cond.alt);
            }
            swc_ecma_ast::Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr);
                }
            }
            swc_ecma_ast::Expr::Paren(paren) => {
                self.visit_expr(&paren.expr);
            }
            swc_ecma_ast::Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            swc_ecma_ast::Expr::TaggedTpl(tagged) => {
                self.visit_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            swc_ecma_ast::Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
            }
            swc_ecma_ast::Expr::Await(await_expr) => {
                self.visit_expr(&await_expr.arg);
            }
            swc_ecma_ast::Expr::OptChain(opt_chain) => {
                self.visit_opt_chain_base(&opt_chain.base);
            }
            swc_ecma_ast::Expr::TsAs(ts_as) => {
                self.visit_expr(&ts_as.expr);
                self.visit_ts_type(&ts_as.type_ann);
            }
            swc_ecma_ast::Expr::TsTypeAssertion(assertion) => {
                self.visit_expr(&assertion.expr);
                self.visit_ts_type(&assertion.type_ann);
            }
            swc_ecma_ast::Expr::TsNonNull(non_null) => {
                self.visit_expr(&non_null.expr);
            }
            swc_ecma_ast::Expr::TsSatisfies(satisfies) => {
                self.visit_expr(&satisfies.expr);
                self.visit_ts_type(&satisfies.type_ann);
            }
            swc_ecma_ast::Expr::TsInstantiation(inst) => {
                self.visit_expr(&inst.expr);
                for arg in &inst.type_args.params {
                    self.visit_ts_type(arg);
                }
            }
            swc_ecma_ast::Expr::TsConstAssertion(const_assert) => {
                self.visit_expr(&const_assert.expr);
            }
            swc_ecma_ast::Expr::JSXElement(element) => {
                self.visit_jsx_element(element);
            }
            swc_ecma_ast::Expr::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_element_child(child);
                }
            }
            _ => {}
        }
    }

    fn visit_assign_target(&mut self, target: &'ast swc_ecma_ast::AssignTarget) {
        match target {
            swc_ecma_ast::AssignTarget::Simple(simple) => match simple {
                swc_ecma_ast::SimpleAssignTarget::Ident(ident) => {
                    self.record_reference(&ident.id, ReferenceKind::Write);
                }
                swc_ecma_ast::SimpleAssignTarget::Member(member) => {
                    self.visit_expr(&member.obj);
                    if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                        self.visit_expr(&computed.expr);
                    }
                }
                swc_ecma_ast::SimpleAssignTarget::OptChain(opt) => {
                    self.visit_opt_chain_base(&opt.base);
                }
                _ => {}
            },
            swc_ecma_ast::AssignTarget::Pat(pat) => match pat {
                swc_ecma_ast::AssignTargetPat::Array(array_pat) => {
                    for elem in array_pat.elems.iter().flatten() {
                        self.visit_pat_write(elem);
                    }
                }
                swc_ecma_ast::AssignTargetPat::Object(object_pat) => {
                    self.visit_object_pat_write(object_pat);
                }
                swc_ecma_ast::AssignTargetPat::Invalid(_) => {}
            },
        }
    }

    /// Records a write for every leaf identifier of a destructuring
    /// assignment target. Default values and computed keys inside the
    /// pattern are ordinary reads.
    fn visit_pat_write(&mut self, pat: &'ast Pat) {
        match pat {
            Pat::Ident(binding_ident) => {
                self.record_reference(&binding_ident.id, ReferenceKind::Write);
            }
            Pat::Array(array_pat) => {
                for elem in array_pat.elems.iter().flatten() {
                    self.visit_pat_write(elem);
                }
            }
            Pat::Object(object_pat) => self.visit_object_pat_write(object_pat),
            Pat::Rest(rest_pat) => self.visit_pat_write(&rest_pat.arg),
            Pat::Assign(assign_pat) => {
                self.visit_pat_write(&assign_pat.left);
                self.visit_expr(&assign_pat.right);
            }
            // Member-expression element (`[obj.prop] = x`): the base
            // object is read.
            Pat::Expr(expr) => self.visit_expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn visit_object_pat_write(&mut self, object_pat: &'ast swc_ecma_ast::ObjectPat) {
        for prop in &object_pat.props {
            match prop {
                ObjectPatProp::KeyValue(kv) => {
                    if let swc_ecma_ast::PropName::Computed(computed) = &kv.key {
                        self.visit_expr(&computed.expr);
                    }
                    self.visit_pat_write(&kv.value);
                }
                ObjectPatProp::Assign(assign) => {
                    self.record_reference(&assign.key.id, ReferenceKind::Write);
                    if let Some(value) = &assign.value {
                        self.visit_expr(value);
                    }
                }
                ObjectPatProp::Rest(rest) => self.visit_pat_write(&rest.arg),
            }
        }
    }

    fn visit_opt_chain_base(&mut self, base: &'ast swc_ecma_ast::OptChainBase) {
        match base {
            swc_ecma_ast::OptChainBase::Member(member) => {
                self.visit_expr(&member.obj);
                if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            swc_ecma_ast::OptChainBase::Call(call) => {
                self.visit_expr(&call.callee);
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
            }
        }
    }

    fn visit_arrow_expr(&mut self, arrow: &'ast ArrowExpr) {
        let span = match &*arrow.body {
            swc_ecma_ast::BlockStmtOrExpr::BlockStmt(block) => block.span,
            swc_ecma_ast::BlockStmtOrExpr::Expr(expr) => expr.span(),
        };

        let parent_scope = self.current_scope;
        let arrow_scope =
            self.scope_tree
                .create_scope(ScopeKind::ArrowFunction, parent_scope, span);
        self.current_scope = Some(arrow_scope);

        if let Some(type_params) = &arrow.type_params {
            self.declare_type_params(type_params);
        }
        for param in &arrow.params {
            self.declare_param_pat(param, DefinitionKind::Param);
        }
        if let Some(return_type) = &arrow.return_type {
            self.visit_ts_type(&return_type.type_ann);
        }

        match &*arrow.body {
            swc_ecma_ast::BlockStmtOrExpr::BlockStmt(block) => {
                for stmt in &block.stmts {
                    self.visit_stmt(stmt);
                }
            }
            swc_ecma_ast::BlockStmtOrExpr::Expr(expr) => {
                self.visit_expr(expr);
            }
        }

        self.current_scope = parent_scope;
    }

    fn visit_jsx_element(&mut self, element: &'ast swc_ecma_ast::JSXElement) {
        self.visit_jsx_opening_element(&element.opening);
        for child in &element.children {
            self.visit_jsx_element_child(child);
        }
    }

    fn visit_jsx_opening_element(&mut self, opening: &'ast swc_ecma_ast::JSXOpeningElement) {
        match &opening.name {
            swc_ecma_ast::JSXElementName::Ident(ident) => {
                // Uppercase names are component references; lowercase ones
                // are intrinsic elements.
                if ident.sym.chars().next().is_some_and(|c| c.is_uppercase()) {
                    self.visit_ident_reference(ident);
                }
            }
            swc_ecma_ast::JSXElementName::JSXMemberExpr(member) => {
                self.visit_jsx_member_expr(member);
            }
            swc_ecma_ast::JSXElementName::JSXNamespacedName(_) => {}
        }

        for attr in &opening.attrs {
            match attr {
                swc_ecma_ast::JSXAttrOrSpread::JSXAttr(attr) => {
                    if let Some(value) = &attr.value {
                        self.visit_jsx_attr_value(value);
                    }
                }
                swc_ecma_ast::JSXAttrOrSpread::SpreadElement(spread) => {
                    self.visit_expr(&spread.expr);
                }
            }
        }

        if let Some(type_args) = &opening.type_args {
            for arg in &type_args.params {
                self.visit_ts_type(arg);
            }
        }
    }

    fn visit_jsx_member_expr(&mut self, member: &'ast swc_ecma_ast::JSXMemberExpr) {
        match &member.obj {
            swc_ecma_ast::JSXObject::Ident(ident) => {
                self.visit_ident_reference(ident);
            }
            swc_ecma_ast::JSXObject::JSXMemberExpr(nested) => {
                self.visit_jsx_member_expr(nested);
            }
        }
    }

    fn visit_jsx_attr_value(&mut self, value: &'ast swc_ecma_ast::JSXAttrValue) {
        match value {
            swc_ecma_ast::JSXAttrValue::Lit(_) => {}
            swc_ecma_ast::JSXAttrValue::JSXExprContainer(container) => {
                self.visit_jsx_expr(&container.expr);
            }
            swc_ecma_ast::JSXAttrValue::JSXElement(element) => {
                self.visit_jsx_element(element);
            }
            swc_ecma_ast::JSXAttrValue::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_element_child(child);
                }
            }
        }
    }

    fn visit_jsx_element_child(&mut self, child: &'ast swc_ecma_ast::JSXElementChild) {
        match child {
            swc_ecma_ast::JSXElementChild::JSXText(_) => {}
            swc_ecma_ast::JSXElementChild::JSXExprContainer(container) => {
                self.visit_jsx_expr(&container.expr);
            }
            swc_ecma_ast::JSXElementChild::JSXSpreadChild(spread) => {
                self.visit_expr(&spread.expr);
            }
            swc_ecma_ast::JSXElementChild::JSXElement(element) => {
                self.visit_jsx_element(element);
            }
            swc_ecma_ast::JSXElementChild::JSXFragment(fragment) => {
                for child in &fragment.children {
                    self.visit_jsx_element_child(child);
                }
            }
        }
    }

    fn visit_jsx_expr(&mut self, expr: &'ast swc_ecma_ast::JSXExpr) {
        match expr {
            swc_ecma_ast::JSXExpr::JSXEmptyExpr(_) => {}
            swc_ecma_ast::JSXExpr::Expr(e) => {
                self.visit_expr(e);
            }
        }
    }

    /// Declares a function parameter pattern, routing a literal `this`
    /// parameter to its own definition kind and shape.
    fn declare_param_pat(&mut self, pat: &'ast Pat, kind: DefinitionKind) {
        if let Pat::Ident(binding_ident) = pat {
            if binding_ident.id.sym.as_str() == "this" {
                self.declare_binding(
                    "this",
                    DefinitionKind::ThisParam,
                    binding_ident.id.span,
                    binding_ident.id.span,
                    false,
                );
                let scope = self.current_scope.expect("no current scope");
                self.shapes.push(DeclShape::ThisParam { scope });
                if let Some(type_ann) = &binding_ident.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
                return;
            }
        }
        self.declare_pat(pat, kind, false);
    }

    fn declare_pat(&mut self, pat: &'ast Pat, kind: DefinitionKind, is_exported: bool) {
        match pat {
            Pat::Ident(binding_ident) => {
                self.declare_binding(
                    binding_ident.id.sym.as_str(),
                    kind,
                    binding_ident.id.span,
                    binding_ident.id.span,
                    is_exported,
                );
                if let Some(type_ann) = &binding_ident.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Array(array_pat) => {
                for elem in array_pat.elems.iter().flatten() {
                    self.declare_pat(elem, kind, is_exported);
                }
                if let Some(type_ann) = &array_pat.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Object(object_pat) => {
                for prop in &object_pat.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.declare_pat(&kv.value, kind, is_exported);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.declare_binding(
                                assign.key.sym.as_str(),
                                kind,
                                assign.key.span,
                                assign.key.span,
                                is_exported,
                            );
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => {
                            self.declare_pat(&rest.arg, kind, is_exported);
                        }
                    }
                }
                if let Some(type_ann) = &object_pat.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Rest(rest_pat) => {
                self.declare_pat(&rest_pat.arg, kind, is_exported);
                if let Some(type_ann) = &rest_pat.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            Pat::Assign(assign_pat) => {
                self.declare_pat(&assign_pat.left, kind, is_exported);
                self.visit_expr(&assign_pat.right);
            }
            Pat::Invalid(_) | Pat::Expr(_) => {}
        }
    }

    /// Declares the leaves of a type-level signature parameter.
    fn declare_fn_param(&mut self, param: &'ast TsFnParam) {
        match param {
            TsFnParam::Ident(binding_ident) => {
                self.declare_binding(
                    binding_ident.id.sym.as_str(),
                    DefinitionKind::SignatureParam,
                    binding_ident.id.span,
                    binding_ident.id.span,
                    false,
                );
                if let Some(type_ann) = &binding_ident.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsFnParam::Array(array_pat) => {
                for elem in array_pat.elems.iter().flatten() {
                    self.declare_pat(elem, DefinitionKind::SignatureParam, false);
                }
                if let Some(type_ann) = &array_pat.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsFnParam::Object(object_pat) => {
                for prop in &object_pat.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.declare_pat(&kv.value, DefinitionKind::SignatureParam, false);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.declare_binding(
                                assign.key.sym.as_str(),
                                DefinitionKind::SignatureParam,
                                assign.key.span,
                                assign.key.span,
                                false,
                            );
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => {
                            self.declare_pat(&rest.arg, DefinitionKind::SignatureParam, false);
                        }
                    }
                }
                if let Some(type_ann) = &object_pat.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            TsFnParam::Rest(rest_pat) => {
                self.declare_pat(&rest_pat.arg, DefinitionKind::SignatureParam, false);
                if let Some(type_ann) = &rest_pat.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
        }
    }

    fn declare_binding(
        &mut self,
        name: &str,
        kind: DefinitionKind,
        span: Span,
        name_span: Span,
        is_exported: bool,
    ) -> Option<BindingId> {
        // Skip if already declared, e.g. from the hoisting pass.
        if self.declaration_spans.contains(&name_span) {
            return None;
        }

        let current = self.current_scope.expect("no current scope");
        let scope = if kind == DefinitionKind::Var {
            self.scope_tree.hoisting_scope(current)
        } else {
            current
        };

        self.declaration_spans.insert(name_span);
        let id = self.bindings.declare(
            name,
            scope,
            Definition {
                kind,
                span,
                name_span,
            },
            is_exported,
        );

        if self.ambient_depth > 0 {
            self.shapes.push(DeclShape::AmbientDecl {
                binding: id,
                scope: current,
            });
        }

        Some(id)
    }

    /// Computed member keys (`[name]() {}`, `[name] = 1`) evaluate an
    /// expression; identifier and string keys bind nothing.
    fn visit_prop_name(&mut self, key: &'ast swc_ecma_ast::PropName) {
        if let swc_ecma_ast::PropName::Computed(computed) = key {
            self.visit_expr(&computed.expr);
        }
    }

    fn visit_ident_reference(&mut self, ident: &Ident) {
        self.record_reference(ident, ReferenceKind::Read);
    }

    fn record_reference(&mut self, ident: &Ident, kind: ReferenceKind) {
        if self.declaration_spans.contains(&ident.span) {
            return;
        }

        let current_scope = self.current_scope.expect("no current scope");
        let name = ident.sym.as_str();

        if let Some(binding_id) = self.bindings.lookup(name, current_scope, &self.scope_tree) {
            self.bindings.add_reference(
                binding_id,
                Reference {
                    span: ident.span,
                    from: current_scope,
                    kind,
                },
            );
        } else {
            self.unresolved_references.push(UnresolvedReference {
                name: name.to_string(),
                span: ident.span,
                scope: current_scope,
                kind,
            });
        }
    }

    /// Second resolution pass for references that precede their
    /// declaration in source order (a function body using a later
    /// `const`, a return type naming a later interface). Once the
    /// traversal is done every declaration exists, so each pending
    /// name gets one more lookup from its origin scope; names still
    /// unbound after this are genuinely unresolved.
    fn resolve_deferred_references(&mut self) {
        let pending = std::mem::take(&mut self.unresolved_references);
        for unresolved in pending {
            match self
                .bindings
                .lookup(&unresolved.name, unresolved.scope, &self.scope_tree)
            {
                Some(binding_id) => self.bindings.add_reference(
                    binding_id,
                    Reference {
                        span: unresolved.span,
                        from: unresolved.scope,
                        kind: unresolved.kind,
                    },
                ),
                None => self.unresolved_references.push(unresolved),
            }
        }
    }

    fn declare_type_params(&mut self, decl: &'ast TsTypeParamDecl) {
        for param in &decl.params {
            self.declare_binding(
                param.name.sym.as_str(),
                DefinitionKind::TypeParam,
                param.name.span,
                param.name.span,
                false,
            );
            if let Some(constraint) = &param.constraint {
                self.visit_ts_type(constraint);
            }
            if let Some(default) = &param.default {
                self.visit_ts_type(default);
            }
        }
    }

    /// Scope and declarations for a type-level signature. The parameters
    /// live in their own function scope so the return type can mention
    /// them.
    fn visit_fn_signature(
        &mut self,
        type_params: Option<&'ast TsTypeParamDecl>,
        params: &'ast [TsFnParam],
        return_type: Option<&'ast TsTypeAnn>,
        span: Span,
    ) {
        let parent_scope = self.current_scope;
        let scope = self
            .scope_tree
            .create_scope(ScopeKind::Function, parent_scope, span);
        self.current_scope = Some(scope);

        if let Some(type_params) = type_params {
            self.declare_type_params(type_params);
        }
        for param in params {
            self.declare_fn_param(param);
        }
        if let Some(return_type) = return_type {
            self.visit_ts_type(&return_type.type_ann);
        }
        self.shapes
            .push(DeclShape::TypeMemberSignature { params, scope });

        self.current_scope = parent_scope;
    }

    fn visit_ts_type(&mut self, ts_type: &'ast swc_ecma_ast::TsType) {
        match ts_type {
            swc_ecma_ast::TsType::TsTypeRef(type_ref) => {
                self.visit_ts_entity_name(&type_ref.type_name);
                if let Some(type_params) = &type_ref.type_params {
                    for param in &type_params.params {
                        self.visit_ts_type(param);
                    }
                }
            }
            swc_ecma_ast::TsType::TsArrayType(arr) => {
                self.visit_ts_type(&arr.elem_type);
            }
            swc_ecma_ast::TsType::TsTupleType(tuple) => {
                for elem in &tuple.elem_types {
                    self.visit_ts_type(&elem.ty);
                }
            }
            swc_ecma_ast::TsType::TsUnionOrIntersectionType(union_or_intersection) => {
                match union_or_intersection {
                    swc_ecma_ast::TsUnionOrIntersectionType::TsUnionType(union) => {
                        for ty in &union.types {
                            self.visit_ts_type(ty);
                        }
                    }
                    swc_ecma_ast::TsUnionOrIntersectionType::TsIntersectionType(intersection) => {
                        for ty in &intersection.types {
                            self.visit_ts_type(ty);
                        }
                    }
                }
            }
            swc_ecma_ast::TsType::TsParenthesizedType(paren) => {
                self.visit_ts_type(&paren.type_ann);
            }
            swc_ecma_ast::TsType::TsOptionalType(opt) => {
                self.visit_ts_type(&opt.type_ann);
            }
            swc_ecma_ast::TsType::TsRestType(rest) => {
                self.visit_ts_type(&rest.type_ann);
            }
            swc_ecma_ast::TsType::TsConditionalType(cond) => {
                self.visit_ts_type(&cond.check_type);
                self.visit_ts_type(&cond.extends_type);
                self.visit_ts_type(&cond.true_type);
                self.visit_ts_type(&cond.false_type);
            }
            swc_ecma_ast::TsType::TsMappedType(mapped) => {
                // The key binder gets its own scope; both the constraint
                // and the value type are visited inside it so they can
                // mention the key.
                let parent_scope = self.current_scope;
                let type_scope =
                    self.scope_tree
                        .create_scope(ScopeKind::Type, parent_scope, mapped.span);
                self.current_scope = Some(type_scope);

                self.declare_binding(
                    mapped.type_param.name.sym.as_str(),
                    DefinitionKind::MappedTypeParam,
                    mapped.type_param.name.span,
                    mapped.type_param.name.span,
                    false,
                );
                self.shapes
                    .push(DeclShape::MappedTypeBinder { scope: type_scope });

                if let Some(constraint) = &mapped.type_param.constraint {
                    self.visit_ts_type(constraint);
                }
                if let Some(name_type) = &mapped.name_type {
                    self.visit_ts_type(name_type);
                }
                if let Some(type_ann) = &mapped.type_ann {
                    self.visit_ts_type(type_ann);
                }

                self.current_scope = parent_scope;
            }
            swc_ecma_ast::TsType::TsTypeLit(type_lit) => {
                for member in &type_lit.members {
                    self.visit_ts_type_element(member);
                }
            }
            swc_ecma_ast::TsType::TsFnOrConstructorType(fn_or_ctor) => match fn_or_ctor {
                swc_ecma_ast::TsFnOrConstructorType::TsFnType(fn_type) => {
                    self.visit_fn_signature(
                        fn_type.type_params.as_deref(),
                        &fn_type.params,
                        Some(&fn_type.type_ann),
                        fn_type.span,
                    );
                }
                swc_ecma_ast::TsFnOrConstructorType::TsConstructorType(ctor_type) => {
                    self.visit_fn_signature(
                        ctor_type.type_params.as_deref(),
                        &ctor_type.params,
                        Some(&ctor_type.type_ann),
                        ctor_type.span,
                    );
                }
            },
            swc_ecma_ast::TsType::TsTypeQuery(query) => match &query.expr_name {
                swc_ecma_ast::TsTypeQueryExpr::TsEntityName(entity) => {
                    self.visit_ts_entity_name(entity);
                }
                swc_ecma_ast::TsTypeQueryExpr::Import(_) => {}
            },
            swc_ecma_ast::TsType::TsIndexedAccessType(indexed) => {
                self.visit_ts_type(&indexed.obj_type);
                self.visit_ts_type(&indexed.index_type);
            }
            swc_ecma_ast::TsType::TsInferType(_) => {}
            swc_ecma_ast::TsType::TsImportType(_) => {}
            swc_ecma_ast::TsType::TsKeywordType(_) => {}
            swc_ecma_ast::TsType::TsThisType(_) => {}
            swc_ecma_ast::TsType::TsLitType(_) => {}
            swc_ecma_ast::TsType::TsTypePredicate(_) => {}
            swc_ecma_ast::TsType::TsTypeOperator(op) => {
                self.visit_ts_type(&op.type_ann);
            }
        }
    }

    fn visit_ts_entity_name(&mut self, entity_name: &'ast swc_ecma_ast::TsEntityName) {
        match entity_name {
            swc_ecma_ast::TsEntityName::Ident(ident) => {
                self.visit_ident_reference(ident);
            }
            swc_ecma_ast::TsEntityName::TsQualifiedName(qualified) => {
                // For `A.B.C` only the leftmost identifier is a binding
                // reference.
                self.visit_ts_entity_name(&qualified.left);
            }
        }
    }

    fn visit_ts_type_element(&mut self, element: &'ast swc_ecma_ast::TsTypeElement) {
        match element {
            swc_ecma_ast::TsTypeElement::TsPropertySignature(prop) => {
                if let Some(type_ann) = &prop.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            swc_ecma_ast::TsTypeElement::TsMethodSignature(method) => {
                self.visit_fn_signature(
                    method.type_params.as_deref(),
                    &method.params,
                    method.type_ann.as_deref(),
                    method.span,
                );
            }
            swc_ecma_ast::TsTypeElement::TsIndexSignature(index) => {
                self.visit_fn_signature(
                    None,
                    &index.params,
                    index.type_ann.as_deref(),
                    index.span,
                );
            }
            swc_ecma_ast::TsTypeElement::TsCallSignatureDecl(call) => {
                self.visit_fn_signature(
                    call.type_params.as_deref(),
                    &call.params,
                    call.type_ann.as_deref(),
                    call.span,
                );
            }
            swc_ecma_ast::TsTypeElement::TsConstructSignatureDecl(ctor) => {
                self.visit_fn_signature(
                    ctor.type_params.as_deref(),
                    &ctor.params,
                    ctor.type_ann.as_deref(),
                    ctor.span,
                );
            }
            swc_ecma_ast::TsTypeElement::TsGetterSignature(getter) => {
                if let Some(type_ann) = &getter.type_ann {
                    self.visit_ts_type(&type_ann.type_ann);
                }
            }
            swc_ecma_ast::TsTypeElement::TsSetterSignature(setter) => {
                self.visit_fn_signature(
                    None,
                    std::slice::from_ref(&setter.param),
                    None,
                    setter.span,
                );
            }
        }
    }
}

fn var_definition_kind(kind: VarDeclKind) -> DefinitionKind {
    match kind {
        VarDeclKind::Var => DefinitionKind::Var,
        VarDeclKind::Let => DefinitionKind::Let,
        VarDeclKind::Const => DefinitionKind::Const,
    }
}

//! The AST walker: a single `swc_ecma_visit::Visit` pass over one file's
//! module that threads scope state down through function/arrow boundaries
//! and dispatches every recognized call site or `<Trans>` element straight
//! into an `ExtractedKeyMap`, with no intermediate "raw call" stage.

use std::collections::HashMap;
use std::sync::Arc;

use swc_common::SourceMap;
use swc_ecma_ast::{
    ArrowExpr, CallExpr, Callee, Expr, Function, JSXElement, MemberProp, Module, Pat, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::config::{ExtractorConfig, HookSpec};
use crate::core::ast_utils::{callee_dotted_name, ident_from_pat};
use crate::core::call_site::{self, CallOptions};
use crate::core::data::{ExtractedKeyMap, ScopeInfo, SourceLocation};
use crate::core::jsx_handler;
use crate::core::resolver::ValueSource;
use crate::core::scope::{destructured_t_binding, scope_info_from_hook_call, Binding, LocalBindings, ScopeManager};
use crate::issues::Warning;

const ITERATOR_METHODS: &[&str] = &["map", "forEach", "filter", "find", "some", "every", "flatMap"];

pub struct FileWalkResult {
    pub keys: ExtractedKeyMap,
    pub warnings: Vec<Warning>,
}

struct KeyWalker<'a> {
    file_path: &'a str,
    source_map: &'a SourceMap,
    config: &'a ExtractorConfig,
    scopes: ScopeManager,
    bindings: LocalBindings,
    /// Parameter name -> array name, for the innermost `array.map(item => ...)`
    /// callback currently being visited.
    iteration: HashMap<String, String>,
    keys: ExtractedKeyMap,
    warnings: Vec<Warning>,
}

impl<'a> KeyWalker<'a> {
    fn new(file_path: &'a str, source_map: &'a SourceMap, config: &'a ExtractorConfig) -> Self {
        Self {
            file_path,
            source_map,
            config,
            scopes: ScopeManager::new(),
            bindings: LocalBindings::new(),
            iteration: HashMap::new(),
            keys: ExtractedKeyMap::new(),
            warnings: Vec::new(),
        }
    }

    fn location(&self, pos: swc_common::BytePos) -> SourceLocation {
        let loc = self.source_map.lookup_char_pos(pos);
        SourceLocation::new(self.file_path, loc.line, loc.col_display + 1)
    }

    /// Whether a hook call's bound name matches one of the configured
    /// `useTranslationNames`.
    fn is_translation_hook(&self, callee: &Callee) -> Option<HookSpec> {
        let name = callee_dotted_name(callee)?;
        self.config
            .use_translation_names
            .iter()
            .find(|hook| hook.name() == name)
            .cloned()
    }

    /// Register `const t = useTranslation(...)` / `const { t } = useTranslation(...)`.
    fn register_hook_binding(&mut self, decl_name: &Pat, call: &CallExpr, hook: &HookSpec) {
        let Some(scope_info) = scope_info_from_hook_call(hook, &call.args) else {
            return;
        };

        match decl_name {
            Pat::Ident(ident) => {
                self.scopes
                    .insert(ident.id.sym.to_string(), Binding::Translation(scope_info));
            }
            Pat::Object(object_pat) => {
                if let Some(binding_name) = destructured_t_binding(object_pat, &self.config.functions) {
                    self.scopes
                        .insert(binding_name, Binding::Translation(scope_info));
                }
            }
            _ => {}
        }
    }

    /// Resolve the `ScopeInfo` a call's callee refers to, or `None` if it
    /// isn't a recognized translation call at all.
    fn resolve_call_scope(&self, call: &CallExpr) -> Option<ScopeInfo> {
        let Callee::Expr(callee_expr) = &call.callee else {
            return None;
        };

        match &**callee_expr {
            Expr::Ident(ident) => {
                let name = ident.sym.to_string();
                match self.scopes.get(&name) {
                    Some(Binding::Translation(info)) => Some(info.clone()),
                    Some(Binding::Shadowed) => None,
                    None => self
                        .config
                        .functions
                        .iter()
                        .any(|f| *f == name)
                        .then(ScopeInfo::default),
                }
            }
            Expr::Member(member) => {
                if let Expr::Ident(root) = &*member.obj
                    && let MemberProp::Ident(method) = &member.prop
                    && matches!(method.sym.as_str(), "raw" | "rich" | "markup")
                    && let Some(Binding::Translation(info)) = self.scopes.get(&root.sym)
                {
                    return Some(info.clone());
                }

                let dotted = callee_dotted_name(&call.callee)?;
                let last_segment = dotted.rsplit('.').next().unwrap_or(&dotted);
                let matches_functions = self.config.functions.iter().any(|f| {
                    f == &dotted || (f.starts_with("*.") && &f[2..] == last_segment)
                });
                matches_functions.then(ScopeInfo::default)
            }
            _ => None,
        }
    }

    /// Build the `ValueSource` for a call's key argument, substituting an
    /// iteration-aware resolution when the argument refers to the current
    /// `array.map(item => ...)` callback parameter.
    fn resolve_key_argument(&self, expr: &Expr) -> ValueSource {
        match expr {
            Expr::Ident(ident) => {
                let name = ident.sym.to_string();
                if let Some(array_name) = self.iteration.get(&name) {
                    return ValueSource::from_iteration(array_name, None, &self.bindings);
                }
                ValueSource::from_expr(expr, &self.bindings)
            }
            Expr::Member(member) if !member.prop.is_computed() => {
                if let Expr::Ident(obj_ident) = &*member.obj
                    && let Some(array_name) = self.iteration.get(obj_ident.sym.as_str())
                    && let MemberProp::Ident(prop_ident) = &member.prop
                {
                    return ValueSource::from_iteration(
                        array_name,
                        Some(prop_ident.sym.as_str()),
                        &self.bindings,
                    );
                }
                ValueSource::from_expr(expr, &self.bindings)
            }
            _ => ValueSource::from_expr(expr, &self.bindings),
        }
    }

    fn handle_translation_call(&mut self, call: &CallExpr) {
        let Some(scope_info) = self.resolve_call_scope(call) else {
            return;
        };
        let Some(key_arg) = call.args.first() else {
            return;
        };

        let source = self.resolve_key_argument(&key_arg.expr);
        let options = match call.args.get(1).map(|a| &*a.expr) {
            Some(Expr::Object(object)) => call_site::read_options(object, &self.bindings),
            _ => CallOptions::default(),
        };

        let location = self.location(call.span.lo);
        let extracted = call_site::extract_from_source(
            &source,
            &scope_info,
            self.config,
            options,
            location,
            &mut self.warnings,
        );
        for key in extracted {
            self.keys.insert(key);
        }
    }

    fn handle_trans_element(&mut self, element: &JSXElement) {
        if !jsx_handler::is_trans_component(element, &self.config.trans_components) {
            return;
        }
        let binding_name = jsx_handler::attr_ident_value(element, "t").unwrap_or("t");
        let scope_info = self
            .scopes
            .get(binding_name)
            .and_then(|b| match b {
                Binding::Translation(info) => Some(info.clone()),
                Binding::Shadowed => None,
            })
            .unwrap_or_default();

        let location = self.location(element.span.lo);
        let extracted = jsx_handler::extract_from_element(
            element,
            &scope_info,
            self.config,
            location,
            &mut self.warnings,
        );
        for key in extracted {
            self.keys.insert(key);
        }
    }

    fn register_literal_binding(&mut self, decl_name: &Pat, init: &Expr) {
        let Pat::Ident(ident) = decl_name else {
            return;
        };
        match init {
            Expr::Object(object) => self
                .bindings
                .register_object_literal(&ident.id.sym, object),
            Expr::Array(array) => self
                .bindings
                .register_array_literal(&ident.id.sym, array),
            _ => {}
        }
    }
}

impl Visit for KeyWalker<'_> {
    fn visit_function(&mut self, node: &Function) {
        self.scopes.enter_scope();
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.scopes.enter_scope();
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        for decl in &node.decls {
            let Some(init) = &decl.init else {
                decl.visit_children_with(self);
                continue;
            };

            let establishes_translation_binding = if let Expr::Call(call) = &**init
                && let Some(hook) = self.is_translation_hook(&call.callee)
            {
                self.register_hook_binding(&decl.name, call, &hook);
                true
            } else {
                self.register_literal_binding(&decl.name, init);
                false
            };

            if !establishes_translation_binding
                && let Pat::Ident(ident) = &decl.name
                && !self.scopes.is_in_current_scope(&ident.id.sym)
                && self.scopes.has_outer_binding(&ident.id.sym)
            {
                // A local declaration reuses an outer translation binding's
                // name for something else; shadow it for this scope.
                self.scopes.insert(ident.id.sym.to_string(), Binding::Shadowed);
            }

            decl.visit_children_with(self);
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        self.handle_translation_call(node);

        let entered_iteration = if let Callee::Expr(callee_expr) = &node.callee
            && let Expr::Member(member) = &**callee_expr
            && let MemberProp::Ident(method) = &member.prop
            && ITERATOR_METHODS.contains(&method.sym.as_str())
            && let Expr::Ident(array_ident) = &*member.obj
            && let Some(arg) = node.args.first()
            && let Expr::Arrow(arrow) = &*arg.expr
            && let Some(param) = arrow.params.first()
            && let Some(ident) = ident_from_pat(param)
        {
            self.iteration
                .insert(ident.sym.to_string(), array_ident.sym.to_string());
            Some(ident.sym.to_string())
        } else {
            None
        };

        node.visit_children_with(self);

        if let Some(param_name) = entered_iteration {
            self.iteration.remove(&param_name);
        }
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        self.handle_trans_element(node);
        node.visit_children_with(self);
    }
}

/// Walk a parsed module, folding every discovered key into a fresh
/// `ExtractedKeyMap` for the file.
pub fn walk_module(
    module: &Module,
    file_path: &str,
    source_map: &Arc<SourceMap>,
    config: &ExtractorConfig,
) -> FileWalkResult {
    let mut walker = KeyWalker::new(file_path, source_map, config);
    module.visit_with(&mut walker);
    FileWalkResult {
        keys: walker.keys,
        warnings: walker.warnings,
    }
}

//! Tracking what `t`/`i18n` refer to, and what same-file literals a
//! computed-access expression could be reaching into.
//!
//! Two kinds of state live here, both scoped to a single file and reset
//! per file (never shared across files, per the no-cross-file-state
//! invariant):
//!
//! - [`ScopeManager`]: a stack of translation-function bindings, pushed on
//!   entry to each function/arrow and popped on exit, so a `t` bound inside
//!   one component doesn't leak into a sibling.
//! - [`LocalBindings`]: a flat, whole-file registry of object/array literal
//!   declarations, used by the expression resolver to answer `obj[k]` and
//!   `arr.map(x => x.prop)` with the candidate values those literals hold.

use std::collections::HashMap;

use swc_ecma_ast::{ArrayLit, Expr, Lit, ObjectLit, Prop, PropOrSpread};

use crate::config::HookSpec;
use crate::core::ast_utils::static_str;
use crate::core::data::ScopeInfo;

/// Where a `t`-shaped identifier's translation behavior comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Bound by a recognized hook call in this file.
    Translation(ScopeInfo),
    /// An inner parameter or declaration reuses a name that shadows an
    /// outer translation binding. Calls using it are not tracked.
    Shadowed,
}

/// Stack-scoped map of identifier name to translation `Binding`.
///
/// One `ScopeManager` is created per file. The walker pushes a scope on
/// every function boundary (function declaration, function expression,
/// arrow function) and pops it on exit, so bindings introduced inside a
/// nested function don't outlive it.
#[derive(Debug, Default)]
pub struct ScopeManager {
    scopes: Vec<HashMap<String, Binding>>,
}

impl ScopeManager {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) {
        self.scopes
            .last_mut()
            .expect("at least one scope always present")
            .insert(name.into(), binding);
    }

    /// Look up a binding, searching from the innermost scope outward.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn is_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .expect("at least one scope always present")
            .contains_key(name)
    }

    pub fn has_outer_binding(&self, name: &str) -> bool {
        self.scopes
            .iter()
            .rev()
            .skip(1)
            .any(|scope| scope.contains_key(name))
    }
}

/// Matches i18next's own `/^[a-z]{2,3}([-_][A-Za-z0-9-]+)?$/i` heuristic for
/// telling a language tag apart from a namespace in `useTranslation`'s first
/// argument.
fn looks_like_language_tag(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    if !(2..=3).contains(&i) {
        return false;
    }
    if i == bytes.len() {
        return true;
    }
    if bytes[i] != b'-' && bytes[i] != b'_' {
        return false;
    }
    let rest = &value[i + 1..];
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// The call shapes a translation-function hook binding is recognized from,
/// given a matched `HookSpec` (`useTranslation` by default, `getFixedT` and
/// custom hooks with their own argument positions are also common).
///
/// - `const t = useTranslation("ns")`
/// - `const { t } = useTranslation("ns")` (optionally `{ t: translate }`)
/// - `const t = useTranslation(lng, "ns", { keyPrefix })`, when the first
///   argument reads as a bare language tag rather than a namespace
/// - `const t = getFixedT(lng, "ns", "keyPrefix")`
pub fn scope_info_from_hook_call(hook: &HookSpec, args: &[swc_ecma_ast::ExprOrSpread]) -> Option<ScopeInfo> {
    if hook.name() == "getFixedT" {
        let namespace = args.get(1).and_then(|a| static_str(&a.expr));
        let key_prefix = args.get(2).and_then(|a| static_str(&a.expr));
        return Some(ScopeInfo {
            default_namespace: namespace,
            key_prefix,
        });
    }

    let mut ns_arg = hook.ns_arg();
    let mut key_prefix_arg = hook.key_prefix_arg();
    let first_looks_like_language = ns_arg == 0
        && args
            .first()
            .and_then(|a| static_str(&a.expr))
            .is_some_and(|value| looks_like_language_tag(&value));
    if first_looks_like_language {
        ns_arg += 1;
        key_prefix_arg += 1;
    }

    let namespace = args.get(ns_arg).and_then(|a| static_str(&a.expr));
    let key_prefix = args.get(key_prefix_arg).and_then(|a| match &*a.expr {
        Expr::Object(obj) => crate::core::ast_utils::prop_string_value(obj, "keyPrefix"),
        _ => None,
    });
    Some(ScopeInfo {
        default_namespace: namespace,
        key_prefix,
    })
}

/// Resolve the binding name a destructured `{ t }` / `{ t: translate }`
/// pattern introduces for the translation function itself, ignoring the
/// sibling `i18n`/`ready` bindings `useTranslation` also returns.
///
/// `"t"` is the property name real `useTranslation`/`getFixedT` wrappers
/// use, but a project's own wrapper hook can return the function under
/// whatever name it likes (`const { translate } = useI18n()`); `functions`
/// — the configured translation-function identifier list — is consulted
/// as a fallback so those are recognized too.
pub fn destructured_t_binding(pat: &swc_ecma_ast::ObjectPat, functions: &[String]) -> Option<String> {
    let is_translation_property = |name: &str| name == "t" || functions.iter().any(|f| f == name);
    for prop in &pat.props {
        match prop {
            swc_ecma_ast::ObjectPatProp::KeyValue(kv) => {
                let matches = matches!(&kv.key, swc_ecma_ast::PropName::Ident(i) if is_translation_property(&i.sym));
                if matches && let swc_ecma_ast::Pat::Ident(binding) = &*kv.value {
                    return Some(binding.id.sym.to_string());
                }
            }
            swc_ecma_ast::ObjectPatProp::Assign(assign) if is_translation_property(&assign.key.sym) => {
                return Some(assign.key.sym.to_string());
            }
            _ => {}
        }
    }
    None
}

/// Same-file registry of object/array literal declarations, consulted by
/// the expression resolver for `obj[k]`, `arr.map(x => x.prop)` and
/// `arr.map(x => x)` patterns. Populated as the walker visits
/// `const NAME = { ... }` / `const NAME = [ ... ]` declarations — only
/// literals seen textually before their use are found, a known limitation
/// of a single top-down pass (see the walker's module docs).
#[derive(Debug, Default)]
pub struct LocalBindings {
    /// Object literals with only string-valued properties.
    objects: HashMap<String, Vec<String>>,
    /// Array literals of string elements.
    string_arrays: HashMap<String, Vec<String>>,
    /// Array literals of object elements, keyed by array name then property name.
    object_arrays: HashMap<String, Vec<ObjectLit>>,
}

impl LocalBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_object_literal(&mut self, name: &str, object: &ObjectLit) {
        let values: Vec<String> = object
            .props
            .iter()
            .filter_map(|p| match p {
                PropOrSpread::Prop(prop) => match prop.as_ref() {
                    Prop::KeyValue(kv) => static_str(&kv.value),
                    _ => None,
                },
                PropOrSpread::Spread(_) => None,
            })
            .collect();
        if !values.is_empty() {
            self.objects.insert(name.to_string(), values);
        }
    }

    pub fn register_array_literal(&mut self, name: &str, array: &ArrayLit) {
        let mut strings = Vec::new();
        let mut objects = Vec::new();
        for elem in array.elems.iter().flatten() {
            match &*elem.expr {
                Expr::Lit(Lit::Str(s)) => strings.push(s.value.to_atom_lossy().to_string()),
                Expr::Object(obj) => objects.push(obj.clone()),
                _ => {}
            }
        }
        if !strings.is_empty() {
            self.string_arrays.insert(name.to_string(), strings);
        }
        if !objects.is_empty() {
            self.object_arrays.insert(name.to_string(), objects);
        }
    }

    pub fn object_values(&self, name: &str) -> Option<Vec<String>> {
        self.objects.get(name).cloned()
    }

    pub fn string_array(&self, name: &str) -> Option<Vec<String>> {
        self.string_arrays.get(name).cloned()
    }

    pub fn array_property_values(&self, array_name: &str, property: &str) -> Option<Vec<String>> {
        let objects = self.object_arrays.get(array_name)?;
        let values: Vec<String> = objects
            .iter()
            .filter_map(|obj| crate::core::ast_utils::prop_string_value(obj, property))
            .collect();
        if values.is_empty() { None } else { Some(values) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_args(src: &str) -> Vec<swc_ecma_ast::ExprOrSpread> {
        use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });
        let input = StringInput::new(src, Default::default(), Default::default());
        let mut parser = Parser::new(syntax, input, None);
        match *parser.parse_expr().expect("parse expr").take() {
            Expr::Call(call) => call.args,
            other => panic!("expected call expr, got {other:?}"),
        }
    }

    #[test]
    fn use_translation_reads_namespace_from_first_argument() {
        let hook = HookSpec::Name("useTranslation".to_string());
        let info = scope_info_from_hook_call(&hook, &call_args("useTranslation(\"common\")")).unwrap();
        assert_eq!(info.default_namespace.as_deref(), Some("common"));
        assert_eq!(info.key_prefix, None);
    }

    #[test]
    fn use_translation_reads_key_prefix_from_options_object() {
        let hook = HookSpec::Name("useTranslation".to_string());
        let info = scope_info_from_hook_call(
            &hook,
            &call_args("useTranslation(\"common\", { keyPrefix: \"home\" })"),
        )
        .unwrap();
        assert_eq!(info.default_namespace.as_deref(), Some("common"));
        assert_eq!(info.key_prefix.as_deref(), Some("home"));
    }

    #[test]
    fn use_translation_shifts_positions_when_first_argument_is_a_language_tag() {
        let hook = HookSpec::Name("useTranslation".to_string());
        let info = scope_info_from_hook_call(
            &hook,
            &call_args("useTranslation(\"en-US\", \"common\", { keyPrefix: \"home\" })"),
        )
        .unwrap();
        assert_eq!(info.default_namespace.as_deref(), Some("common"));
        assert_eq!(info.key_prefix.as_deref(), Some("home"));
    }

    #[test]
    fn get_fixed_t_reads_namespace_and_key_prefix_positionally() {
        let hook = HookSpec::Name("getFixedT".to_string());
        let info = scope_info_from_hook_call(&hook, &call_args("getFixedT(\"en\", \"common\", \"home\")")).unwrap();
        assert_eq!(info.default_namespace.as_deref(), Some("common"));
        assert_eq!(info.key_prefix.as_deref(), Some("home"));
    }

    #[test]
    fn custom_hook_honors_configured_argument_positions() {
        let hook = HookSpec::Detailed {
            name: "useI18n".to_string(),
            ns_arg: Some(1),
            key_prefix_arg: Some(2),
        };
        let info = scope_info_from_hook_call(
            &hook,
            &call_args("useI18n(scope, \"common\", { keyPrefix: \"home\" })"),
        )
        .unwrap();
        assert_eq!(info.default_namespace.as_deref(), Some("common"));
        assert_eq!(info.key_prefix.as_deref(), Some("home"));
    }

    #[test]
    fn scope_manager_finds_binding_in_outer_scope() {
        let mut scopes = ScopeManager::new();
        scopes.insert("t", Binding::Translation(ScopeInfo::with_namespace("common")));
        scopes.enter_scope();
        assert!(matches!(scopes.get("t"), Some(Binding::Translation(_))));
        scopes.exit_scope();
    }

    #[test]
    fn scope_manager_scopes_are_isolated() {
        let mut scopes = ScopeManager::new();
        scopes.enter_scope();
        scopes.insert("t", Binding::Translation(ScopeInfo::with_namespace("inner")));
        scopes.exit_scope();
        assert!(scopes.get("t").is_none());
    }

    #[test]
    fn scope_manager_detects_outer_binding_for_shadow_check() {
        let mut scopes = ScopeManager::new();
        scopes.insert("t", Binding::Translation(ScopeInfo::with_namespace("common")));
        scopes.enter_scope();
        assert!(scopes.has_outer_binding("t"));
        assert!(!scopes.is_in_current_scope("t"));
    }

    #[test]
    fn destructured_t_binding_finds_literal_t() {
        let pat = parse_object_pat("{ t }");
        assert_eq!(destructured_t_binding(&pat, &[]).as_deref(), Some("t"));
    }

    #[test]
    fn destructured_t_binding_finds_aliased_t() {
        let pat = parse_object_pat("{ t: translate }");
        assert_eq!(destructured_t_binding(&pat, &[]).as_deref(), Some("translate"));
    }

    #[test]
    fn destructured_t_binding_falls_back_to_configured_function_names() {
        let pat = parse_object_pat("{ translate }");
        let functions = vec!["translate".to_string()];
        assert_eq!(destructured_t_binding(&pat, &functions).as_deref(), Some("translate"));
    }

    #[test]
    fn destructured_t_binding_ignores_unconfigured_names() {
        let pat = parse_object_pat("{ translate }");
        assert_eq!(destructured_t_binding(&pat, &[]), None);
    }

    fn parse_object_pat(pattern_src: &str) -> swc_ecma_ast::ObjectPat {
        use swc_ecma_ast::{Decl, ModuleItem, Pat, Stmt};

        let parsed = crate::core::parser::parse_source(
            format!("const {pattern_src} = x;"),
            "src/app/page.tsx",
        )
        .expect("parse module");
        for item in parsed.module.body {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var_decl))) = item {
                for decl in var_decl.decls {
                    if let Pat::Object(object_pat) = decl.name {
                        return object_pat;
                    }
                }
            }
        }
        panic!("expected a `const {{ ... }} = x;` declaration");
    }

    #[test]
    fn local_bindings_tracks_string_object() {
        let mut bindings = LocalBindings::new();
        let obj = parse_object("({ create: \"keyA\", edit: \"keyB\" })");
        bindings.register_object_literal("toolKeys", &obj);
        let mut values = bindings.object_values("toolKeys").unwrap();
        values.sort();
        assert_eq!(values, vec!["keyA".to_string(), "keyB".to_string()]);
    }

    #[test]
    fn local_bindings_tracks_string_array() {
        let mut bindings = LocalBindings::new();
        let arr = parse_array("[\"save\", \"load\"]");
        bindings.register_array_literal("FEATURE_KEYS", &arr);
        assert_eq!(
            bindings.string_array("FEATURE_KEYS"),
            Some(vec!["save".to_string(), "load".to_string()])
        );
    }

    #[test]
    fn local_bindings_tracks_array_of_objects_by_property() {
        let mut bindings = LocalBindings::new();
        let arr = parse_array("[{ titleKey: \"a\" }, { titleKey: \"b\" }]");
        bindings.register_array_literal("capabilities", &arr);
        assert_eq!(
            bindings.array_property_values("capabilities", "titleKey"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    fn parse_object(src: &str) -> ObjectLit {
        match parse_expr(src) {
            Expr::Paren(paren) => match *paren.expr {
                Expr::Object(obj) => *obj,
                _ => panic!("expected object literal"),
            },
            _ => panic!("expected paren expr"),
        }
    }

    fn parse_array(src: &str) -> ArrayLit {
        match parse_expr(src) {
            Expr::Array(arr) => arr,
            _ => panic!("expected array literal"),
        }
    }

    fn parse_expr(src: &str) -> Expr {
        use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });
        let input = StringInput::new(src, Default::default(), Default::default());
        let mut parser = Parser::new(syntax, input, None);
        *parser.parse_expr().expect("parse expr").take()
    }
}

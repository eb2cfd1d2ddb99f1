//! Turning one recognized `t(...)` call into zero or more `ExtractedKey`s.
//!
//! This is the namespace/prefix/context/plural resolution chain: a call
//! site supplies a raw key plus an options object, the enclosing scope
//! supplies a default namespace and key prefix, and configuration supplies
//! the separators and target locales that decide how many concrete key
//! strings a single call site actually produces.

use std::collections::HashMap;

use swc_ecma_ast::{CallExpr, Expr, ExprOrSpread, Lit, ObjectLit};

use crate::config::ExtractorConfig;
use crate::core::ast_utils::{find_prop, has_prop_with_prefix, prop_is_present, prop_string_value, string_props_by_prefix};
use crate::core::data::{ExtractedKey, ScopeInfo, SourceLocation};
use crate::core::plural::plural_suffixes;
use crate::core::resolver::{NoopResolverPlugin, ValueSource};
use crate::core::scope::LocalBindings;
use crate::issues::{EmptyKeyAfterStripWarning, Report, Warning};

/// Options recognized on a translation call's second argument, or on a
/// `<Trans>` element's attributes (see `crate::core::jsx_handler`).
#[derive(Debug, Default, Clone)]
pub(crate) struct CallOptions {
    /// An explicit `ns` option, which outranks both a `"ns:key"`-shaped key
    /// and the scope's default namespace (§4.5 step 7).
    pub(crate) ns: Option<String>,
    /// Every value the `context` option can take on. A single value parsed
    /// from a string literal is "static"; anything else (a ternary, a bound
    /// identifier) is "dynamic" and also gets a base-key fallback — see
    /// `expand_key`.
    pub(crate) context_values: Vec<String>,
    pub(crate) context_is_dynamic: bool,
    pub(crate) has_count: bool,
    pub(crate) is_ordinal: bool,
    /// The general default, from either a string second argument or an
    /// options-object `defaultValue` property — the two are read as
    /// equivalent sources for "the" default value of the base key.
    pub(crate) default_value: Option<String>,
    /// `defaultValue_<category>` / `defaultValue_ordinal_<category>`
    /// overrides, keyed by the suffix after `defaultValue_`.
    pub(crate) default_value_variants: HashMap<String, String>,
    /// Whether any `defaultValue`-prefixed source was given at all (a
    /// string argument, `options.defaultValue`, or any
    /// `options.defaultValue_*`) — drives the base key's explicit-default
    /// classification.
    pub(crate) has_default_value_source: bool,
}

pub(crate) fn read_options(object: &ObjectLit, bindings: &LocalBindings) -> CallOptions {
    let mut opts = CallOptions::default();

    opts.ns = prop_string_value(object, "ns");

    if let Some(swc_ecma_ast::Prop::KeyValue(kv)) = find_prop(object, "context") {
        let is_literal = matches!(&*kv.value, Expr::Lit(_));
        match ValueSource::from_expr(&kv.value, bindings).resolve_for_context(&NoopResolverPlugin) {
            Ok(values) if !values.is_empty() => {
                opts.context_is_dynamic = !is_literal;
                opts.context_values = values;
            }
            _ => opts.context_is_dynamic = true,
        }
    }

    opts.has_count = prop_is_present(object, "count");
    opts.is_ordinal = matches!(
        find_prop(object, "ordinal"),
        Some(swc_ecma_ast::Prop::KeyValue(kv)) if matches!(&*kv.value, Expr::Lit(Lit::Bool(b)) if b.value)
    );
    opts.default_value = prop_string_value(object, "defaultValue");
    opts.default_value_variants = string_props_by_prefix(object, "defaultValue_");
    opts.has_default_value_source = has_prop_with_prefix(object, "defaultValue");

    opts
}

/// A call's string-literal second argument (the "base string default from
/// call") and/or object argument (options), per §4.5 step 5: "string or
/// object permitted as second; object permitted as third".
fn default_value_and_options(args: &[ExprOrSpread]) -> (Option<String>, Option<&ObjectLit>) {
    match args.get(1).map(|a| &*a.expr) {
        Some(Expr::Lit(Lit::Str(s))) => (
            Some(s.value.to_atom_lossy().to_string()),
            args.get(2).and_then(|a| match &*a.expr {
                Expr::Object(object) => Some(object.as_ref()),
                _ => None,
            }),
        ),
        Some(Expr::Object(object)) => (None, Some(object)),
        _ => (None, None),
    }
}

/// Strip a trailing `pluralSep + "ordinal"` suffix from a resolved key
/// candidate, reporting whether it was present. Lets a call site flag
/// ordinal plurals through the key itself (`t("rank_ordinal")`) instead of
/// an explicit `ordinal: true` option.
fn strip_ordinal_suffix<'a>(key: &'a str, plural_separator: &str) -> (std::borrow::Cow<'a, str>, bool) {
    if plural_separator.is_empty() {
        return (std::borrow::Cow::Borrowed(key), false);
    }
    let suffix = format!("{plural_separator}ordinal");
    match key.strip_suffix(suffix.as_str()) {
        Some(stripped) if !stripped.is_empty() => (std::borrow::Cow::Owned(stripped.to_string()), true),
        _ => (std::borrow::Cow::Borrowed(key), false),
    }
}

/// Split `"ns:key"` into `(Some(ns), "key")` using the configured
/// namespace separator; a key with no separator keeps the scope's
/// namespace untouched.
fn split_call_site_namespace<'a>(raw_key: &'a str, ns_separator: &str) -> (Option<&'a str>, &'a str) {
    if ns_separator.is_empty() {
        return (None, raw_key);
    }
    match raw_key.split_once(ns_separator) {
        Some((ns, rest)) if !ns.is_empty() => (Some(ns), rest),
        _ => (None, raw_key),
    }
}

/// Extract every key a single `t(...)`/`t.method(...)` call site produces.
pub fn extract_from_call(
    call: &CallExpr,
    scope: &ScopeInfo,
    config: &ExtractorConfig,
    bindings: &LocalBindings,
    location: SourceLocation,
    warnings: &mut Vec<Warning>,
) -> Vec<ExtractedKey> {
    let Some(key_arg) = call.args.first() else {
        return Vec::new();
    };

    let source = ValueSource::from_expr(&key_arg.expr, bindings);
    let (string_default, options_object) = default_value_and_options(&call.args);
    let mut options = options_object
        .map(|object| read_options(object, bindings))
        .unwrap_or_default();
    if let Some(string_default) = string_default {
        options.has_default_value_source = true;
        options.default_value = Some(string_default);
    }
    extract_from_source(&source, scope, config, options, location, warnings)
}

/// Same as [`extract_from_call`], but takes an already-built `ValueSource`.
/// Used by the walker for `array.map(item => t(item.prop))` iteration
/// patterns, where the key argument's `ValueSource` is built via
/// `ValueSource::from_iteration` instead of `ValueSource::from_expr`.
pub fn extract_from_source(
    source: &ValueSource,
    scope: &ScopeInfo,
    config: &ExtractorConfig,
    options: CallOptions,
    location: SourceLocation,
    warnings: &mut Vec<Warning>,
) -> Vec<ExtractedKey> {
    let Ok(raw_keys) = source.resolve_for_key(&NoopResolverPlugin) else {
        // Statically-undeterminable keys are an explicit non-goal; no
        // warning is raised here, callers rely on `preservePatterns`.
        return Vec::new();
    };

    let mut results = Vec::new();
    for raw_key in raw_keys {
        let (raw_key, ordinal_by_suffix) = strip_ordinal_suffix(&raw_key, &config.plural_separator);
        let mut options = options.clone();
        options.is_ordinal = options.is_ordinal || ordinal_by_suffix;

        let (call_site_ns, stripped) = split_call_site_namespace(&raw_key, &config.ns_separator);
        let prefixed = match scope.apply_prefix(stripped, &config.key_separator) {
            Ok(prefixed) => prefixed,
            Err(prefix) => {
                warnings.push(
                    crate::issues::InvalidKeyPrefixWarning {
                        location: location.clone(),
                        key_prefix: prefix.to_string(),
                        key: stripped.to_string(),
                    }
                    .into(),
                );
                continue;
            }
        };

        if prefixed.is_empty() {
            warnings.push(
                EmptyKeyAfterStripWarning {
                    location: location.clone(),
                    original_key: raw_key.clone().into_owned(),
                }
                .into(),
            );
            continue;
        }

        let namespace = options
            .ns
            .clone()
            .or_else(|| call_site_ns.map(str::to_string))
            .or_else(|| scope.default_namespace.clone())
            .or_else(|| Some(config.default_ns.clone()));

        for expanded in expand_key(&prefixed, &options, config) {
            let mut entry = ExtractedKey::new(expanded.key, namespace.clone());
            entry.has_count = options.has_count;
            entry.is_ordinal = options.is_ordinal;
            entry.key_accepting_context = expanded.context_base;
            let (default_value, explicit) = resolve_default_value(
                expanded.plural_category,
                options.is_ordinal,
                &options.default_value_variants,
                options.default_value.as_deref(),
                options.has_default_value_source,
                config,
            );
            if let Some(default_value) = default_value {
                entry.default_value = Some(default_value);
                entry.explicit_default = explicit;
            }
            entry.locations.push(location.clone());
            results.push(entry);
        }
    }

    results
}

/// One concrete key string `expand_key` produced, tagged with the plural
/// category it corresponds to (`None` when plurals aren't active for this
/// call), so the default-value fallback chain can pick a per-variant
/// override.
pub(crate) struct ExpandedKey {
    pub(crate) key: String,
    pub(crate) plural_category: Option<&'static str>,
    /// The pre-context-suffix key this entry was expanded from, when this
    /// entry is a context variant rather than a base/fallback key.
    pub(crate) context_base: Option<String>,
}

/// Expand a stripped key into every plural/context suffix combination the
/// call site's options and configuration imply.
///
/// A *static* context (a string/number/boolean literal) only ever produces
/// the suffixed key — the base key is not also emitted. A *dynamic* context
/// (a ternary, a bound identifier, anything the resolver had to reduce to a
/// set of candidates) produces one variant per candidate plus the base key
/// as a fallback, since at runtime the actual context value might not be one
/// of the ones observed statically. When plurals are also active,
/// `generateBasePluralForms` decides whether that fallback includes the
/// unsuffixed plural forms alongside the context variants.
pub(crate) fn expand_key(base: &str, options: &CallOptions, config: &ExtractorConfig) -> Vec<ExpandedKey> {
    let plurals_active = options.has_count && !config.disable_plurals;
    let keys: Vec<ExpandedKey> = if plurals_active {
        let suffixes = plural_suffixes(&config.locales, config.primary_language.as_deref(), options.is_ordinal);
        suffixes
            .iter()
            .map(|suffix| {
                let key = if options.is_ordinal {
                    format!("{base}{0}ordinal{0}{suffix}", config.plural_separator)
                } else {
                    format!("{base}{}{suffix}", config.plural_separator)
                };
                ExpandedKey {
                    key,
                    plural_category: Some(suffix),
                    context_base: None,
                }
            })
            .collect()
    } else {
        vec![ExpandedKey {
            key: base.to_string(),
            plural_category: None,
            context_base: None,
        }]
    };

    if options.context_values.is_empty() {
        return keys;
    }

    if !options.context_is_dynamic {
        return keys
            .into_iter()
            .map(|k| ExpandedKey {
                key: format!("{}{}{}", k.key, config.context_separator, options.context_values[0]),
                plural_category: k.plural_category,
                context_base: Some(k.key),
            })
            .collect();
    }

    let mut expanded: Vec<ExpandedKey> = keys
        .iter()
        .flat_map(|k| {
            options.context_values.iter().map(move |ctx| ExpandedKey {
                key: format!("{}{}{}", k.key, config.context_separator, ctx),
                plural_category: k.plural_category,
                context_base: Some(k.key.clone()),
            })
        })
        .collect();

    if !plurals_active || config.generate_base_plural_forms {
        expanded.extend(keys);
    }

    expanded
}

/// Per-variant default-value fallback chain (§4.5 step 10):
/// `defaultValue_<cat>`/`defaultValue_ordinal_<cat>` → for `"one"`, the
/// general default → `defaultValue_ordinal_other` → `defaultValue_other` →
/// the general default → nothing (the key itself is the runtime fallback,
/// not a value this extractor records).
///
/// A plural variant's default is only "explicit" when a plural-specific
/// override exists, or the general default doesn't contain a count
/// interpolation (using the configured interpolation delimiters) — a
/// count-templated string is a runtime template, not a considered
/// per-variant override.
fn resolve_default_value(
    category: Option<&'static str>,
    is_ordinal: bool,
    variants: &HashMap<String, String>,
    general_default: Option<&str>,
    has_explicit_marker: bool,
    config: &ExtractorConfig,
) -> (Option<String>, bool) {
    let Some(category) = category else {
        return (general_default.map(String::from), has_explicit_marker);
    };

    let count_interpolation = format!(
        "{}count{}",
        config.interpolation_prefix, config.interpolation_suffix
    );
    let plural_variant_explicit =
        !variants.is_empty() || general_default.is_some_and(|value| !value.contains(&count_interpolation));

    let specific_key = if is_ordinal {
        format!("ordinal_{category}")
    } else {
        category.to_string()
    };
    if let Some(value) = variants.get(&specific_key) {
        return (Some(value.clone()), true);
    }
    if category == "one"
        && let Some(general) = general_default
    {
        return (Some(general.to_string()), plural_variant_explicit);
    }
    if let Some(value) = variants.get("ordinal_other") {
        return (Some(value.clone()), true);
    }
    if let Some(value) = variants.get("other") {
        return (Some(value.clone()), true);
    }
    match general_default {
        Some(general) => (Some(general.to_string()), plural_variant_explicit),
        None => (None, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

    fn parse_call(src: &str) -> CallExpr {
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });
        let input = StringInput::new(src, Default::default(), Default::default());
        let mut parser = Parser::new(syntax, input, None);
        match *parser.parse_expr().expect("parse expr").take() {
            Expr::Call(call) => call,
            other => panic!("expected call expr, got {other:?}"),
        }
    }

    fn loc() -> SourceLocation {
        SourceLocation::new("src/app/page.tsx", 1, 1)
    }

    #[test]
    fn simple_literal_key_with_scope_namespace() {
        let call = parse_call("t(\"submit\")");
        let scope = ScopeInfo::with_namespace("common");
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "submit");
        assert_eq!(keys[0].namespace.as_deref(), Some("common"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn call_site_namespace_overrides_scope_namespace() {
        let call = parse_call("t(\"errors:notFound\")");
        let scope = ScopeInfo::with_namespace("common");
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys[0].key, "notFound");
        assert_eq!(keys[0].namespace.as_deref(), Some("errors"));
    }

    #[test]
    fn explicit_ns_option_outranks_ns_key_split_and_scope_namespace() {
        let call = parse_call("t(\"other:greeting\", { ns: \"errors\" })");
        let scope = ScopeInfo::with_namespace("common");
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys[0].key, "greeting");
        assert_eq!(keys[0].namespace.as_deref(), Some("errors"));
    }

    #[test]
    fn count_option_expands_into_plural_suffixes() {
        let call = parse_call("t(\"itemCount\", { count })");
        let scope = ScopeInfo::default();
        let mut config = ExtractorConfig::default();
        config.locales = vec!["en".to_string()];
        config.generate_base_plural_forms = false;
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        let suffixes: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(suffixes, vec!["itemCount_one", "itemCount_other"]);
        assert!(keys.iter().all(|k| k.has_count));
    }

    #[test]
    fn count_without_context_does_not_add_a_bare_base_key_by_default() {
        let call = parse_call("t(\"item\", { count: n })");
        let scope = ScopeInfo::default();
        let mut config = ExtractorConfig::default();
        config.locales = vec!["en".to_string()];
        config.primary_language = Some("en".to_string());
        assert!(config.generate_base_plural_forms);
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        let suffixes: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(suffixes, vec!["item_one", "item_other"]);
    }

    #[test]
    fn context_option_appends_suffix() {
        let call = parse_call("t(\"friend\", { context: \"male\" })");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "friend_male");
        assert_eq!(keys[0].key_accepting_context.as_deref(), Some("friend"));
    }

    #[test]
    fn numeric_literal_context_is_stringified_into_the_suffix() {
        let call = parse_call("t(\"rank\", { context: 5 })");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "rank_5");
    }

    #[test]
    fn boolean_literal_context_is_stringified_into_the_suffix() {
        let call = parse_call("t(\"flag\", { context: true })");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "flag_true");
    }

    #[test]
    fn dynamic_ternary_context_expands_both_branches_plus_base_fallback() {
        let call = parse_call("t(\"friend\", { context: isMale ? \"male\" : \"female\" })");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let results = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        let mut keys: Vec<&str> = results.iter().map(|k| k.key.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["friend", "friend_female", "friend_male"]);
    }

    #[test]
    fn ordinal_by_key_suffix_strips_suffix_and_sets_ordinal_flag() {
        let call = parse_call("t(\"rank_ordinal\", { count: n })");
        let scope = ScopeInfo::default();
        let mut config = ExtractorConfig::default();
        config.locales = vec!["en".to_string()];
        config.primary_language = Some("en".to_string());
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert!(keys.iter().all(|k| k.is_ordinal));
        assert!(names.iter().all(|name| name.starts_with("rank_ordinal_")));
    }

    #[test]
    fn explicit_default_value_is_recorded() {
        let call = parse_call("t(\"greeting\", { defaultValue: \"Hello\" })");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys[0].default_value.as_deref(), Some("Hello"));
        assert!(keys[0].explicit_default);
    }

    #[test]
    fn string_second_argument_is_read_as_the_default_value() {
        let call = parse_call("t(\"greeting\", \"Hello there\")");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert_eq!(keys[0].default_value.as_deref(), Some("Hello there"));
        assert!(keys[0].explicit_default);
    }

    #[test]
    fn string_default_with_third_argument_options_still_expands_plurals() {
        let call = parse_call("t(\"item\", \"{{count}} item\", { count: n })");
        let scope = ScopeInfo::default();
        let mut config = ExtractorConfig::default();
        config.locales = vec!["en".to_string()];
        config.generate_base_plural_forms = false;
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, vec!["item_one", "item_other"]);
        assert!(keys.iter().all(|k| k.default_value.as_deref() == Some("{{count}} item")));
    }

    #[test]
    fn plural_specific_default_value_overrides_the_general_default() {
        let call = parse_call(
            "t(\"item\", { count: n, defaultValue: \"{{count}} items\", defaultValue_one: \"one item\" })",
        );
        let scope = ScopeInfo::default();
        let mut config = ExtractorConfig::default();
        config.locales = vec!["en".to_string()];
        config.generate_base_plural_forms = false;
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        let one = keys.iter().find(|k| k.key == "item_one").unwrap();
        let other = keys.iter().find(|k| k.key == "item_other").unwrap();
        assert_eq!(one.default_value.as_deref(), Some("one item"));
        assert!(one.explicit_default);
        assert_eq!(other.default_value.as_deref(), Some("{{count}} items"));
        assert!(other.explicit_default);
    }

    #[test]
    fn empty_key_after_strip_emits_warning_and_no_key() {
        let call = parse_call("t(\"\")");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert!(keys.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn empty_key_under_a_key_prefix_emits_invalid_key_prefix_warning() {
        let call = parse_call("t(\"\")");
        let scope = ScopeInfo {
            default_namespace: None,
            key_prefix: Some("form".to_string()),
        };
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert!(keys.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule(), crate::issues::Rule::InvalidKeyPrefix);
    }

    #[test]
    fn unresolvable_key_produces_no_keys_and_no_warning() {
        let call = parse_call("t(dynamicKey)");
        let scope = ScopeInfo::default();
        let config = ExtractorConfig::default();
        let bindings = LocalBindings::new();
        let mut warnings = Vec::new();

        let keys = extract_from_call(&call, &scope, &config, &bindings, loc(), &mut warnings);
        assert!(keys.is_empty());
        assert!(warnings.is_empty());
    }
}

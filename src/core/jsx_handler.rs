//! Turning one recognized `<Trans>` element into zero or more `ExtractedKey`s.
//!
//! Mirrors `crate::core::call_site`'s namespace/prefix/context/plural
//! expansion, but reads `i18nKey`/`ns`/`count`/`context`/`defaults` from JSX
//! attributes instead of a call's argument list, and falls back to
//! serializing the element's children for the default value when no
//! `defaults` attribute is present.

use swc_ecma_ast::{Expr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementName, JSXExpr, Lit};

use crate::config::ExtractorConfig;
use crate::core::ast_utils::{has_prop_with_prefix, prop_is_present, static_str, string_props_by_prefix};
use crate::core::call_site::{expand_key, CallOptions};
use crate::core::data::{ExtractedKey, ScopeInfo, SourceLocation};
use crate::core::jsx_serializer::serialize_children;
use crate::issues::{MalformedSubtreeWarning, Warning};

/// Whether an opening element's tag name matches one of the configured
/// `transComponents` names.
pub fn is_trans_component(element: &JSXElement, trans_components: &[String]) -> bool {
    match &element.opening.name {
        JSXElementName::Ident(ident) => trans_components.iter().any(|name| *name == ident.sym),
        _ => false,
    }
}

fn attr_name(attr: &JSXAttrOrSpread) -> Option<&str> {
    match attr {
        JSXAttrOrSpread::JSXAttr(attr) => match &attr.name {
            JSXAttrName::Ident(ident) => Some(ident.sym.as_str()),
            _ => None,
        },
        JSXAttrOrSpread::SpreadElement(_) => None,
    }
}

fn attr_string_value(element: &JSXElement, name: &str) -> Option<String> {
    for attr in &element.opening.attrs {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            continue;
        };
        let JSXAttrName::Ident(ident) = &attr.name else {
            continue;
        };
        if ident.sym != *name {
            continue;
        }
        return match &attr.value {
            Some(JSXAttrValue::Str(s)) => Some(s.value.to_atom_lossy().to_string()),
            Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
                JSXExpr::Expr(expr) => static_str(expr),
                JSXExpr::JSXEmptyExpr(_) => None,
            },
            _ => None,
        };
    }
    None
}

/// The identifier name passed as `t={someIdent}`, if any — used to look up
/// that identifier's own translation-function binding instead of the
/// default `t` scope.
pub fn attr_ident_value<'a>(element: &'a JSXElement, name: &str) -> Option<&'a str> {
    for attr in &element.opening.attrs {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            continue;
        };
        let JSXAttrName::Ident(ident) = &attr.name else {
            continue;
        };
        if ident.sym != *name {
            continue;
        }
        if let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value
            && let JSXExpr::Expr(expr) = &container.expr
            && let Expr::Ident(ident) = &**expr
        {
            return Some(ident.sym.as_str());
        }
    }
    None
}

fn attr_is_present(element: &JSXElement, name: &str) -> bool {
    element
        .opening
        .attrs
        .iter()
        .any(|attr| attr_name(attr) == Some(name))
}

/// The object literal passed to a `tOptions={{ ... }}` attribute, if any.
fn attr_object_literal<'a>(element: &'a JSXElement, name: &str) -> Option<&'a swc_ecma_ast::ObjectLit> {
    for attr in &element.opening.attrs {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            continue;
        };
        let JSXAttrName::Ident(ident) = &attr.name else {
            continue;
        };
        if ident.sym != *name {
            continue;
        }
        if let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value
            && let JSXExpr::Expr(expr) = &container.expr
            && let Expr::Object(object) = &**expr
        {
            return Some(object);
        }
    }
    None
}

/// `(candidate values, is_dynamic)` for a `context` attribute — mirrors
/// `call_site::read_options`'s static-vs-dynamic distinction.
fn attr_context(element: &JSXElement) -> (Vec<String>, bool) {
    for attr in &element.opening.attrs {
        let JSXAttrOrSpread::JSXAttr(attr) = attr else {
            continue;
        };
        let JSXAttrName::Ident(ident) = &attr.name else {
            continue;
        };
        if ident.sym != *"context" {
            continue;
        }
        return match &attr.value {
            Some(JSXAttrValue::Str(s)) => (vec![s.value.to_atom_lossy().to_string()], false),
            Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
                JSXExpr::Expr(expr) => match static_str(expr) {
                    Some(value) => (vec![value], false),
                    None => (Vec::new(), true),
                },
                JSXExpr::JSXEmptyExpr(_) => (Vec::new(), false),
            },
            _ => (Vec::new(), true),
        };
    }
    (Vec::new(), false)
}

/// Extract every key a single `<Trans>` element produces.
pub fn extract_from_element(
    element: &JSXElement,
    scope: &ScopeInfo,
    config: &ExtractorConfig,
    location: SourceLocation,
    warnings: &mut Vec<Warning>,
) -> Vec<ExtractedKey> {
    let serialized = serialize_children(&element.children, &config.trans_keep_basic_html_nodes_for);

    // Without a static `i18nKey`, the serialized children double as the key
    // itself — the same thing i18next's own `<Trans>` does at runtime,
    // falling back to matching the default-text key against the catalog.
    let raw_key = match attr_string_value(element, "i18nKey") {
        Some(key) => key,
        None if !serialized.is_empty() => serialized.clone(),
        None => {
            warnings.push(
                MalformedSubtreeWarning {
                    location,
                    detail: "<Trans> element has no static i18nKey attribute and no usable children to derive a key from".to_string(),
                }
                .into(),
            );
            return Vec::new();
        }
    };

    let (element_ns, raw_key) = match raw_key.split_once(&config.ns_separator) {
        Some((ns, rest)) if !config.ns_separator.is_empty() && !ns.is_empty() => {
            (Some(ns.to_string()), rest.to_string())
        }
        _ => (None, raw_key),
    };

    let prefixed = match scope.apply_prefix(&raw_key, &config.key_separator) {
        Ok(prefixed) => prefixed,
        Err(prefix) => {
            warnings.push(
                crate::issues::InvalidKeyPrefixWarning {
                    location,
                    key_prefix: prefix.to_string(),
                    key: raw_key,
                }
                .into(),
            );
            return Vec::new();
        }
    };
    if prefixed.is_empty() {
        warnings.push(
            crate::issues::EmptyKeyAfterStripWarning {
                location,
                original_key: raw_key,
            }
            .into(),
        );
        return Vec::new();
    }

    let t_options = attr_object_literal(element, "tOptions");
    let namespace = attr_string_value(element, "ns")
        .or(element_ns)
        .or_else(|| t_options.and_then(|object| crate::core::ast_utils::prop_string_value(object, "ns")))
        .or_else(|| scope.default_namespace.clone())
        .or_else(|| Some(config.default_ns.clone()));

    let (context_values, context_is_dynamic) = attr_context(element);
    let values = attr_object_literal(element, "values");
    let options = CallOptions {
        ns: None,
        context_values,
        context_is_dynamic,
        has_count: attr_is_present(element, "count")
            || values.is_some_and(|object| prop_is_present(object, "count")),
        is_ordinal: matches!(attr_string_value(element, "ordinal").as_deref(), Some("true")),
        default_value: None,
        default_value_variants: t_options
            .map(|object| string_props_by_prefix(object, "defaultValue_"))
            .unwrap_or_default(),
        has_default_value_source: attr_is_present(element, "defaults")
            || t_options.is_some_and(|object| has_prop_with_prefix(object, "defaultValue")),
    };

    let default_value = attr_string_value(element, "defaults")
        .or_else(|| (!serialized.is_empty()).then_some(serialized));

    expand_key(&prefixed, &options, config)
        .into_iter()
        .map(|expanded| {
            let mut entry = ExtractedKey::new(expanded.key, namespace.clone());
            entry.has_count = options.has_count;
            entry.is_ordinal = options.is_ordinal;
            entry.key_accepting_context = expanded.context_base;
            if let Some(default_value) = &default_value {
                entry.default_value = Some(default_value.clone());
                entry.explicit_default = true;
            }
            entry.locations.push(location.clone());
            entry
        })
        .collect()
}

//! Small, stateless helpers for reading values out of swc AST nodes.
//!
//! Every other component in `core` builds on these instead of matching on
//! `Expr`/`Pat`/`ObjectLit` shapes itself, so a given AST idiom (how we read
//! a string literal, how we flatten `a.b.c` into a dotted name) is
//! recognized the same way everywhere.

use swc_ecma_ast::{
    Callee, Expr, Ident, Lit, MemberExpr, MemberProp, ObjectLit, Pat, Prop, PropName, PropOrSpread,
};

/// A plain string literal, unwrapping nothing else.
///
/// `t("home.title")` → `Some("home.title")`; `t(variable)` → `None`.
pub fn static_str(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_atom_lossy().to_string()),
        _ => None,
    }
}

/// Flatten a chain of identifier member accesses into its dotted segments.
///
/// `i18n.t` → `Some(["i18n", "t"])`. A single bare identifier also counts:
/// `t` → `Some(["t"])`. Computed access (`obj[x]`) and non-identifier
/// roots break the chain and return `None`.
pub fn flatten_member_chain(expr: &Expr) -> Option<Vec<String>> {
    match expr {
        Expr::Ident(ident) => Some(vec![ident.sym.to_string()]),
        Expr::Member(member) => {
            let mut segments = flatten_member_chain(&member.obj)?;
            segments.push(member_prop_name(member)?);
            Some(segments)
        }
        _ => None,
    }
}

fn member_prop_name(member: &MemberExpr) -> Option<String> {
    match &member.prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_string()),
        _ => None,
    }
}

/// Dotted name of a call's callee, e.g. `i18n.t` or `t`, for matching
/// against the `functions` configuration list. `None` for computed or
/// otherwise non-identifier callees (`window[name]()`).
pub fn callee_dotted_name(callee: &Callee) -> Option<String> {
    let Callee::Expr(expr) = callee else {
        return None;
    };
    flatten_member_chain(expr).map(|segments| segments.join("."))
}

/// A JSX-attribute-sized identifier binding out of a destructuring pattern.
pub fn ident_from_pat(pat: &Pat) -> Option<&Ident> {
    match pat {
        Pat::Ident(binding) => Some(&binding.id),
        _ => None,
    }
}

/// Find a non-spread, non-computed property by name in an object literal.
pub fn find_prop<'a>(object: &'a ObjectLit, name: &str) -> Option<&'a Prop> {
    object.props.iter().find_map(|p| match p {
        PropOrSpread::Prop(prop) => match prop.as_ref() {
            Prop::KeyValue(kv) => match &kv.key {
                PropName::Ident(ident) if ident.sym == *name => Some(prop.as_ref()),
                PropName::Str(s) if s.value == *name => Some(prop.as_ref()),
                _ => None,
            },
            Prop::Shorthand(ident) if ident.sym == *name => Some(prop.as_ref()),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

/// String value of a `key: "value"` property.
pub fn prop_string_value(object: &ObjectLit, name: &str) -> Option<String> {
    match find_prop(object, name)? {
        Prop::KeyValue(kv) => static_str(&kv.value),
        _ => None,
    }
}

/// Whether a property exists with a truthy literal value, or as shorthand
/// (`{ count }`), which i18next treats as "plural form requested".
pub fn prop_is_present(object: &ObjectLit, name: &str) -> bool {
    find_prop(object, name).is_some()
}

/// String-valued properties whose key starts with `prefix`, keyed by the
/// remainder of the name after the prefix. Used to collect an options
/// object's `defaultValue_<category>` family without knowing the category
/// set up front.
pub fn string_props_by_prefix(object: &ObjectLit, prefix: &str) -> std::collections::HashMap<String, String> {
    object
        .props
        .iter()
        .filter_map(|p| match p {
            PropOrSpread::Prop(prop) => match prop.as_ref() {
                Prop::KeyValue(kv) => {
                    let name = match &kv.key {
                        PropName::Ident(ident) => ident.sym.as_str(),
                        PropName::Str(s) => s.value.as_str()?,
                        _ => return None,
                    };
                    let suffix = name.strip_prefix(prefix)?;
                    if suffix.is_empty() {
                        return None;
                    }
                    static_str(&kv.value).map(|value| (suffix.to_string(), value))
                }
                _ => None,
            },
            PropOrSpread::Spread(_) => None,
        })
        .collect()
}

/// Whether any property's key starts with `prefix` — used for the
/// "any `defaultValue*` property present" explicit-default check, which
/// covers both the exact `defaultValue` prop and the `defaultValue_<cat>`
/// family without listing every category.
pub fn has_prop_with_prefix(object: &ObjectLit, prefix: &str) -> bool {
    object.props.iter().any(|p| match p {
        PropOrSpread::Prop(prop) => match prop.as_ref() {
            Prop::KeyValue(kv) => {
                let name = match &kv.key {
                    PropName::Ident(ident) => ident.sym.as_str(),
                    PropName::Str(s) => match s.value.as_str() {
                        Some(v) => v,
                        None => return false,
                    },
                    _ => return false,
                };
                name.starts_with(prefix)
            }
            _ => false,
        },
        PropOrSpread::Spread(_) => false,
    })
}

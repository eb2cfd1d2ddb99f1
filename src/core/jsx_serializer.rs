//! Serializing `<Trans>` children into the canonical placeholder string
//! i18next stores as a key's default value.
//!
//! Element children become indexed placeholders (`<0>...</0>`); a configured
//! set of "basic" tags (`transKeepBasicHtmlNodesFor`, e.g. `br`, `strong`,
//! `i`, `p`) are kept literal instead and don't consume a slot. The index `N`
//! isn't a running count of elements alone — it's the element's position in
//! a pre-order walk of every child that isn't a bare text node: a plain
//! string/identifier/object expression container consumes a slot position
//! just as an element does, it just never surfaces as a numbered tag. Only
//! `JSXText` nodes and preserved elements are excluded from that count (see
//! `serialize_expr_container`'s handling of the single-space `{" "}` case,
//! the one expression shape where this matters for literal output too).

use swc_ecma_ast::{Expr, JSXElement, JSXElementChild, JSXElementName, JSXExpr, Lit};

use crate::core::ast_utils::{flatten_member_chain, static_str};

/// Serialize a `<Trans>` element's children into the placeholder string.
pub fn serialize_children(children: &[JSXElementChild], preserved_tags: &[String]) -> String {
    let mut slot = 0usize;
    let mut out = String::new();
    serialize_into(children, preserved_tags, &mut slot, &mut out);
    out.trim().to_string()
}

fn serialize_into(
    children: &[JSXElementChild],
    preserved_tags: &[String],
    slot: &mut usize,
    out: &mut String,
) {
    for (index, child) in children.iter().enumerate() {
        match child {
            JSXElementChild::JSXText(text) => out.push_str(&normalize_jsx_text(&text.value)),
            JSXElementChild::JSXExprContainer(container) => match &container.expr {
                JSXExpr::Expr(expr) => serialize_expr_container(expr, children, index, slot, out),
                JSXExpr::JSXEmptyExpr(_) => {}
            },
            JSXElementChild::JSXElement(element) => {
                serialize_element(element, preserved_tags, slot, out)
            }
            JSXElementChild::JSXFragment(fragment) => {
                serialize_into(&fragment.children, preserved_tags, slot, out)
            }
            JSXElementChild::JSXSpreadChild(_) => {}
        }
    }
}

/// What a sibling position holds, for classifying an explicit `{" "}`
/// expression's relationship to its neighbors.
enum Neighbor {
    ElementOrFragment,
    NewlineOnlyText,
    Text,
    Other,
    Boundary,
}

fn neighbor_kind(children: &[JSXElementChild], index: usize) -> Neighbor {
    match children.get(index) {
        Some(JSXElementChild::JSXElement(_) | JSXElementChild::JSXFragment(_)) => Neighbor::ElementOrFragment,
        Some(JSXElementChild::JSXText(text)) => {
            if text.value.trim().is_empty() && text.value.contains('\n') {
                Neighbor::NewlineOnlyText
            } else {
                Neighbor::Text
            }
        }
        Some(_) => Neighbor::Other,
        None => Neighbor::Boundary,
    }
}

fn serialize_expr_container(
    expr: &Expr,
    siblings: &[JSXElementChild],
    index: usize,
    slot: &mut usize,
    out: &mut String,
) {
    if let Expr::Lit(Lit::Str(s)) = expr
        && s.value.as_str() == Some(" ")
    {
        let prev = if index == 0 {
            Neighbor::Boundary
        } else {
            neighbor_kind(siblings, index - 1)
        };
        let next = neighbor_kind(siblings, index + 1);

        // Pure layout separator between an element/fragment and a
        // following run of newline-only formatting text: contributes
        // nothing, not even a slot.
        if matches!(prev, Neighbor::ElementOrFragment) && matches!(next, Neighbor::NewlineOnlyText) {
            return;
        }
        // Adjacent to an actual text node: folds into that text rather
        // than standing as its own token.
        if matches!(prev, Neighbor::Text) || matches!(next, Neighbor::Text) {
            out.push(' ');
            return;
        }
        // Otherwise it's a slot-eligible token: it renders as a literal
        // space but still occupies a position in the pre-order slot count,
        // the way a same-position real element would.
        *slot += 1;
        out.push(' ');
        return;
    }

    *slot += 1;
    if let Expr::Lit(Lit::Str(_)) = expr
        && let Some(s) = static_str(expr)
    {
        out.push_str(&s);
        return;
    }
    out.push_str("{{");
    out.push_str(&interpolation_name(expr));
    out.push_str("}}");
}

fn serialize_element(
    element: &JSXElement,
    preserved_tags: &[String],
    slot: &mut usize,
    out: &mut String,
) {
    let tag_name = element_tag_name(element);
    let preserved = tag_name
        .as_deref()
        .is_some_and(|name| preserved_tags.iter().any(|t| t == name));

    if preserved {
        let name = tag_name.unwrap();
        if element.children.is_empty() {
            out.push('<');
            out.push_str(&name);
            out.push_str("/>");
            return;
        }
        out.push('<');
        out.push_str(&name);
        out.push('>');
        serialize_into(&element.children, preserved_tags, slot, out);
        out.push_str("</");
        out.push_str(&name);
        out.push('>');
        return;
    }

    let idx = *slot;
    *slot += 1;
    if element.children.is_empty() {
        out.push('<');
        out.push_str(&idx.to_string());
        out.push_str("/>");
        return;
    }
    out.push('<');
    out.push_str(&idx.to_string());
    out.push('>');
    if let Some(key) = single_absorbed_object_child(&element.children) {
        out.push_str("{{");
        out.push_str(&key);
        out.push_str("}}");
    } else {
        serialize_into(&element.children, preserved_tags, slot, out);
    }
    out.push_str("</");
    out.push_str(&idx.to_string());
    out.push('>');
}

/// An object expression with a single identifier-keyed property, when it's
/// the sole child of a non-preserved element, is absorbed into that
/// element's tag rather than becoming its own numbered slot.
fn single_absorbed_object_child(children: &[JSXElementChild]) -> Option<String> {
    let [JSXElementChild::JSXExprContainer(container)] = children else {
        return None;
    };
    let JSXExpr::Expr(expr) = &container.expr else {
        return None;
    };
    let Expr::Object(object) = expr.as_ref() else {
        return None;
    };
    if object.props.len() != 1 {
        return None;
    }
    match object.props.first()? {
        swc_ecma_ast::PropOrSpread::Prop(prop) => match prop.as_ref() {
            swc_ecma_ast::Prop::KeyValue(kv) => match &kv.key {
                swc_ecma_ast::PropName::Ident(ident) => Some(ident.sym.to_string()),
                _ => None,
            },
            swc_ecma_ast::Prop::Shorthand(ident) => Some(ident.sym.to_string()),
            _ => None,
        },
        swc_ecma_ast::PropOrSpread::Spread(_) => None,
    }
}

fn element_tag_name(element: &JSXElement) -> Option<String> {
    match &element.opening.name {
        JSXElementName::Ident(ident) => Some(ident.sym.to_string()),
        _ => None,
    }
}

/// Name used inside `{{name}}` for an interpolated expression.
fn interpolation_name(expr: &Expr) -> String {
    match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        Expr::Member(_) => flatten_member_chain(expr)
            .and_then(|segments| segments.last().cloned())
            .unwrap_or_else(|| "value".to_string()),
        Expr::Call(call) => match &call.callee {
            swc_ecma_ast::Callee::Expr(callee_expr) => flatten_member_chain(callee_expr)
                .and_then(|segments| segments.last().cloned())
                .unwrap_or_else(|| "value".to_string()),
            _ => "value".to_string(),
        },
        Expr::Object(object) if object.props.len() == 1 => object
            .props
            .first()
            .and_then(|p| match p {
                swc_ecma_ast::PropOrSpread::Prop(prop) => match prop.as_ref() {
                    swc_ecma_ast::Prop::KeyValue(kv) => match &kv.key {
                        swc_ecma_ast::PropName::Ident(ident) => Some(ident.sym.to_string()),
                        _ => None,
                    },
                    swc_ecma_ast::Prop::Shorthand(ident) => Some(ident.sym.to_string()),
                    _ => None,
                },
                swc_ecma_ast::PropOrSpread::Spread(_) => None,
            })
            .unwrap_or_else(|| "value".to_string()),
        _ => "value".to_string(),
    }
}

/// Collapse JSX source formatting: a whitespace run containing a newline is
/// pure indentation and drops out entirely; a run with no newline (e.g. the
/// single space between `<b>x</b> y`) collapses to one space.
fn normalize_jsx_text(raw: &str) -> String {
    let mut out = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            let mut saw_newline = c == '\n';
            while let Some(&next) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                saw_newline |= next == '\n';
                chars.next();
            }
            if !saw_newline {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

    fn parse_children(src: &str) -> Vec<JSXElementChild> {
        let wrapped = format!("<Trans>{src}</Trans>");
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });
        let input = StringInput::new(&wrapped, Default::default(), Default::default());
        let mut parser = Parser::new(syntax, input, None);
        let expr = *parser.parse_expr().expect("parse expr").take();
        match expr {
            Expr::JSXElement(element) => element.children,
            other => panic!("expected jsx element, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_passes_through() {
        let children = parse_children("Hello world");
        assert_eq!(serialize_children(&children, &[]), "Hello world");
    }

    #[test]
    fn non_preserved_element_gets_slot_index() {
        let children = parse_children("Click <button>here</button> now");
        assert_eq!(
            serialize_children(&children, &[]),
            "Click <0>here</0> now"
        );
    }

    #[test]
    fn preserved_tag_stays_literal() {
        let children = parse_children("Hello <strong>world</strong>");
        assert_eq!(
            serialize_children(&children, &["strong".to_string()]),
            "Hello <strong>world</strong>"
        );
    }

    #[test]
    fn preserved_and_non_preserved_indices_are_independent() {
        let children = parse_children("<strong>A</strong> and <em>B</em>");
        assert_eq!(
            serialize_children(&children, &["strong".to_string()]),
            "<strong>A</strong> and <0>B</0>"
        );
    }

    #[test]
    fn void_element_self_closes() {
        let children = parse_children("Line one<br/>Line two");
        assert_eq!(
            serialize_children(&children, &["br".to_string()]),
            "Line one<br/>Line two"
        );
    }

    #[test]
    fn identifier_expression_becomes_interpolation() {
        let children = parse_children("Hello {name}");
        assert_eq!(serialize_children(&children, &[]), "Hello {{name}}");
    }

    #[test]
    fn member_expression_uses_last_segment() {
        let children = parse_children("Hi {user.name}");
        assert_eq!(serialize_children(&children, &[]), "Hi {{name}}");
    }

    #[test]
    fn newline_formatting_whitespace_collapses_away() {
        let children = parse_children("\n  Hello\n  <b>world</b>\n");
        assert_eq!(serialize_children(&children, &[]), "Hello<0>world</0>");
    }

    #[test]
    fn slot_index_counts_every_non_text_sibling_not_just_elements() {
        let children = parse_children(
            "<span>{{username}}</span>{\" \"}{\"got\"}{\" \"}<span>{{count}}</span>{\" \"}{\"ticket\"}",
        );
        assert_eq!(
            serialize_children(&children, &[]),
            "<0>{{username}}</0> got <4>{{count}}</4> ticket"
        );
    }
}

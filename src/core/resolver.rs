//! Resolving a call argument expression to the finite set of string values
//! it can statically take on.
//!
//! Every translation call's key argument (and every JSX `i18nKey`/`defaults`
//! attribute) is analyzed into a `ValueSource` tree, then flattened with
//! `resolve_keys()`. Expressions this can't characterize collapse to
//! `Unresolvable` with a reason, never a panic or a guess.

use swc_ecma_ast::{ArrowExpr, BlockStmtOrExpr, Expr, Lit, Pat, TsType};

use crate::core::ast_utils::flatten_member_chain;
use crate::core::scope::LocalBindings;

/// The possible values an expression can resolve to, as a small tree so
/// composite expressions (templates, conditionals) can nest.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    /// A literal string: `"home.title"`.
    Literal(String),

    /// A template literal with any number of interpolations:
    /// `` `prefix.${a}.${b}.suffix` ``. `quasis` holds the `exprs.len() + 1`
    /// literal text segments surrounding each substitution; `resolve_keys`
    /// computes the Cartesian product of every substitution's candidates
    /// against those quasis. A substitution that can't be resolved
    /// contributes the empty set for its position, collapsing the whole
    /// product to no candidates.
    Template {
        quasis: Vec<String>,
        exprs: Vec<Box<ValueSource>>,
    },

    /// A ternary: `cond ? a : b`. Both branches must resolve for the whole
    /// expression to resolve; their candidates are unioned.
    Conditional {
        consequent: Box<ValueSource>,
        alternate: Box<ValueSource>,
    },

    /// `obj[k]` where `obj` is a same-file object-literal binding: resolves
    /// to all of the object's string-valued properties, since the actual
    /// key used can't be determined statically.
    ObjectAccess {
        object_name: String,
        candidate_values: Vec<String>,
    },

    /// `arr.map(item => item.prop)` where `arr` is a same-file array of
    /// object literals: resolves to all values `prop` takes across elements.
    ArrayIteration {
        array_name: String,
        property_name: String,
        candidate_values: Vec<String>,
    },

    /// `arr.map(item => item)` / `arr[i]` where `arr` is a same-file array
    /// of string literals: resolves to all of its elements.
    StringArrayElement {
        array_name: String,
        candidate_values: Vec<String>,
    },

    /// A TypeScript literal or union-of-literals type, e.g. an argument
    /// typed `"a" | "b"` via `as` or a satisfies assertion.
    TypeLiteral { candidate_values: Vec<String> },

    /// An inline array literal (`["a", "b"]`): resolves to every element's
    /// own candidates, concatenated in order.
    ArrayLiteral { candidate_values: Vec<String> },

    /// Genuinely can't be characterized statically.
    Unresolvable { reason: UnresolvableReason },
}

/// Extension seam for contributing extra candidate strings beyond what
/// static analysis can determine from the AST alone — e.g. a project-specific
/// build step that knows the runtime values a dynamic key can take on. The
/// default implementation contributes nothing; `resolve_for_key`/
/// `resolve_for_context` are the two call sites that consult it.
pub trait ResolverPlugin {
    fn extra_key_candidates(&self, _source: &ValueSource) -> Vec<String> {
        Vec::new()
    }

    fn extra_context_candidates(&self, _source: &ValueSource) -> Vec<String> {
        Vec::new()
    }
}

/// The plugin used when no project-specific extension is configured.
pub struct NoopResolverPlugin;

impl ResolverPlugin for NoopResolverPlugin {}

/// Why a `ValueSource` could not be resolved to concrete strings.
#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvableReason {
    /// A plain variable reference with no known binding: `t(keyName)`.
    UnknownVariable(String),
    /// `obj[k]` where `obj` isn't a tracked same-file object literal.
    UnknownObject(String),
    /// An array reference that isn't a tracked same-file array literal.
    UnknownArray(String),
    /// An expression shape extraction doesn't attempt to characterize
    /// (function calls, binary expressions, etc. other than `&&`/`||`/`?:`).
    UnsupportedExpression { expr_type: &'static str },
}

impl ValueSource {
    /// Build a `ValueSource` from a call-argument expression.
    ///
    /// `scope` supplies candidate values for identifiers bound to object or
    /// array literals earlier in the same file — this is the only state
    /// carried between expressions, and it never crosses file boundaries.
    pub fn from_expr(expr: &Expr, scope: &LocalBindings) -> ValueSource {
        match expr {
            Expr::Lit(Lit::Str(s)) => ValueSource::Literal(s.value.to_atom_lossy().to_string()),
            Expr::Lit(Lit::Num(n)) => ValueSource::Literal(format!("{}", n.value)),
            Expr::Lit(Lit::Bool(b)) => ValueSource::Literal(b.value.to_string()),

            Expr::Tpl(tpl) => Self::from_template(tpl, scope),

            Expr::Array(array) => {
                let candidate_values = array
                    .elems
                    .iter()
                    .flatten()
                    .filter_map(|elem| Self::from_expr(&elem.expr, scope).resolve_keys().ok())
                    .flatten()
                    .collect();
                ValueSource::ArrayLiteral { candidate_values }
            }

            Expr::Arrow(arrow) => match Self::selector_api_path(arrow) {
                Some(path) => ValueSource::Literal(path),
                None => ValueSource::Unresolvable {
                    reason: UnresolvableReason::UnsupportedExpression {
                        expr_type: "ArrowFunctionExpression",
                    },
                },
            },

            Expr::Cond(cond) => ValueSource::Conditional {
                consequent: Box::new(Self::from_expr(&cond.cons, scope)),
                alternate: Box::new(Self::from_expr(&cond.alt, scope)),
            },

            Expr::Paren(paren) => Self::from_expr(&paren.expr, scope),

            Expr::TsAs(cast) => Self::from_ts_cast(&cast.expr, &cast.type_ann, scope),
            Expr::TsSatisfies(cast) => Self::from_ts_cast(&cast.expr, &cast.type_ann, scope),
            Expr::TsConstAssertion(cast) => Self::from_expr(&cast.expr, scope),
            Expr::TsNonNull(inner) => Self::from_expr(&inner.expr, scope),

            Expr::Ident(ident) => {
                let name = ident.sym.to_string();
                if let Some(values) = scope.string_array(&name) {
                    ValueSource::StringArrayElement {
                        array_name: name,
                        candidate_values: values,
                    }
                } else {
                    ValueSource::Unresolvable {
                        reason: UnresolvableReason::UnknownVariable(name),
                    }
                }
            }

            Expr::Member(member) if member.prop.is_computed() => {
                if let Expr::Ident(obj_ident) = &*member.obj {
                    let name = obj_ident.sym.to_string();
                    if let Some(values) = scope.object_values(&name) {
                        ValueSource::ObjectAccess {
                            object_name: name,
                            candidate_values: values,
                        }
                    } else if let Some(values) = scope.string_array(&name) {
                        ValueSource::StringArrayElement {
                            array_name: name,
                            candidate_values: values,
                        }
                    } else {
                        ValueSource::Unresolvable {
                            reason: UnresolvableReason::UnknownObject(name),
                        }
                    }
                } else {
                    ValueSource::Unresolvable {
                        reason: UnresolvableReason::UnsupportedExpression {
                            expr_type: "computed member access on non-identifier",
                        },
                    }
                }
            }

            other => ValueSource::Unresolvable {
                reason: UnresolvableReason::UnsupportedExpression {
                    expr_type: expr_type_name(other),
                },
            },
        }
    }

    /// Build from `array.map(item => item.prop)` / `.forEach(...)` callback
    /// bodies, given the iterated array's name and the callback parameter.
    pub fn from_iteration(array_name: &str, property_name: Option<&str>, scope: &LocalBindings) -> ValueSource {
        match property_name {
            Some(prop) => match scope.array_property_values(array_name, prop) {
                Some(values) => ValueSource::ArrayIteration {
                    array_name: array_name.to_string(),
                    property_name: prop.to_string(),
                    candidate_values: values,
                },
                None => ValueSource::Unresolvable {
                    reason: UnresolvableReason::UnknownArray(array_name.to_string()),
                },
            },
            None => match scope.string_array(array_name) {
                Some(values) => ValueSource::StringArrayElement {
                    array_name: array_name.to_string(),
                    candidate_values: values,
                },
                None => ValueSource::Unresolvable {
                    reason: UnresolvableReason::UnknownArray(array_name.to_string()),
                },
            },
        }
    }

    fn from_template(tpl: &swc_ecma_ast::Tpl, scope: &LocalBindings) -> ValueSource {
        let quasis: Vec<String> = tpl
            .quasis
            .iter()
            .map(|q| {
                q.cooked
                    .as_ref()
                    .map(|s| s.to_atom_lossy().to_string())
                    .unwrap_or_default()
            })
            .collect();

        if tpl.exprs.is_empty() {
            return ValueSource::Literal(quasis.into_iter().next().unwrap_or_default());
        }

        let exprs = tpl
            .exprs
            .iter()
            .map(|expr| Box::new(Self::from_expr(expr, scope)))
            .collect();

        ValueSource::Template { quasis, exprs }
    }

    /// Match `$ => $.a.b.c`-shaped Selector-API arrow bodies, where a single
    /// arrow parameter is immediately followed by a chain of identifier
    /// member accesses on it. Resolves to the dotted path after the
    /// parameter (`"a.b.c"`), however the parameter itself is named.
    fn selector_api_path(arrow: &ArrowExpr) -> Option<String> {
        let [Pat::Ident(param)] = arrow.params.as_slice() else {
            return None;
        };
        let body_expr = match arrow.body.as_ref() {
            BlockStmtOrExpr::Expr(expr) => expr.as_ref(),
            BlockStmtOrExpr::BlockStmt(_) => return None,
        };
        let segments = flatten_member_chain(body_expr)?;
        let (root, rest) = segments.split_first()?;
        if *root != *param.id.sym || rest.is_empty() {
            return None;
        }
        Some(rest.join("."))
    }

    fn from_ts_cast(expr: &Expr, type_ann: &TsType, scope: &LocalBindings) -> ValueSource {
        if let Some(values) = ts_literal_union_values(type_ann) {
            return ValueSource::TypeLiteral {
                candidate_values: values,
            };
        }
        Self::from_expr(expr, scope)
    }

    /// Flatten the tree into all candidate strings, or the reason resolution
    /// failed. Both branches of a `Conditional` must resolve, or the whole
    /// expression does.
    pub(crate) fn resolve_keys(&self) -> Result<Vec<String>, UnresolvableReason> {
        match self {
            ValueSource::Literal(s) => Ok(vec![s.clone()]),

            ValueSource::Template { quasis, exprs } => {
                // Cartesian product: start with the leading literal text,
                // then for each substitution expand every existing prefix
                // by every candidate value the substitution can take on. An
                // unresolvable substitution contributes no candidates,
                // which collapses the whole product to empty.
                let mut combinations = vec![quasis[0].clone()];
                for (i, expr) in exprs.iter().enumerate() {
                    let candidates = expr.resolve_keys().unwrap_or_default();
                    let suffix = &quasis[i + 1];
                    combinations = combinations
                        .iter()
                        .flat_map(|prefix| {
                            candidates
                                .iter()
                                .map(move |candidate| format!("{prefix}{candidate}{suffix}"))
                        })
                        .collect();
                }
                Ok(combinations)
            }

            ValueSource::Conditional {
                consequent,
                alternate,
            } => {
                let mut cons_keys = consequent.resolve_keys()?;
                let alt_keys = alternate.resolve_keys()?;
                cons_keys.extend(alt_keys);
                Ok(cons_keys)
            }

            ValueSource::ObjectAccess {
                candidate_values, ..
            }
            | ValueSource::ArrayIteration {
                candidate_values, ..
            }
            | ValueSource::StringArrayElement {
                candidate_values, ..
            }
            | ValueSource::TypeLiteral { candidate_values }
            | ValueSource::ArrayLiteral { candidate_values } => Ok(candidate_values.clone()),

            ValueSource::Unresolvable { reason } => Err(reason.clone()),
        }
    }

    /// Resolve a value appearing in key position (`t(<here>)`, `i18nKey`).
    /// Goes through `plugin` so a downstream consumer can contribute extra
    /// candidates this static analysis alone wouldn't find.
    pub fn resolve_for_key(&self, plugin: &dyn ResolverPlugin) -> Result<Vec<String>, UnresolvableReason> {
        let mut keys = self.resolve_keys()?;
        keys.extend(plugin.extra_key_candidates(self));
        Ok(keys)
    }

    /// Resolve a value appearing in a `context` option/attribute position.
    /// Separate from `resolve_for_key` because a context argument's
    /// candidates feed a different plugin hook — a consumer may want to
    /// contribute context values without also contributing keys, or vice
    /// versa.
    pub fn resolve_for_context(&self, plugin: &dyn ResolverPlugin) -> Result<Vec<String>, UnresolvableReason> {
        let mut values = self.resolve_keys()?;
        values.extend(plugin.extra_context_candidates(self));
        Ok(values)
    }

    pub fn source_description(&self) -> String {
        match self {
            ValueSource::Literal(s) => format!("literal \"{s}\""),
            ValueSource::Template { .. } => "template".to_string(),
            ValueSource::Conditional { .. } => "conditional".to_string(),
            ValueSource::ObjectAccess { object_name, .. } => format!("object \"{object_name}\""),
            ValueSource::ArrayIteration {
                array_name,
                property_name,
                ..
            } => format!("array \"{array_name}.{property_name}\""),
            ValueSource::StringArrayElement { array_name, .. } => format!("array \"{array_name}\""),
            ValueSource::TypeLiteral { .. } => "type literal".to_string(),
            ValueSource::ArrayLiteral { .. } => "array literal".to_string(),
            ValueSource::Unresolvable { reason } => match reason {
                UnresolvableReason::UnknownVariable(v) => format!("unknown variable \"{v}\""),
                UnresolvableReason::UnknownObject(o) => format!("unknown object \"{o}\""),
                UnresolvableReason::UnknownArray(a) => format!("unknown array \"{a}\""),
                UnresolvableReason::UnsupportedExpression { expr_type } => {
                    format!("unsupported expression: {expr_type}")
                }
            },
        }
    }
}

fn ts_literal_union_values(ty: &TsType) -> Option<Vec<String>> {
    match ty {
        TsType::TsLitType(lit) => match &lit.lit {
            swc_ecma_ast::TsLit::Str(s) => Some(vec![s.value.to_atom_lossy().to_string()]),
            _ => None,
        },
        TsType::TsUnionOrIntersectionType(swc_ecma_ast::TsUnionOrIntersectionType::TsUnionType(
            union,
        )) => {
            let mut values = Vec::new();
            for member in &union.types {
                values.push(ts_literal_union_values(member)?.into_iter().next()?);
            }
            Some(values)
        }
        _ => None,
    }
}

fn expr_type_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Call(_) => "CallExpression",
        Expr::Bin(_) => "BinaryExpression",
        Expr::Member(_) => "MemberExpression",
        Expr::Arrow(_) => "ArrowFunctionExpression",
        Expr::Fn(_) => "FunctionExpression",
        Expr::Await(_) => "AwaitExpression",
        Expr::Unary(_) => "UnaryExpression",
        _ => "Expression",
    }
}

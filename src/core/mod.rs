//! The extraction engine: parse one source file, walk its AST, and fold
//! every recognized translation call/component into an `ExtractedKeyMap`.
//!
//! Submodules build on each other in one direction only, each named after
//! the thing it does rather than a pipeline stage:
//!
//! - [`data`] — the record types (`ExtractedKey`, `ExtractedKeyMap`, `ScopeInfo`, `SourceLocation`)
//! - [`ast_utils`] — stateless swc AST reading helpers every other module shares
//! - [`resolver`] — characterizing a key argument's possible string values (`ValueSource`)
//! - [`scope`] — tracking `t`/`i18n` bindings and same-file object/array literals
//! - [`jsx_serializer`] — turning `<Trans>` children into a placeholder default value
//! - [`plural`] — CLDR plural-category suffixes for a `count` option
//! - [`call_site`] — `t(...)` call handling
//! - [`jsx_handler`] — `<Trans>` element handling
//! - [`parser`] — per-file swc parsing
//! - [`walker`] — the `Visit` implementation that drives the above across one file
//! - [`engine`] — fanning the walker out across a file list and folding the results

pub mod ast_utils;
pub mod call_site;
pub mod data;
pub mod engine;
pub mod jsx_handler;
pub mod jsx_serializer;
pub mod parser;
pub mod plural;
pub mod resolver;
pub mod scope;
pub mod walker;

pub use data::{ExtractedKey, ExtractedKeyMap, ScopeInfo, SourceLocation};
pub use engine::{extract_from_source, extract_from_sources, ExtractionOutcome};
pub use resolver::{UnresolvableReason, ValueSource};

//! Warnings the walker can attach to an extraction run.
//!
//! A file visit never aborts: anything it can't make sense of becomes one
//! of these instead. Two cases deliberately produce *no* warning at all —
//! an unresolvable dynamic key (expected; covered externally by
//! `preservePatterns`) and an AST node shape the walker doesn't recognize
//! (silently skipped, since new syntax shouldn't halt extraction).

use enum_dispatch::enum_dispatch;

use crate::core::SourceLocation;

/// Warning identifier, used for filtering/grouping by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ParseFailure,
    MalformedSubtree,
    EmptyKeyAfterStrip,
    InvalidKeyPrefix,
    PluralRulesLookupFailure,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ParseFailure => write!(f, "parse-failure"),
            Rule::MalformedSubtree => write!(f, "malformed-subtree"),
            Rule::EmptyKeyAfterStrip => write!(f, "empty-key-after-strip"),
            Rule::InvalidKeyPrefix => write!(f, "invalid-key-prefix"),
            Rule::PluralRulesLookupFailure => write!(f, "plural-rules-lookup-failure"),
        }
    }
}

/// File could not be parsed as JS/TS/JSX at all. The file produces no keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailureWarning {
    pub file_path: String,
    pub message: String,
}

/// A recognized call/component shape had an argument or child the walker
/// couldn't interpret (e.g. a `<Trans>` with a spread child).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSubtreeWarning {
    pub location: SourceLocation,
    pub detail: String,
}

/// Stripping `keyPrefix`/namespace left an empty string key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyKeyAfterStripWarning {
    pub location: SourceLocation,
    pub original_key: String,
}

/// Joining `keyPrefix` with the key left an empty path segment (e.g. an
/// empty key with a non-empty prefix becomes `"form."`). The combined key
/// is rejected rather than emitted with a trailing/leading separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKeyPrefixWarning {
    pub location: SourceLocation,
    pub key_prefix: String,
    pub key: String,
}

/// `icu_plurals` had no rule data for a configured locale; that locale's
/// categories fall back to `["other"]` for the affected key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRulesLookupFailureWarning {
    pub locale: String,
}

#[enum_dispatch]
pub trait Report {
    fn rule(&self) -> Rule;
    fn message(&self) -> String;
}

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    ParseFailure(ParseFailureWarning),
    MalformedSubtree(MalformedSubtreeWarning),
    EmptyKeyAfterStrip(EmptyKeyAfterStripWarning),
    InvalidKeyPrefix(InvalidKeyPrefixWarning),
    PluralRulesLookupFailure(PluralRulesLookupFailureWarning),
}

impl Report for ParseFailureWarning {
    fn rule(&self) -> Rule {
        Rule::ParseFailure
    }
    fn message(&self) -> String {
        format!("failed to parse {}: {}", self.file_path, self.message)
    }
}

impl Report for MalformedSubtreeWarning {
    fn rule(&self) -> Rule {
        Rule::MalformedSubtree
    }
    fn message(&self) -> String {
        format!(
            "{}:{}: {}",
            self.location.file_path, self.location.line, self.detail
        )
    }
}

impl Report for EmptyKeyAfterStripWarning {
    fn rule(&self) -> Rule {
        Rule::EmptyKeyAfterStrip
    }
    fn message(&self) -> String {
        format!(
            "{}:{}: key \"{}\" became empty after stripping separators",
            self.location.file_path, self.location.line, self.original_key
        )
    }
}

impl Report for InvalidKeyPrefixWarning {
    fn rule(&self) -> Rule {
        Rule::InvalidKeyPrefix
    }
    fn message(&self) -> String {
        format!(
            "{}:{}: keyPrefix \"{}\" combined with key \"{}\" produced an empty segment",
            self.location.file_path, self.location.line, self.key_prefix, self.key
        )
    }
}

impl Report for PluralRulesLookupFailureWarning {
    fn rule(&self) -> Rule {
        Rule::PluralRulesLookupFailure
    }
    fn message(&self) -> String {
        format!("no CLDR plural rules found for locale \"{}\"", self.locale)
    }
}

//! The record produced by a single extraction and the map it folds into.

use std::collections::HashMap;

use super::location::SourceLocation;

/// Namespace and key-prefix in effect at a translation call site.
///
/// Populated by the scope manager from the nearest enclosing
/// `useTranslation`/`getFixedT` binding, then threaded down to the call-site
/// and JSX handlers so they can build a key's full dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeInfo {
    /// Namespace bound by `useTranslation("ns")` / `getFixedT(lng, "ns")`.
    pub default_namespace: Option<String>,
    /// Prefix bound by `useTranslation("ns", { keyPrefix: "..." })`.
    pub key_prefix: Option<String>,
}

impl ScopeInfo {
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: Some(namespace.into()),
            key_prefix: None,
        }
    }

    /// Apply `key_prefix`, joining with `keySeparator`, ahead of a raw key.
    ///
    /// Returns `Err` holding the prefix if the join produces an empty
    /// segment — e.g. an empty key joined onto a prefix yields `"form."`,
    /// which downstream locale files can't represent as a meaningful path.
    pub fn apply_prefix(&self, key: &str, key_separator: &str) -> Result<String, &str> {
        match &self.key_prefix {
            Some(prefix) if !prefix.is_empty() => {
                let joined = format!("{prefix}{key_separator}{key}");
                if !key_separator.is_empty() && joined.split(key_separator).any(str::is_empty) {
                    Err(prefix.as_str())
                } else {
                    Ok(joined)
                }
            }
            _ => Ok(key.to_string()),
        }
    }
}

/// One discovered translation key, as extracted from a single call site.
///
/// Two `ExtractedKey`s extracted from different call sites are merged into
/// one record by `ExtractedKeyMap::insert` whenever their `namespace`/`key`
/// pair matches — see that method for the merge rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedKey {
    pub key: String,
    pub namespace: Option<String>,
    pub default_value: Option<String>,
    pub has_count: bool,
    pub is_ordinal: bool,
    /// True when `default_value` was written explicitly at the call site
    /// (`defaultValue` option, or a Trans child), as opposed to inferred.
    pub explicit_default: bool,
    /// For a context variant, the base key it was expanded from — used by
    /// downstream tooling to detect a context suffix whose base key has no
    /// sibling entry (an "orphaned" context variant). `None` on the base key
    /// itself and on keys with no context option at all.
    pub key_accepting_context: Option<String>,
    pub locations: Vec<SourceLocation>,
}

impl ExtractedKey {
    pub fn new(key: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            key: key.into(),
            namespace,
            default_value: None,
            has_count: false,
            is_ordinal: false,
            explicit_default: false,
            key_accepting_context: None,
            locations: Vec::new(),
        }
    }

    /// Full dotted path as it would appear in a locale file: `ns separator key`.
    pub fn full_key(&self, ns_separator: &str) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}{ns_separator}{}", self.key),
            _ => self.key.clone(),
        }
    }

    fn merge_from(&mut self, other: ExtractedKey) {
        self.has_count |= other.has_count;
        self.is_ordinal |= other.is_ordinal;
        if self.key_accepting_context.is_none() {
            self.key_accepting_context = other.key_accepting_context;
        }

        // An explicit default always wins over an inferred or missing one;
        // between two explicit defaults the first seen is kept, matching
        // insertion-order semantics for everything else in this record.
        if other.explicit_default && !self.explicit_default {
            self.default_value = other.default_value;
            self.explicit_default = true;
        } else if self.default_value.is_none() {
            self.default_value = other.default_value;
        }

        for loc in other.locations {
            if !self.locations.contains(&loc) {
                self.locations.push(loc);
            }
        }
    }
}

/// Accumulator of `ExtractedKey` records, keyed by `(namespace, key)`.
///
/// Built by folding each file's independently-extracted keys into a shared
/// map — see the module-level concurrency notes on `crate::core::engine`.
/// Insertion order of `locations` within a merged record is preserved: the
/// location from whichever call site is folded in first comes first.
#[derive(Debug, Clone, Default)]
pub struct ExtractedKeyMap {
    entries: HashMap<(Option<String>, String), ExtractedKey>,
    /// Preserves first-seen order of `(namespace, key)` pairs across merges.
    order: Vec<(Option<String>, String)>,
}

impl ExtractedKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ExtractedKey) {
        let id = (entry.namespace.clone(), entry.key.clone());
        match self.entries.get_mut(&id) {
            Some(existing) => existing.merge_from(entry),
            None => {
                self.order.push(id.clone());
                self.entries.insert(id, entry);
            }
        }
    }

    /// Fold another map's entries into this one, in the other map's
    /// insertion order. Associative and commutative up to location
    /// ordering, which follows the order the two maps are merged in.
    pub fn merge(&mut self, other: ExtractedKeyMap) {
        for id in other.order {
            if let Some(entry) = other.entries.get(&id) {
                self.insert(entry.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, namespace: Option<&str>, key: &str) -> Option<&ExtractedKey> {
        self.entries
            .get(&(namespace.map(str::to_string), key.to_string()))
    }

    /// Iterate entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtractedKey> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize) -> SourceLocation {
        SourceLocation::new("src/app/page.tsx", line, 1)
    }

    #[test]
    fn scope_info_applies_prefix() {
        let scope = ScopeInfo {
            default_namespace: Some("common".into()),
            key_prefix: Some("form".into()),
        };
        assert_eq!(scope.apply_prefix("submit", ".").unwrap(), "form.submit");
    }

    #[test]
    fn scope_info_without_prefix_is_passthrough() {
        let scope = ScopeInfo::with_namespace("common");
        assert_eq!(scope.apply_prefix("submit", ".").unwrap(), "submit");
    }

    #[test]
    fn scope_info_rejects_empty_segment_from_empty_key() {
        let scope = ScopeInfo {
            default_namespace: None,
            key_prefix: Some("form".into()),
        };
        assert_eq!(scope.apply_prefix("", ".").unwrap_err(), "form");
    }

    #[test]
    fn full_key_joins_namespace() {
        let key = ExtractedKey::new("submit", Some("common".into()));
        assert_eq!(key.full_key(":"), "common:submit");
    }

    #[test]
    fn full_key_without_namespace() {
        let key = ExtractedKey::new("submit", None);
        assert_eq!(key.full_key(":"), "submit");
    }

    #[test]
    fn insert_merges_has_count_and_locations() {
        let mut map = ExtractedKeyMap::new();
        let mut a = ExtractedKey::new("itemCount", Some("cart".into()));
        a.has_count = true;
        a.locations.push(loc(10));
        let mut b = ExtractedKey::new("itemCount", Some("cart".into()));
        b.is_ordinal = true;
        b.locations.push(loc(20));

        map.insert(a);
        map.insert(b);

        let merged = map.get(Some("cart"), "itemCount").unwrap();
        assert!(merged.has_count);
        assert!(merged.is_ordinal);
        assert_eq!(merged.locations, vec![loc(10), loc(20)]);
    }

    #[test]
    fn explicit_default_wins_over_inferred() {
        let mut map = ExtractedKeyMap::new();
        let mut a = ExtractedKey::new("title", None);
        a.default_value = Some("inferred".into());
        let mut b = ExtractedKey::new("title", None);
        b.default_value = Some("Explicit Title".into());
        b.explicit_default = true;

        map.insert(a);
        map.insert(b);

        let merged = map.get(None, "title").unwrap();
        assert_eq!(merged.default_value.as_deref(), Some("Explicit Title"));
        assert!(merged.explicit_default);
    }

    #[test]
    fn merge_preserves_first_seen_order() {
        let mut first = ExtractedKeyMap::new();
        first.insert(ExtractedKey::new("b", None));
        first.insert(ExtractedKey::new("a", None));

        let mut second = ExtractedKeyMap::new();
        second.insert(ExtractedKey::new("c", None));

        first.merge(second);

        let keys: Vec<&str> = first.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_locations_are_not_repeated() {
        let mut map = ExtractedKeyMap::new();
        let mut a = ExtractedKey::new("title", None);
        a.locations.push(loc(5));
        let mut b = ExtractedKey::new("title", None);
        b.locations.push(loc(5));

        map.insert(a);
        map.insert(b);

        assert_eq!(map.get(None, "title").unwrap().locations.len(), 1);
    }
}

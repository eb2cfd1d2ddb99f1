//! CLDR plural-category suffixes for a configured set of target locales.
//!
//! i18next stores one key per plural category a locale's language actually
//! distinguishes (`item_one`, `item_other`, or for Arabic also `item_zero`,
//! `item_two`, `item_few`, `item_many`). We look the categories up per
//! locale via `icu_plurals` and union them across every configured locale,
//! so a single source call site expands to every suffix any target locale
//! will need.

use icu_locid::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Canonical CLDR ordering; used so the suffix list is deterministic.
const CATEGORY_ORDER: [PluralCategory; 6] = [
    PluralCategory::Zero,
    PluralCategory::One,
    PluralCategory::Two,
    PluralCategory::Few,
    PluralCategory::Many,
    PluralCategory::Other,
];

fn category_suffix(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

fn categories_for_locale(locale: &str, ordinal: bool) -> Vec<PluralCategory> {
    let parsed: Locale = locale.parse().unwrap_or_default();
    let rule_type = if ordinal {
        PluralRuleType::Ordinal
    } else {
        PluralRuleType::Cardinal
    };
    let rules = match PluralRules::try_new(&parsed.into(), rule_type) {
        Ok(rules) => rules,
        Err(_) => return vec![PluralCategory::Other],
    };
    CATEGORY_ORDER
        .into_iter()
        .filter(|category| rules.categories().any(|c| c == *category))
        .collect()
}

/// Plural-key suffixes (e.g. `["one", "other"]`) to generate for a call
/// site with a `count` option, given the configured target locales and
/// optional primary language fast path.
pub fn plural_suffixes(locales: &[String], primary_language: Option<&str>, ordinal: bool) -> Vec<&'static str> {
    if let Some(lang) = primary_language
        && categories_for_locale(lang, ordinal) == [PluralCategory::Other]
    {
        return vec!["other"];
    }

    if locales.is_empty() {
        return vec!["one", "other"];
    }

    let mut union: Vec<PluralCategory> = Vec::new();
    for locale in locales {
        for category in categories_for_locale(locale, ordinal) {
            if !union.contains(&category) {
                union.push(category);
            }
        }
    }
    union.sort_by_key(|c| CATEGORY_ORDER.iter().position(|o| o == c).unwrap_or(usize::MAX));
    union.into_iter().map(category_suffix).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_has_one_and_other() {
        let suffixes = plural_suffixes(&["en".to_string()], None, false);
        assert_eq!(suffixes, vec!["one", "other"]);
    }

    #[test]
    fn single_category_primary_language_short_circuits() {
        let suffixes = plural_suffixes(
            &["en".to_string(), "ar".to_string()],
            Some("ja"),
            false,
        );
        assert_eq!(suffixes, vec!["other"]);
    }

    #[test]
    fn union_across_locales_includes_arabic_categories() {
        let suffixes = plural_suffixes(&["en".to_string(), "ar".to_string()], None, false);
        assert!(suffixes.contains(&"one"));
        assert!(suffixes.contains(&"other"));
        assert!(suffixes.contains(&"few"));
        assert!(suffixes.contains(&"many"));
    }

    #[test]
    fn no_locales_configured_falls_back_to_one_other() {
        let suffixes = plural_suffixes(&[], None, false);
        assert_eq!(suffixes, vec!["one", "other"]);
    }
}

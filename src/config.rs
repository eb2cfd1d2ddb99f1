use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".transkeyrc.json";

/// Options controlling how the extractor matches call sites and builds key
/// strings. Field names and defaults follow i18next's own scanner
/// conventions (`i18next-scanner`/`i18next-parser`) so an existing project's
/// locale layout needs no changes to be scanned.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Bound-function names/suffixes recognized as translation calls, e.g.
    /// `"t"` matches a bound `t`, `"*.t"` also matches `i18n.t`.
    #[serde(default = "default_functions")]
    pub functions: Vec<String>,
    /// Hook names that bind a translation function, e.g. `useTranslation`.
    /// Each entry is either a bare name or a record naming which argument
    /// positions carry the namespace and key-prefix for that hook.
    #[serde(default = "default_use_translation_names")]
    pub use_translation_names: Vec<HookSpec>,
    /// Component names recognized as `<Trans>`.
    #[serde(default = "default_trans_components")]
    pub trans_components: Vec<String>,
    /// Tags kept literal (not slot-indexed) when serializing `<Trans>` children.
    #[serde(default = "default_keep_basic_html_nodes_for")]
    pub trans_keep_basic_html_nodes_for: Vec<String>,
    #[serde(default = "default_default_ns")]
    pub default_ns: String,
    #[serde(default = "default_ns_separator")]
    pub ns_separator: String,
    #[serde(default = "default_key_separator")]
    pub key_separator: String,
    #[serde(default = "default_context_separator")]
    pub context_separator: String,
    #[serde(default = "default_plural_separator")]
    pub plural_separator: String,
    #[serde(default = "default_nesting_prefix")]
    pub nesting_prefix: String,
    #[serde(default = "default_nesting_suffix")]
    pub nesting_suffix: String,
    #[serde(default = "default_nesting_options_separator")]
    pub nesting_options_separator: String,
    #[serde(default = "default_interpolation_prefix")]
    pub interpolation_prefix: String,
    #[serde(default = "default_interpolation_suffix")]
    pub interpolation_suffix: String,
    /// Target locales; drives plural-category expansion.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    /// Source-language hint for the single-category plural fast path.
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default = "default_generate_base_plural_forms")]
    pub generate_base_plural_forms: bool,
    #[serde(default)]
    pub disable_plurals: bool,
    /// Glob-like key patterns to treat as always present, even when the
    /// walker can't statically resolve the call site that uses them.
    #[serde(default)]
    pub preserve_patterns: Vec<String>,
}

fn default_functions() -> Vec<String> {
    vec!["t".to_string()]
}

/// A hook name recognized as binding a translation function, with the
/// argument positions its namespace and key-prefix are read from. A bare
/// string takes the default positions (`nsArg=0`, `keyPrefixArg=1`); a
/// record overrides either.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HookSpec {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        ns_arg: Option<usize>,
        #[serde(default)]
        key_prefix_arg: Option<usize>,
    },
}

impl HookSpec {
    pub fn name(&self) -> &str {
        match self {
            HookSpec::Name(name) => name,
            HookSpec::Detailed { name, .. } => name,
        }
    }

    pub fn ns_arg(&self) -> usize {
        match self {
            HookSpec::Detailed { ns_arg: Some(n), .. } => *n,
            _ => 0,
        }
    }

    pub fn key_prefix_arg(&self) -> usize {
        match self {
            HookSpec::Detailed { key_prefix_arg: Some(n), .. } => *n,
            _ => 1,
        }
    }
}

fn default_use_translation_names() -> Vec<HookSpec> {
    vec![HookSpec::Name("useTranslation".to_string()), HookSpec::Name("getFixedT".to_string())]
}

fn default_trans_components() -> Vec<String> {
    vec!["Trans".to_string()]
}

fn default_keep_basic_html_nodes_for() -> Vec<String> {
    ["br", "strong", "i", "p"].map(String::from).to_vec()
}

fn default_default_ns() -> String {
    "translation".to_string()
}

fn default_ns_separator() -> String {
    ":".to_string()
}

fn default_key_separator() -> String {
    ".".to_string()
}

fn default_context_separator() -> String {
    "_".to_string()
}

fn default_plural_separator() -> String {
    "_".to_string()
}

fn default_nesting_prefix() -> String {
    "$t(".to_string()
}

fn default_nesting_suffix() -> String {
    ")".to_string()
}

fn default_nesting_options_separator() -> String {
    ",".to_string()
}

fn default_interpolation_prefix() -> String {
    "{{".to_string()
}

fn default_interpolation_suffix() -> String {
    "}}".to_string()
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_generate_base_plural_forms() -> bool {
    true
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            functions: default_functions(),
            use_translation_names: default_use_translation_names(),
            trans_components: default_trans_components(),
            trans_keep_basic_html_nodes_for: default_keep_basic_html_nodes_for(),
            default_ns: default_default_ns(),
            ns_separator: default_ns_separator(),
            key_separator: default_key_separator(),
            context_separator: default_context_separator(),
            plural_separator: default_plural_separator(),
            nesting_prefix: default_nesting_prefix(),
            nesting_suffix: default_nesting_suffix(),
            nesting_options_separator: default_nesting_options_separator(),
            interpolation_prefix: default_interpolation_prefix(),
            interpolation_suffix: default_interpolation_suffix(),
            locales: default_locales(),
            primary_language: None,
            generate_base_plural_forms: default_generate_base_plural_forms(),
            disable_plurals: false,
            preserve_patterns: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    /// Validate glob-shaped fields. Returns an error naming the offending
    /// field and pattern.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.preserve_patterns {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'preservePatterns': \"{pattern}\"")
            })?;
        }
        if self.key_separator.is_empty() {
            anyhow::bail!("'keySeparator' cannot be empty");
        }
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = ExtractorConfig::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

/// Look for `.transkeyrc.json` directly in `start_dir` — no upward walk.
/// The CLI runs from the project root being scanned, so the config file (if
/// any) lives right there; there's no multi-package workspace layout here
/// that would call for searching ancestor directories.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let config_path = start_dir.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: ExtractorConfig,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: ExtractorConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: ExtractorConfig::default(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_sane_fallbacks() {
        let config = ExtractorConfig::default();
        assert_eq!(config.functions, vec!["t".to_string()]);
        assert_eq!(config.default_ns, "translation");
        assert_eq!(config.ns_separator, ":");
        assert_eq!(config.key_separator, ".");
    }

    #[test]
    fn parses_partial_config_with_defaults_filled_in() {
        let json = r#"{ "functions": ["t", "i18n.t"] }"#;
        let config: ExtractorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.functions, vec!["t".to_string(), "i18n.t".to_string()]);
        assert_eq!(config.ns_separator, default_ns_separator());
    }

    #[test]
    fn parses_a_mix_of_bare_and_detailed_hook_names() {
        let json = r#"{
            "useTranslationNames": [
                "useTranslation",
                { "name": "useI18n", "nsArg": 1, "keyPrefixArg": 2 }
            ]
        }"#;
        let config: ExtractorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.use_translation_names[0].name(), "useTranslation");
        assert_eq!(config.use_translation_names[0].ns_arg(), 0);
        assert_eq!(config.use_translation_names[1].name(), "useI18n");
        assert_eq!(config.use_translation_names[1].ns_arg(), 1);
        assert_eq!(config.use_translation_names[1].key_prefix_arg(), 2);
    }

    #[test]
    fn find_config_file_matches_in_start_dir() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(dir.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn find_config_file_does_not_walk_up_to_a_parent_directory() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();
        File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();

        assert!(find_config_file(&sub_dir).is_none());
    }

    #[test]
    fn load_config_falls_back_to_defaults_when_absent() {
        let dir = tempdir().unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.locales, default_locales());
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, r#"{ "nsSeparator": "/" }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.ns_separator, "/");
    }

    #[test]
    fn validate_rejects_invalid_preserve_pattern() {
        let config = ExtractorConfig {
            preserve_patterns: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("preservePatterns"));
    }

    #[test]
    fn validate_rejects_empty_key_separator() {
        let config = ExtractorConfig {
            key_separator: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_default_config() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }
}

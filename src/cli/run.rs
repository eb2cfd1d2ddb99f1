//! Command dispatcher: discover source files, run extraction, print JSON.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::WalkDir;

use super::args::Arguments;
use crate::config::{load_config, ExtractorConfig};
use crate::issues::Report;

/// Exit status for the single extraction operation this CLI performs.
///
/// There is no third "internal error" variant here — a parse/config/IO
/// failure surfaces as an `Err` from `run` and propagates straight out of
/// `run_cli` via `?`, never through this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Extraction completed with no warnings (or `--strict` wasn't set).
    Success,
    /// Extraction completed but `--strict` was set and warnings were found.
    Failure,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
        }
    }
}

pub fn run(args: Arguments) -> Result<ExitStatus> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;

    let config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            let config: ExtractorConfig = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse config file: {}", path.display()))?;
            config.validate()?;
            config
        }
        None => load_config(&cwd)?.config,
    };

    let patterns: Vec<Pattern> = args
        .patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid glob pattern: {p}")))
        .collect::<Result<_>>()?;

    let files = discover_files(&cwd, &patterns)?;
    let outcome = crate::core::extract_from_sources(files, &config);

    let output = serde_json::json!({
        "keys": outcome.keys.iter().map(|k| key_to_json(k, &config.ns_separator)).collect::<Vec<_>>(),
        "warnings": outcome.warnings.iter().map(|w| serde_json::json!({
            "rule": w.rule().to_string(),
            "message": w.message(),
        })).collect::<Vec<_>>(),
    });

    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string(&output)?);
    }

    if args.strict && !outcome.warnings.is_empty() {
        return Ok(ExitStatus::Failure);
    }
    Ok(ExitStatus::Success)
}

fn key_to_json(key: &crate::core::ExtractedKey, ns_separator: &str) -> serde_json::Value {
    serde_json::json!({
        "key": key.key,
        "namespace": key.namespace,
        "fullKey": key.full_key(ns_separator),
        "defaultValue": key.default_value,
        "hasCount": key.has_count,
        "isOrdinal": key.is_ordinal,
        "explicitDefault": key.explicit_default,
        "keyAcceptingContext": key.key_accepting_context,
        "locations": key.locations.iter().map(|loc| serde_json::json!({
            "filePath": loc.file_path,
            "line": loc.line,
            "col": loc.col,
        })).collect::<Vec<_>>(),
    })
}

fn discover_files(root: &Path, patterns: &[Pattern]) -> Result<Vec<(String, String)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if !patterns.iter().any(|p| p.matches_path(relative)) {
            continue;
        }
        let code = std::fs::read_to_string(entry.path())
            .with_context(|| format!("failed to read {}", entry.path().display()))?;
        files.push((relative.to_string_lossy().to_string(), code));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
    }
}

//! Fan out file parsing+walking across threads with `rayon`, then fold the
//! per-file results back together in original file order.
//!
//! Each file's `ValueSource`/`ScopeManager`/`LocalBindings` state is entirely
//! private to that file's walk — nothing is shared across the `par_iter`
//! closures — so parallelizing here never risks cross-file leakage, only
//! throughput.

use rayon::prelude::*;

use crate::config::ExtractorConfig;
use crate::core::data::ExtractedKeyMap;
use crate::core::parser::parse_source;
use crate::core::walker::walk_module;
use crate::issues::{ParseFailureWarning, Warning};

/// Keys and warnings produced by one or more extraction runs.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub keys: ExtractedKeyMap,
    pub warnings: Vec<Warning>,
}

/// Parse and walk a single file's source text.
pub fn extract_from_source(code: String, file_path: &str, config: &ExtractorConfig) -> ExtractionOutcome {
    match parse_source(code, file_path) {
        Ok(parsed) => {
            let result = walk_module(&parsed.module, file_path, &parsed.source_map, config);
            ExtractionOutcome {
                keys: result.keys,
                warnings: result.warnings,
            }
        }
        Err(err) => ExtractionOutcome {
            keys: ExtractedKeyMap::new(),
            warnings: vec![ParseFailureWarning {
                file_path: file_path.to_string(),
                message: err.to_string(),
            }
            .into()],
        },
    }
}

/// Extract from every file, in parallel, then fold the results back
/// together sequentially in input order so `ExtractedKeyMap`'s
/// first-seen/location ordering stays deterministic regardless of which
/// worker thread finished first.
pub fn extract_from_sources(files: Vec<(String, String)>, config: &ExtractorConfig) -> ExtractionOutcome {
    let per_file: Vec<ExtractionOutcome> = files
        .into_par_iter()
        .map(|(file_path, code)| extract_from_source(code, &file_path, config))
        .collect();

    let mut merged = ExtractedKeyMap::new();
    let mut warnings = Vec::new();
    for outcome in per_file {
        merged.merge(outcome.keys);
        warnings.extend(outcome.warnings);
    }

    ExtractionOutcome {
        keys: merged,
        warnings,
    }
}

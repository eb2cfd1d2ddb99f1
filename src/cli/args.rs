//! CLI argument definitions using clap.
//!
//! A single `extract` operation: glob a source tree, run the extraction
//! engine over every matched file, and print the discovered keys as JSON.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Glob patterns to scan, e.g. `src/**/*.tsx`. Defaults to every
    /// `.js`/`.jsx`/`.ts`/`.tsx` file under the current directory.
    #[arg(default_values_t = vec![
        "**/*.js".to_string(),
        "**/*.jsx".to_string(),
        "**/*.ts".to_string(),
        "**/*.tsx".to_string(),
    ])]
    pub patterns: Vec<String>,

    /// Path to a `.transkeyrc.json` config file (overrides auto-discovery).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print discovered keys with indentation.
    #[arg(long)]
    pub pretty: bool,

    /// Exit with a non-zero status if any warnings were produced.
    #[arg(long)]
    pub strict: bool,
}

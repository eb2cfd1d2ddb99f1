//! Parsing one file's source text into a swc `Module`.
//!
//! Each call gets its own `Arc<SourceMap>` and its own `GLOBALS` scope so
//! byte offsets and line/column lookups never drift between unrelated files
//! parsed on different threads — see `crate::core::engine`'s concurrency notes.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use swc_common::{FileName, Globals, SourceMap, GLOBALS};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse TS/TSX/JS/JSX source text. `file_path` is only used for error
/// messages and to label the source map's file entry.
pub fn parse_source(code: String, file_path: &str) -> Result<ParsedSource> {
    let source_map: Arc<SourceMap> = Arc::new(SourceMap::default());

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);
        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("{file_path}: {:?}", e))?;

        Ok(ParsedSource {
            module,
            source_map: source_map.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_tsx_module() {
        let result = parse_source(
            "export function Page() { return <div>{t(\"home.title\")}</div>; }".to_string(),
            "src/app/page.tsx",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn reports_syntax_errors() {
        let result = parse_source("const x = ;;;".to_string(), "src/app/broken.tsx");
        assert!(result.is_err());
    }
}

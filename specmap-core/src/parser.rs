//! TypeScript and JavaScript parser using SWC
//!
//! Global invariants enforced:
//! - One fresh source map per parsed file, no state shared between files
//! - Parse failures are reported, never panicked on

use crate::error::ParseError;
use crate::language::Language;
use std::path::Path;
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap, Spanned};
use swc_ecma_ast::{EsVersion, Program};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// Parse goal of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceGoal {
    /// ES module: `import`/`export` allowed, strict mode
    Module,
    /// Classic script (CommonJS and friends)
    Script,
}

/// Source-type hint handed to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub typescript: bool,
    pub jsx: bool,
    pub goal: SourceGoal,
    /// TypeScript declaration file mode (.d.ts)
    pub declaration: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            typescript: false,
            jsx: false,
            goal: SourceGoal::Module,
            declaration: false,
        }
    }
}

impl ParseOptions {
    /// Determine the parser configuration from a file name
    ///
    /// Unknown extensions are parsed as plain JavaScript modules.
    pub fn for_file(filename: &str) -> Self {
        let language = Language::from_path(Path::new(filename));
        let goal = if filename.ends_with(".cjs") {
            SourceGoal::Script
        } else {
            SourceGoal::Module
        };

        ParseOptions {
            typescript: language.is_some_and(|l| l.is_typescript()),
            jsx: language.is_some_and(|l| l.has_jsx()),
            goal,
            declaration: filename.ends_with(".d.ts"),
        }
    }

    fn syntax(&self) -> Syntax {
        if self.typescript {
            Syntax::Typescript(swc_ecma_parser::TsSyntax {
                tsx: self.jsx,
                decorators: true,
                dts: self.declaration,
                ..Default::default()
            })
        } else {
            Syntax::Es(swc_ecma_parser::EsSyntax {
                jsx: self.jsx,
                decorators: true,
                ..Default::default()
            })
        }
    }
}

/// A successfully parsed file
///
/// Owns the source map the spans of `program` point into.
pub struct ParsedSource {
    pub program: Program,
    pub file: Lrc<SourceFile>,
    pub source_map: Lrc<SourceMap>,
}

/// Parse source text, choosing syntax from the file extension
pub fn parse_source(src: &str, filename: &str) -> Result<ParsedSource, ParseError> {
    parse_source_with(src, filename, ParseOptions::for_file(filename))
}

/// Parse source text with an explicit source-type hint
///
/// Recoverable syntax errors collected by the parser count as failures: the
/// file is not valid syntax even though SWC produced a tree for it.
pub fn parse_source_with(
    src: &str,
    filename: &str,
    options: ParseOptions,
) -> Result<ParsedSource, ParseError> {
    let source_map: Lrc<SourceMap> = Default::default();

    let source_file: Lrc<SourceFile> = source_map.new_source_file(
        FileName::Custom(filename.into()).into(),
        src.to_string(),
    );

    let input = StringInput::from(&*source_file);
    let lexer = Lexer::new(options.syntax(), EsVersion::Es2022, input, None);
    let mut parser = Parser::new_from(lexer);

    let parsed = match options.goal {
        SourceGoal::Module => parser.parse_module().map(Program::Module),
        SourceGoal::Script => parser.parse_script().map(Program::Script),
    };

    let program = parsed.map_err(|e| to_parse_error(&e, filename, &source_map))?;

    if let Some(first) = parser.take_errors().into_iter().next() {
        return Err(to_parse_error(&first, filename, &source_map));
    }

    Ok(ParsedSource {
        program,
        file: source_file,
        source_map,
    })
}

fn to_parse_error(
    error: &swc_ecma_parser::error::Error,
    filename: &str,
    source_map: &SourceMap,
) -> ParseError {
    let loc = source_map.lookup_char_pos(error.span().lo);
    ParseError::new(filename, error.kind().msg().to_string()).at(loc.line, loc.col.0)
}

#[cfg(test)]
#[path = "parser/tests.rs"]
mod tests;

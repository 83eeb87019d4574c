//! Specmap core library - static analysis of JavaScript and TypeScript for
//! specification-driven test generation

// Global invariants enforced in this crate:
// - No I/O: inputs arrive as in-memory text, outputs are plain values
// - No global mutable state; each file gets its own source map
// - Deterministic traversal order must be explicit
// - Identical input yields byte-for-byte identical output
// - A failure in one file never aborts the analysis of the others

pub mod analysis;
pub mod ast;
pub mod config;
pub mod discover;
pub mod error;
pub mod infer;
pub mod jsdoc;
pub mod language;
pub mod metrics;
pub mod parser;
pub mod report;
pub mod spec_extract;
pub mod spec_match;
pub mod specification;

pub use ast::{FunctionInfo, FunctionKind, FunctionParam, ParsedFunction};
pub use config::{ResolvedConfig, SpecmapConfig};
pub use error::ParseError;
pub use report::{render_json, render_text, AnalysisOutput, Coverage};
pub use spec_match::MatchPolicy;
pub use specification::{EvidenceRule, EvidenceWeights, Specification};

use serde::{Deserialize, Serialize};

/// One file handed to the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInput {
    pub file_name: String,
    pub content: String,
    #[serde(default)]
    pub is_documentation: bool,
}

impl SourceInput {
    /// A JavaScript or TypeScript file
    pub fn source(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        SourceInput {
            file_name: file_name.into(),
            content: content.into(),
            is_documentation: false,
        }
    }

    /// A prose documentation file
    pub fn documentation(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        SourceInput {
            file_name: file_name.into(),
            content: content.into(),
            is_documentation: true,
        }
    }

    /// Classify by extension against the accepted documentation extensions
    pub fn classify(
        file_name: impl Into<String>,
        content: impl Into<String>,
        documentation_extensions: &[String],
    ) -> Self {
        let file_name = file_name.into();
        let is_documentation =
            language::is_documentation_file(&file_name, documentation_extensions);
        SourceInput {
            file_name,
            content: content.into(),
            is_documentation,
        }
    }
}

/// Tunables for one analysis pass
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Confidence assigned by each specification evidence rule
    pub evidence: EvidenceWeights,
    /// Confidence values of the matching cascade
    pub matching: MatchPolicy,
    /// Parse source files on the rayon thread pool
    pub parallel: bool,
}

/// Analyze an ordered collection of source and documentation inputs
///
/// Source files are parsed into functions, documentation is scanned for
/// specifications, and specifications are matched to functions by name.
/// Files that fail to parse are listed in `skipped_files`.
pub fn analyze(inputs: &[SourceInput], options: &AnalysisOptions) -> AnalysisOutput {
    analysis::run(inputs, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let exts = vec!["md".to_string()];
        assert!(SourceInput::classify("README.md", "", &exts).is_documentation);
        assert!(!SourceInput::classify("index.js", "", &exts).is_documentation);
        assert!(!SourceInput::classify("notes.txt", "", &exts).is_documentation);
    }

    #[test]
    fn test_source_input_deserializes_camel_case() {
        let input: SourceInput =
            serde_json::from_str(r#"{"fileName": "a.md", "content": "x", "isDocumentation": true}"#)
                .unwrap();
        assert_eq!(input, SourceInput::documentation("a.md", "x"));

        let defaulted: SourceInput =
            serde_json::from_str(r#"{"fileName": "a.js", "content": ""}"#).unwrap();
        assert!(!defaulted.is_documentation);
    }

    #[test]
    fn test_analyze_empty() {
        let output = analyze(&[], &AnalysisOptions::default());
        assert!(output.functions.is_empty());
        assert!(output.specifications.is_empty());
        assert_eq!(output.coverage.total_functions, 0);
    }
}

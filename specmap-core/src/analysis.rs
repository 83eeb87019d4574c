//! Analysis orchestration - ties together parsing, discovery, specification
//! extraction and matching
//!
//! Global invariants enforced:
//! - Output order follows input order, whether files run sequentially or on
//!   the rayon pool
//! - A file that fails to parse contributes no functions and never aborts the pass
//! - `has_spec` is the only field changed after discovery

use crate::ast::{FunctionInfo, ParsedFunction};
use crate::discover;
use crate::error::ParseError;
use crate::parser;
use crate::report::{AnalysisOutput, Coverage};
use crate::spec_extract;
use crate::spec_match;
use crate::specification::Specification;
use crate::{AnalysisOptions, SourceInput};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, debug_span, warn};

/// Parse one source file and extract its functions
pub fn analyze_source(input: &SourceInput) -> Result<Vec<ParsedFunction>, ParseError> {
    let _span = debug_span!("analyze_source", file = %input.file_name).entered();

    let parsed = parser::parse_source(&input.content, &input.file_name)?;
    let functions = discover::discover_functions(&parsed, &input.content, &input.file_name);

    debug!(
        file = %input.file_name,
        functions = functions.len(),
        "extracted functions"
    );
    Ok(functions)
}

/// Run the full pipeline over an ordered input collection
pub fn run(inputs: &[SourceInput], options: &AnalysisOptions) -> AnalysisOutput {
    let sources: Vec<&SourceInput> = inputs.iter().filter(|i| !i.is_documentation).collect();
    let documents: Vec<&SourceInput> = inputs.iter().filter(|i| i.is_documentation).collect();

    let results: Vec<Result<Vec<ParsedFunction>, ParseError>> = if options.parallel {
        sources.par_iter().map(|input| analyze_source(input)).collect()
    } else {
        sources.iter().map(|input| analyze_source(input)).collect()
    };

    let mut functions: Vec<FunctionInfo> = Vec::new();
    let mut skipped_files = Vec::new();
    for (input, result) in sources.iter().zip(results) {
        match result {
            Ok(parsed) => functions.extend(parsed.into_iter().map(FunctionInfo::from)),
            Err(e) => {
                warn!(file = %input.file_name, error = %e, "skipping file that failed to parse");
                skipped_files.push(input.file_name.clone());
            }
        }
    }

    let extracted: Vec<Specification> = documents
        .iter()
        .flat_map(|doc| {
            let specs = spec_extract::extract_specifications(&doc.content, &options.evidence);
            debug!(
                file = %doc.file_name,
                specifications = specs.len(),
                "extracted specifications"
            );
            specs
        })
        .collect();

    let specifications =
        spec_match::match_specifications(extracted, &functions, &options.matching);

    mark_specified(&mut functions, &specifications);
    let coverage = Coverage::of(&functions);

    AnalysisOutput {
        functions,
        specifications,
        coverage,
        skipped_files,
    }
}

/// Set `has_spec` on every function a resolved specification maps to
///
/// Matching is by name, so every same-named function is marked.
fn mark_specified(functions: &mut [FunctionInfo], specifications: &[Specification]) {
    let targets: HashSet<&str> = specifications
        .iter()
        .filter_map(|s| s.mapped_function.as_deref())
        .collect();

    for function in functions.iter_mut() {
        function.has_spec = targets.contains(function.name.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, content: &str) -> SourceInput {
        SourceInput::source(name, content)
    }

    fn doc(name: &str, content: &str) -> SourceInput {
        SourceInput::documentation(name, content)
    }

    #[test]
    fn test_analyze_source_reports_parse_error() {
        let err = analyze_source(&source("broken.js", "function (")).unwrap_err();
        assert_eq!(err.file_name, "broken.js");
    }

    #[test]
    fn test_run_marks_specified_functions() {
        let inputs = vec![
            source("date.js", "function parseDate(str) { return str; }\nfunction other() {}"),
            doc("README.md", "**parseDate(str)**: Parses a date string.\n"),
        ];
        let output = run(&inputs, &AnalysisOptions::default());

        assert_eq!(output.functions.len(), 2);
        assert!(output.functions[0].has_spec);
        assert!(!output.functions[1].has_spec);
        assert_eq!(output.coverage.matched_count, 1);
        assert_eq!(output.coverage.total_functions, 2);
        assert_eq!(
            output.specifications[0].mapped_function.as_deref(),
            Some("parseDate")
        );
        assert_eq!(output.specifications[0].confidence, Some(90));
    }

    #[test]
    fn test_run_skips_unparseable_files() {
        let inputs = vec![
            source("a.js", "function a() {}"),
            source("broken.js", "const = ;"),
            source("b.js", "function b() {}"),
        ];
        let output = run(&inputs, &AnalysisOptions::default());
        let names: Vec<&str> = output.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(output.skipped_files, vec!["broken.js".to_string()]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let inputs: Vec<SourceInput> = (0..16)
            .map(|i| {
                source(
                    &format!("f{}.ts", i),
                    &format!("export function fn{}(x: number) {{ return x > {}; }}", i, i),
                )
            })
            .collect();

        let sequential = run(&inputs, &AnalysisOptions::default());
        let parallel = run(
            &inputs,
            &AnalysisOptions {
                parallel: true,
                ..AnalysisOptions::default()
            },
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_duplicate_names_all_marked() {
        let inputs = vec![
            source("a.js", "function load() {}"),
            source("b.js", "const load = () => 1;"),
            doc("notes.md", "- **load**: Loads things.\n"),
        ];
        let output = run(&inputs, &AnalysisOptions::default());
        assert!(output.functions.iter().all(|f| f.has_spec));
        assert_eq!(output.coverage.matched_count, 2);
    }

    #[test]
    fn test_unmatched_specification_is_cleared() {
        let inputs = vec![
            source("a.js", "function parseA() {}\nfunction parseB() {}"),
            doc("notes.md", "- **parse**: Parses.\n"),
        ];
        let output = run(&inputs, &AnalysisOptions::default());
        assert_eq!(output.specifications.len(), 1);
        assert!(output.specifications[0].mapped_function.is_none());
        assert_eq!(output.coverage.matched_count, 0);
    }
}

//! Invariants that must hold for every extracted function and specification

use specmap_core::discover::discover_functions;
use specmap_core::parser::parse_source;
use specmap_core::spec_match::match_specifications;
use specmap_core::{
    analyze, AnalysisOptions, FunctionKind, MatchPolicy, SourceInput, Specification,
};
use std::path::PathBuf;
use walkdir::WalkDir;

fn fixture_sources() -> Vec<(String, String)> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures");

    WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            specmap_core::language::is_source_file(&entry.file_name().to_string_lossy())
        })
        .map(|entry| {
            let name = entry.path().to_string_lossy().to_string();
            let content = std::fs::read_to_string(entry.path()).unwrap();
            (name, content)
        })
        .collect()
}

#[test]
fn test_declaration_code_reparses() {
    let mut checked = 0;
    for (name, content) in fixture_sources() {
        let Ok(parsed) = parse_source(&content, &name) else {
            continue;
        };
        for function in discover_functions(&parsed, &content, &name) {
            if matches!(function.kind, FunctionKind::Declaration | FunctionKind::Binding) {
                parse_source(&function.code, &name).unwrap_or_else(|e| {
                    panic!("code of {} does not re-parse: {}", function.name, e)
                });
                checked += 1;
            }
        }
    }
    assert!(checked > 0, "fixtures should contain declarations");
}

#[test]
fn test_names_complexity_and_spans() {
    for (name, content) in fixture_sources() {
        let Ok(parsed) = parse_source(&content, &name) else {
            continue;
        };
        let functions = discover_functions(&parsed, &content, &name);
        for window in functions.windows(2) {
            assert!(window[0].span.start <= window[1].span.start);
        }
        for function in functions {
            assert!(!function.name.is_empty());
            assert!(function.complexity >= 1);
            assert!(function.span.line >= 1);
            assert!(function.span.line <= function.span.end_line);
            assert_eq!(function.span.slice(&content), Some(function.code.as_str()));
            assert!(content.contains(&function.name));
        }
    }
}

#[test]
fn test_formatting_does_not_change_results() {
    let compact = "function f(a,b){if(a){return a&&b}return b}";
    let spaced = r#"
        // leading comment
        function f(a, b) {
            if (a) {
                /* why */ return a && b;
            }

            return b;
        }
    "#;

    let compact_fns = discover_functions(&parse_source(compact, "a.js").unwrap(), compact, "a.js");
    let spaced_fns = discover_functions(&parse_source(spaced, "a.js").unwrap(), spaced, "a.js");

    assert_eq!(compact_fns.len(), 1);
    assert_eq!(spaced_fns.len(), 1);
    assert_eq!(compact_fns[0].complexity, spaced_fns[0].complexity);
    assert_eq!(compact_fns[0].complexity, 3);
    assert_eq!(compact_fns[0].params, spaced_fns[0].params);
    assert_eq!(compact_fns[0].return_type, spaced_fns[0].return_type);
}

#[test]
fn test_confidence_stays_in_range() {
    let inputs = vec![
        SourceInput::source("a.js", "function alpha() {}\nfunction beta() {}"),
        SourceInput::documentation(
            "a.md",
            "**alpha()**: a\n\n- **Beta**: b\n\n- **alph**: c\n\n```\ngamma() {}\n```\n",
        ),
    ];
    let output = analyze(&inputs, &AnalysisOptions::default());
    assert!(!output.specifications.is_empty());
    for spec in &output.specifications {
        assert_eq!(spec.mapped_function.is_some(), spec.confidence.is_some());
        if let Some(confidence) = spec.confidence {
            assert!(confidence <= 100);
        }
    }
}

#[test]
fn test_matcher_is_idempotent_on_pipeline_output() {
    let inputs = vec![
        SourceInput::source(
            "users.js",
            "function getUser() {}\nfunction getUserById() {}\nfunction parseA() {}\nfunction parseB() {}",
        ),
        SourceInput::documentation(
            "README.md",
            "- **getUser**: one\n- **getuser**: two\n- **parse**: three\n- **UserById**: four\n",
        ),
    ];
    let output = analyze(&inputs, &AnalysisOptions::default());
    let functions = output.functions.clone();

    let again: Vec<Specification> = match_specifications(
        output.specifications.clone(),
        &functions,
        &MatchPolicy::default(),
    );

    for (before, after) in output.specifications.iter().zip(&again) {
        if before.confidence.is_some_and(|c| c >= 90) {
            assert_eq!(before, after);
        }
    }
}

//! Tests for TypeScript and JavaScript parser

#[cfg(test)]
mod parser_tests {
    use crate::parser::{self, ParseOptions, SourceGoal};
    use swc_ecma_ast::Program;

    #[test]
    fn test_parse_simple_function_javascript() {
        let result = parser::parse_source("function foo() { return 42; }", "test.js");
        assert!(result.is_ok(), "Should parse simple JavaScript function");
    }

    #[test]
    fn test_parse_typescript_types() {
        let src = "function foo(x: number): number { return x * 2; }";
        assert!(parser::parse_source(src, "test.ts").is_ok());
    }

    #[test]
    fn test_parse_rejects_typescript_in_javascript() {
        let src = "function foo(x: number): number { return x * 2; }";
        assert!(
            parser::parse_source(src, "test.js").is_err(),
            "Type annotations are not JavaScript syntax"
        );
    }

    #[test]
    fn test_parse_rejects_jsx_in_plain_files() {
        let src = "function foo() { return <div>hello</div>; }";
        assert!(parser::parse_source(src, "test.ts").is_err());
        assert!(parser::parse_source(src, "test.js").is_err());
    }

    #[test]
    fn test_parse_accepts_jsx_in_react_files() {
        let src = "function foo() { return <div>hello</div>; }";
        assert!(parser::parse_source(src, "test.tsx").is_ok());
        assert!(parser::parse_source(src, "test.jsx").is_ok());
    }

    #[test]
    fn test_parse_error_carries_file_name_and_line() {
        let src = "function ok() {}\nfunction broken( {\n";
        let err = match parser::parse_source(src, "src/broken.js") {
            Ok(_) => panic!("expected a parse error"),
            Err(e) => e,
        };
        assert_eq!(err.file_name, "src/broken.js");
        assert!(!err.message.is_empty());
        assert!(err.line >= 2, "error should point past the first line");
    }

    #[test]
    fn test_options_for_file() {
        let ts = ParseOptions::for_file("a.ts");
        assert!(ts.typescript && !ts.jsx);
        assert_eq!(ts.goal, SourceGoal::Module);

        let tsx = ParseOptions::for_file("a.tsx");
        assert!(tsx.typescript && tsx.jsx);

        let cjs = ParseOptions::for_file("server.cjs");
        assert!(!cjs.typescript);
        assert_eq!(cjs.goal, SourceGoal::Script);

        let dts = ParseOptions::for_file("types.d.ts");
        assert!(dts.declaration);

        let unknown = ParseOptions::for_file("snippet");
        assert_eq!(unknown, ParseOptions::default());
    }

    #[test]
    fn test_script_goal_produces_script() {
        let parsed = parser::parse_source("var x = function () {};", "legacy.cjs").unwrap();
        assert!(matches!(parsed.program, Program::Script(_)));
    }

    #[test]
    fn test_module_goal_accepts_exports() {
        let parsed = parser::parse_source("export function f() {}", "mod.mjs").unwrap();
        assert!(matches!(parsed.program, Program::Module(_)));
    }

    #[test]
    fn test_parse_javascript_es6_features() {
        let src = r#"
            const arrow = (x) => x * 2;
            async function asyncFn() { await Promise.resolve(42); }
            const destructure = ({a, b}) => a + b;
            class A { static make() { return new A(); } }
        "#;
        assert!(parser::parse_source(src, "test.js").is_ok());
    }
}

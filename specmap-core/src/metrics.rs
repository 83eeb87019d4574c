//! Cyclomatic complexity from the AST
//!
//! Global invariants enforced:
//! - Formatting, comments, and whitespace must not affect results
//! - Result is always >= 1 (one baseline path)
//!
//! Each branch point anywhere in the function's subtree adds one:
//! - `if`, `for`, `for-in`, `for-of`, `while`, `do-while`
//! - each `switch` case, `default` included
//! - each ternary conditional
//! - each `&&` and `||` operator
//!
//! Parameters (default values) and nested functions are part of the subtree.

use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Cyclomatic complexity of a `function` (declaration, expression, or method)
pub fn function_complexity(function: &Function) -> u32 {
    count_branches(function)
}

/// Cyclomatic complexity of an arrow function
pub fn arrow_complexity(arrow: &ArrowExpr) -> u32 {
    count_branches(arrow)
}

fn count_branches<N: VisitWith<ComplexityVisitor>>(node: &N) -> u32 {
    let mut visitor = ComplexityVisitor { complexity: 1 };
    node.visit_with(&mut visitor);
    visitor.complexity
}

struct ComplexityVisitor {
    complexity: u32,
}

impl Visit for ComplexityVisitor {
    fn visit_if_stmt(&mut self, if_stmt: &IfStmt) {
        self.complexity += 1;
        if_stmt.visit_children_with(self);
    }

    fn visit_for_stmt(&mut self, for_stmt: &ForStmt) {
        self.complexity += 1;
        for_stmt.visit_children_with(self);
    }

    fn visit_for_in_stmt(&mut self, for_in_stmt: &ForInStmt) {
        self.complexity += 1;
        for_in_stmt.visit_children_with(self);
    }

    fn visit_for_of_stmt(&mut self, for_of_stmt: &ForOfStmt) {
        self.complexity += 1;
        for_of_stmt.visit_children_with(self);
    }

    fn visit_while_stmt(&mut self, while_stmt: &WhileStmt) {
        self.complexity += 1;
        while_stmt.visit_children_with(self);
    }

    fn visit_do_while_stmt(&mut self, do_while_stmt: &DoWhileStmt) {
        self.complexity += 1;
        do_while_stmt.visit_children_with(self);
    }

    fn visit_switch_case(&mut self, switch_case: &SwitchCase) {
        self.complexity += 1;
        switch_case.visit_children_with(self);
    }

    fn visit_cond_expr(&mut self, cond_expr: &CondExpr) {
        self.complexity += 1;
        cond_expr.visit_children_with(self);
    }

    fn visit_bin_expr(&mut self, bin_expr: &BinExpr) {
        if matches!(bin_expr.op, BinaryOp::LogicalAnd | BinaryOp::LogicalOr) {
            self.complexity += 1;
        }
        bin_expr.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use crate::discover;
    use crate::parser;

    fn complexity_of(src: &str, name: &str) -> u32 {
        let parsed = parser::parse_source(src, "test.ts").unwrap();
        discover::discover_functions(&parsed, src, "test.ts")
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.complexity)
            .expect("function present")
    }

    #[test]
    fn test_straight_line_is_one() {
        assert_eq!(complexity_of("function f(a, b) { const c = a + b; return c; }", "f"), 1);
        assert_eq!(complexity_of("function empty() {}", "empty"), 1);
    }

    #[test]
    fn test_if_else_counts_once() {
        let src = "function classify(x) { if (x > 0) { return true; } else { return false; } }";
        assert_eq!(complexity_of(src, "classify"), 2);
    }

    #[test]
    fn test_else_if_chain() {
        let src = r#"
            function grade(s) {
                if (s > 90) return "A";
                else if (s > 80) return "B";
                else if (s > 70) return "C";
                return "F";
            }
        "#;
        assert_eq!(complexity_of(src, "grade"), 4);
    }

    #[test]
    fn test_all_loop_forms() {
        let src = r#"
            function loops(xs, o) {
                for (let i = 0; i < 3; i++) {}
                for (const k in o) {}
                for (const x of xs) {}
                while (false) {}
                do {} while (false);
            }
        "#;
        assert_eq!(complexity_of(src, "loops"), 6);
    }

    #[test]
    fn test_switch_cases_include_default() {
        let src = r#"
            function pick(k) {
                switch (k) {
                    case 1: return "one";
                    case 2: return "two";
                    default: return "many";
                }
            }
        "#;
        assert_eq!(complexity_of(src, "pick"), 4);
    }

    #[test]
    fn test_ternary_and_logical_operators() {
        let src = "const check = (a, b, c) => (a && b) || c ? 1 : 0;";
        assert_eq!(complexity_of(src, "check"), 4);
    }

    #[test]
    fn test_nullish_and_try_do_not_count() {
        let src = "function safe(a) { try { return a ?? 0; } catch (e) { return 0; } }";
        assert_eq!(complexity_of(src, "safe"), 1);
    }

    #[test]
    fn test_nested_functions_are_part_of_subtree() {
        let src = r#"
            function outer(xs) {
                return xs.map(x => x > 0 ? x : -x);
            }
        "#;
        assert_eq!(complexity_of(src, "outer"), 2);
    }

    #[test]
    fn test_default_parameter_branches_count() {
        let src = "function f(a = flag ? 1 : 2) { return a; }";
        assert_eq!(complexity_of(src, "f"), 2);
    }
}

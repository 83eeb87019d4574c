//! Function discovery from AST
//!
//! Global invariants enforced:
//! - Deterministic output order by span start
//! - Only named functions are reported; anonymous ones are skipped silently
//! - Every occurrence is reported, duplicates included
//!
//! Recognized shapes (see `FunctionShape`):
//! - Function declarations (`function name() {}`)
//! - Exported declarations (`export function name() {}`,
//!   `export default function name() {}`)
//! - Variable bindings initialized with a function or arrow expression
//! - Class methods with an identifier or string key
//!
//! Ignored constructs:
//! - Overload signatures and ambient declarations (no body)
//! - Getters, setters, constructors and computed-key methods
//! - Destructuring targets (`const { a } = ...`)

use crate::ast::{FunctionKind, FunctionParam, ParsedFunction};
use crate::infer::{self, InferContext};
use crate::jsdoc;
use crate::language::SourceSpan;
use crate::metrics;
use crate::parser::ParsedSource;
use swc_common::{SourceFile, Span};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// A function-like node: either a `function` or an arrow
#[derive(Clone, Copy)]
pub enum Callable<'a> {
    Function(&'a Function),
    Arrow(&'a ArrowExpr),
}

impl<'a> Callable<'a> {
    pub fn params(&self) -> Vec<&'a Pat> {
        match self {
            Callable::Function(function) => function.params.iter().map(|p| &p.pat).collect(),
            Callable::Arrow(arrow) => arrow.params.iter().collect(),
        }
    }

    pub fn return_annotation(&self) -> Option<&'a TsTypeAnn> {
        match self {
            Callable::Function(function) => function.return_type.as_deref(),
            Callable::Arrow(arrow) => arrow.return_type.as_deref(),
        }
    }

    /// Overload signatures and `declare function` have no body
    pub fn has_body(&self) -> bool {
        match self {
            Callable::Function(function) => function.body.is_some(),
            Callable::Arrow(_) => true,
        }
    }

    pub fn complexity(&self) -> u32 {
        match self {
            Callable::Function(function) => metrics::function_complexity(function),
            Callable::Arrow(arrow) => metrics::arrow_complexity(arrow),
        }
    }
}

/// The closed set of syntactic shapes that yield a function unit
enum FunctionShape<'a> {
    Declaration(&'a FnDecl),
    Exported {
        ident: &'a Ident,
        function: &'a Function,
    },
    Binding {
        decl: &'a VarDecl,
        ident: &'a Ident,
        init: Callable<'a>,
    },
    Method {
        method: &'a ClassMethod,
        name: String,
    },
}

impl<'a> FunctionShape<'a> {
    fn name(&self) -> String {
        match self {
            FunctionShape::Declaration(decl) => decl.ident.sym.to_string(),
            FunctionShape::Exported { ident, .. } => ident.sym.to_string(),
            FunctionShape::Binding { ident, .. } => ident.sym.to_string(),
            FunctionShape::Method { name, .. } => name.clone(),
        }
    }

    fn kind(&self) -> FunctionKind {
        match self {
            FunctionShape::Declaration(_) => FunctionKind::Declaration,
            FunctionShape::Exported { .. } => FunctionKind::Exported,
            FunctionShape::Binding { .. } => FunctionKind::Binding,
            FunctionShape::Method { .. } => FunctionKind::Method,
        }
    }

    /// Region copied into `code`
    ///
    /// Bindings take the whole declaration statement so the slice re-parses
    /// on its own; exports take the function without the `export` keyword.
    fn code_span(&self) -> Span {
        match self {
            FunctionShape::Declaration(decl) => decl.function.span,
            FunctionShape::Exported { function, .. } => function.span,
            FunctionShape::Binding { decl, .. } => decl.span,
            FunctionShape::Method { method, .. } => method.span,
        }
    }

    fn callable(&self) -> Callable<'a> {
        match self {
            FunctionShape::Declaration(decl) => Callable::Function(&decl.function),
            FunctionShape::Exported { function, .. } => Callable::Function(function),
            FunctionShape::Binding { init, .. } => *init,
            FunctionShape::Method { method, .. } => Callable::Function(&method.function),
        }
    }
}

/// Collect all named functions from a parsed file
///
/// Returns functions sorted deterministically by span start position.
pub fn discover_functions(
    parsed: &ParsedSource,
    source: &str,
    file_name: &str,
) -> Vec<ParsedFunction> {
    let mut collector = FunctionCollector {
        source,
        file: &parsed.file,
        file_name,
        functions: Vec::new(),
    };

    parsed.program.visit_with(&mut collector);

    // Stable sort keeps visit order for functions sharing a start offset
    collector.functions.sort_by_key(|f| f.span.start);
    collector.functions
}

/// Visitor to collect function units from the AST
struct FunctionCollector<'s> {
    source: &'s str,
    file: &'s SourceFile,
    file_name: &'s str,
    functions: Vec<ParsedFunction>,
}

impl FunctionCollector<'_> {
    fn record(&mut self, shape: FunctionShape<'_>) {
        let callable = shape.callable();
        if !callable.has_body() {
            return;
        }

        let name = shape.name();
        if name.is_empty() {
            return;
        }

        let span = SourceSpan::from_swc(shape.code_span(), self.file);
        let code = span.slice(self.source).unwrap_or_default().to_string();
        let doc = jsdoc::find_preceding(self.source, span.start);

        let ctx = InferContext {
            source: self.source,
            file: self.file,
            doc: doc.as_ref(),
        };

        let params = callable
            .params()
            .into_iter()
            .map(|pat| FunctionParam::new(infer::param_name(pat), infer::param_type(pat, &ctx)))
            .collect();

        self.functions.push(ParsedFunction {
            name,
            params,
            return_type: infer::return_type(&callable, &ctx),
            code,
            file_name: self.file_name.to_string(),
            kind: shape.kind(),
            span,
            complexity: callable.complexity(),
        });
    }
}

impl Visit for FunctionCollector<'_> {
    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        self.record(FunctionShape::Declaration(decl));
        decl.visit_children_with(self);
    }

    fn visit_export_decl(&mut self, export: &ExportDecl) {
        match &export.decl {
            Decl::Fn(decl) => {
                self.record(FunctionShape::Exported {
                    ident: &decl.ident,
                    function: &decl.function,
                });
                // Descend past the declaration so it is not recorded twice
                decl.function.visit_with(self);
            }
            _ => export.visit_children_with(self),
        }
    }

    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        match &export.decl {
            DefaultDecl::Fn(expr) => {
                if let Some(ident) = &expr.ident {
                    self.record(FunctionShape::Exported {
                        ident,
                        function: &expr.function,
                    });
                }
                expr.function.visit_with(self);
            }
            _ => export.visit_children_with(self),
        }
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        for declarator in &decl.decls {
            let Pat::Ident(binding) = &declarator.name else {
                continue;
            };
            let Some(init) = declarator.init.as_deref() else {
                continue;
            };
            let init = match unwrap_parens(init) {
                Expr::Fn(expr) => Callable::Function(&expr.function),
                Expr::Arrow(arrow) => Callable::Arrow(arrow),
                _ => continue,
            };
            self.record(FunctionShape::Binding {
                decl,
                ident: &binding.id,
                init,
            });
        }
        decl.visit_children_with(self);
    }

    fn visit_class_method(&mut self, method: &ClassMethod) {
        if matches!(method.kind, MethodKind::Method) {
            let name = match &method.key {
                PropName::Ident(ident) => Some(ident.sym.to_string()),
                PropName::Str(str_lit) => Some(str_lit.value.to_atom_lossy().to_string()),
                _ => None,
            };
            if let Some(name) = name {
                self.record(FunctionShape::Method { method, name });
            }
        }
        method.visit_children_with(self);
    }
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        other => other,
    }
}

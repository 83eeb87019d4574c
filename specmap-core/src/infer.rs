//! Type label inference without a type checker
//!
//! Resolution order, first match wins:
//! 1. Explicit TypeScript annotation (verbatim source text of the type)
//! 2. JSDoc tag in the block directly preceding the function
//! 3. Parameters: the type of a literal default value
//! 4. Return type: labels observed on the function's own `return` statements
//!
//! No signal leaves the label absent; nothing is defaulted.

use crate::discover::Callable;
use crate::jsdoc::DocComment;
use crate::language::SourceSpan;
use swc_common::{SourceFile, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Source text and file metadata needed to slice annotations
pub struct InferContext<'a> {
    pub source: &'a str,
    pub file: &'a SourceFile,
    pub doc: Option<&'a DocComment>,
}

impl InferContext<'_> {
    fn annotation_text(&self, ann: &TsTypeAnn) -> Option<String> {
        SourceSpan::from_swc(ann.type_ann.span(), self.file)
            .slice(self.source)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Display name of a parameter pattern
pub fn param_name(pat: &Pat) -> String {
    match pat {
        Pat::Ident(binding) => binding.id.sym.to_string(),
        Pat::Assign(assign) => match &*assign.left {
            Pat::Ident(binding) => binding.id.sym.to_string(),
            other => param_name(other),
        },
        Pat::Rest(rest) => match &*rest.arg {
            Pat::Ident(binding) => format!("...{}", binding.id.sym),
            _ => "param".to_string(),
        },
        Pat::Object(_) => "{...}".to_string(),
        Pat::Array(_) => "[...]".to_string(),
        _ => "param".to_string(),
    }
}

/// Infer a parameter's type label
pub fn param_type(pat: &Pat, ctx: &InferContext<'_>) -> Option<String> {
    if let Some(ann) = param_annotation(pat) {
        if let Some(text) = ctx.annotation_text(ann) {
            return Some(text);
        }
    }

    if let Some(doc) = ctx.doc {
        if let Some(label) = doc.param_type(&param_name(pat)) {
            return Some(label);
        }
    }

    match pat {
        Pat::Assign(assign) => default_value_type(&assign.right).map(str::to_string),
        _ => None,
    }
}

fn param_annotation(pat: &Pat) -> Option<&TsTypeAnn> {
    match pat {
        Pat::Ident(binding) => binding.type_ann.as_deref(),
        Pat::Assign(assign) => param_annotation(&assign.left),
        Pat::Rest(rest) => rest
            .type_ann
            .as_deref()
            .or_else(|| param_annotation(&rest.arg)),
        Pat::Object(obj) => obj.type_ann.as_deref(),
        Pat::Array(arr) => arr.type_ann.as_deref(),
        _ => None,
    }
}

/// Runtime type of a literal default value, read structurally
fn default_value_type(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::Paren(paren) => default_value_type(&paren.expr),
        Expr::Lit(Lit::Str(_)) => Some("string"),
        Expr::Lit(Lit::Num(_)) => Some("number"),
        Expr::Lit(Lit::Bool(_)) => Some("boolean"),
        Expr::Array(_) => Some("Array"),
        Expr::Object(_) => Some("Object"),
        _ => None,
    }
}

/// Infer a function's return type label
pub fn return_type(callable: &Callable<'_>, ctx: &InferContext<'_>) -> Option<String> {
    if let Some(ann) = callable.return_annotation() {
        if let Some(text) = ctx.annotation_text(ann) {
            return Some(text);
        }
    }

    if let Some(label) = ctx.doc.and_then(DocComment::return_type) {
        return Some(label);
    }

    observed_return_type(callable).map(str::to_string)
}

/// Label from the function's own `return` statements
///
/// When returns disagree, the last one visited in source order wins. A bare
/// `return;` only yields `void` if nothing was observed before it.
fn observed_return_type(callable: &Callable<'_>) -> Option<&'static str> {
    match callable {
        Callable::Function(function) => {
            let body = function.body.as_ref()?;
            let mut collector = ReturnCollector { label: None };
            body.visit_with(&mut collector);
            collector.label
        }
        Callable::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(body) => {
                let mut collector = ReturnCollector { label: None };
                body.visit_with(&mut collector);
                collector.label
            }
            BlockStmtOrExpr::Expr(expr) => expression_type(expr),
        },
    }
}

struct ReturnCollector {
    label: Option<&'static str>,
}

impl Visit for ReturnCollector {
    fn visit_return_stmt(&mut self, ret: &ReturnStmt) {
        match &ret.arg {
            None => {
                self.label = self.label.or(Some("void"));
            }
            Some(arg) => {
                if let Some(label) = expression_type(arg) {
                    self.label = Some(label);
                }
            }
        }
    }

    // Nested functions have their own returns
    fn visit_function(&mut self, _: &Function) {}
    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}
    fn visit_constructor(&mut self, _: &Constructor) {}
    fn visit_getter_prop(&mut self, _: &GetterProp) {}
    fn visit_setter_prop(&mut self, _: &SetterProp) {}
}

fn expression_type(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::Paren(paren) => expression_type(&paren.expr),
        Expr::Lit(lit) => literal_type(lit),
        Expr::Array(_) => Some("Array"),
        Expr::Object(_) => Some("Object"),
        Expr::Bin(bin) => binary_type(bin.op),
        _ => None,
    }
}

fn literal_type(lit: &Lit) -> Option<&'static str> {
    match lit {
        Lit::Str(_) => Some("string"),
        Lit::Num(_) => Some("number"),
        Lit::Bool(_) => Some("boolean"),
        Lit::BigInt(_) => Some("bigint"),
        // typeof null and typeof /re/ are both "object"
        Lit::Null(_) | Lit::Regex(_) => Some("object"),
        _ => None,
    }
}

fn binary_type(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::EqEq
        | BinaryOp::NotEq
        | BinaryOp::EqEqEq
        | BinaryOp::NotEqEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::InstanceOf => Some("boolean"),
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing => None,
        _ => Some("number"),
    }
}

//! Function units produced by discovery
//!
//! Global invariants enforced:
//! - `name` is always an identifier taken from source syntax, never synthesized
//! - `complexity` is always >= 1
//! - No AST node outlives discovery; positions are kept as `SourceSpan`

use crate::language::SourceSpan;
use serde::{Deserialize, Serialize};

/// One declared parameter of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParam {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub type_label: Option<String>,
}

impl FunctionParam {
    pub fn new(name: impl Into<String>, type_label: Option<String>) -> Self {
        FunctionParam {
            name: name.into(),
            type_label,
        }
    }
}

/// Syntactic shape a function was discovered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// `function name() {}`
    Declaration,
    /// `export function name() {}` or `export default function name() {}`
    Exported,
    /// `const name = function () {}` or `const name = () => {}`
    Binding,
    /// Class method
    Method,
}

/// A function unit extracted from one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFunction {
    pub name: String,
    pub params: Vec<FunctionParam>,
    pub return_type: Option<String>,
    /// Verbatim source text of the function's span
    pub code: String,
    pub file_name: String,
    pub kind: FunctionKind,
    pub span: SourceSpan,
    pub complexity: u32,
}

impl ParsedFunction {
    /// Start line of the function (1-indexed)
    pub fn start_line(&self) -> u32 {
        self.span.line
    }
}

/// Output record for one extracted function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<FunctionParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub file_name: String,
    pub code: String,
    pub complexity: u32,
    pub line: u32,
    #[serde(default)]
    pub has_spec: bool,
}

impl From<ParsedFunction> for FunctionInfo {
    fn from(function: ParsedFunction) -> Self {
        FunctionInfo {
            line: function.start_line(),
            name: function.name,
            params: function.params,
            return_type: function.return_type,
            file_name: function.file_name,
            code: function.code,
            complexity: function.complexity,
            has_spec: false,
        }
    }
}

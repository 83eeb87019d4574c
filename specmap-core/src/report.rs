//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering (input order is preserved, never re-sorted)
//! - Byte-for-byte identical output across runs

use crate::ast::FunctionInfo;
use crate::specification::Specification;
use serde::{Deserialize, Serialize};

/// How many extracted functions are targeted by a resolved specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub matched_count: usize,
    pub total_functions: usize,
}

impl Coverage {
    pub fn of(functions: &[FunctionInfo]) -> Self {
        Coverage {
            matched_count: functions.iter().filter(|f| f.has_spec).count(),
            total_functions: functions.len(),
        }
    }

    /// Matched share in percent; zero when there are no functions
    pub fn percent(&self) -> f64 {
        if self.total_functions == 0 {
            0.0
        } else {
            self.matched_count as f64 * 100.0 / self.total_functions as f64
        }
    }
}

/// Complete result of one analysis pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub functions: Vec<FunctionInfo>,
    pub specifications: Vec<Specification>,
    pub coverage: Coverage,
    #[serde(default)]
    pub skipped_files: Vec<String>,
}

/// Render an analysis as text output
pub fn render_text(output: &AnalysisOutput) -> String {
    let mut text = String::new();

    text.push_str(&format!(
        "{:<20} {:<6} {:<30} {:<4} {:<5} {}\n",
        "FILE", "LINE", "FUNCTION", "CC", "SPEC", "SIGNATURE"
    ));

    for function in &output.functions {
        text.push_str(&format!(
            "{:<20} {:<6} {:<30} {:<4} {:<5} {}\n",
            truncate_or_pad(&function.file_name, 20),
            function.line,
            truncate_or_pad(&function.name, 30),
            function.complexity,
            if function.has_spec { "yes" } else { "-" },
            signature(function),
        ));
    }

    if !output.specifications.is_empty() {
        text.push('\n');
        text.push_str(&format!(
            "{:<30} {:<5} {:<16} {}\n",
            "MAPPED", "CONF", "EVIDENCE", "DESCRIPTION"
        ));
        for spec in &output.specifications {
            text.push_str(&format!(
                "{:<30} {:<5} {:<16} {}\n",
                truncate_or_pad(spec.mapped_function.as_deref().unwrap_or("-"), 30),
                spec.confidence
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                spec.evidence.map(|e| e.as_str()).unwrap_or("-"),
                spec.description,
            ));
        }
    }

    text.push('\n');
    text.push_str(&format!(
        "Coverage: {}/{} functions have a specification ({:.1}%)\n",
        output.coverage.matched_count,
        output.coverage.total_functions,
        output.coverage.percent()
    ));

    if !output.skipped_files.is_empty() {
        text.push_str(&format!(
            "Skipped {} file(s) that failed to parse: {}\n",
            output.skipped_files.len(),
            output.skipped_files.join(", ")
        ));
    }

    text
}

/// Render an analysis as JSON output
pub fn render_json(output: &AnalysisOutput) -> String {
    // Struct fields serialize in declaration order, so output is stable
    serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
}

/// `name(a: number, b) -> number` style signature for text output
fn signature(function: &FunctionInfo) -> String {
    let params = function
        .params
        .iter()
        .map(|p| match &p.type_label {
            Some(label) => format!("{}: {}", p.name, label),
            None => p.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    match &function.return_type {
        Some(ret) => format!("({}) -> {}", params, ret),
        None => format!("({})", params),
    }
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

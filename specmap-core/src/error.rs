//! Error types for the analysis core

use thiserror::Error;

/// A source file could not be parsed as valid syntax
///
/// Recovered per file: the pipeline logs it and the file contributes no
/// functions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("parse error in {file_name}:{line}:{column}: {message}")]
pub struct ParseError {
    pub file_name: String,
    pub message: String,
    /// 1-indexed line of the failure
    pub line: usize,
    /// 0-indexed column of the failure
    pub column: usize,
}

impl ParseError {
    pub fn new(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError {
            file_name: file_name.into(),
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

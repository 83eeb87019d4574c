//! Position descriptor for extracted functions

use serde::{Deserialize, Serialize};
use swc_common::{SourceFile, Span};

/// Contiguous region of one source file
///
/// Offsets are relative to the start of the file's text, so they can be used
/// to slice the original string directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Byte offset of the start of the span (inclusive)
    pub start: usize,
    /// Byte offset of the end of the span (exclusive)
    pub end: usize,
    /// Line number of the start (1-indexed)
    pub line: u32,
    /// Line number of the end (1-indexed)
    pub end_line: u32,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize, line: u32, end_line: u32) -> Self {
        SourceSpan {
            start,
            end,
            line,
            end_line,
        }
    }

    /// Convert an swc span into file-relative offsets and line numbers
    pub fn from_swc(span: Span, file: &SourceFile) -> Self {
        let base = file.start_pos.0;
        let start = span.lo.0.saturating_sub(base) as usize;
        let end = span.hi.0.saturating_sub(base) as usize;
        SourceSpan::new(start, end, line_of(file, span.lo), line_of(file, span.hi))
    }

    /// Slice the text covered by this span, if it lies on char boundaries
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

fn line_of(file: &SourceFile, pos: swc_common::BytePos) -> u32 {
    file.lookup_line(pos).map(|idx| idx as u32 + 1).unwrap_or(1)
}

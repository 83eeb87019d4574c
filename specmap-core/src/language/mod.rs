//! Language detection and input classification
//!
//! Maps file names to the ECMAScript dialect they are written in, and decides
//! whether an input is source code or prose documentation.

pub mod span;

use std::path::Path;

pub use span::SourceSpan;

/// Extensions treated as documentation when no configuration overrides them
pub const DEFAULT_DOCUMENTATION_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Supported source dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// TypeScript (.ts, .mts, .cts)
    TypeScript,
    /// TypeScript with JSX (.tsx, .mtsx, .ctsx)
    TypeScriptReact,
    /// JavaScript (.js, .mjs, .cjs)
    JavaScript,
    /// JavaScript with JSX (.jsx, .mjsx, .cjsx)
    JavaScriptReact,
}

impl Language {
    /// Detect language from file extension
    ///
    /// Returns `None` if the extension is not recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" | "mtsx" | "ctsx" => Some(Language::TypeScriptReact),
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "jsx" | "mjsx" | "cjsx" => Some(Language::JavaScriptReact),
            _ => None,
        }
    }

    /// Detect language from a file path or bare file name
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Check if this is a TypeScript variant
    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::TypeScriptReact)
    }

    /// Check if JSX syntax is enabled for this variant
    pub fn has_jsx(&self) -> bool {
        matches!(self, Language::TypeScriptReact | Language::JavaScriptReact)
    }
}

/// Check if a file name denotes analyzable source (declaration files excluded)
pub fn is_source_file(filename: &str) -> bool {
    if filename.ends_with(".d.ts") {
        return false;
    }
    Language::from_path(Path::new(filename)).is_some()
}

/// Check if a file name denotes documentation, given the accepted extensions
pub fn is_documentation_file(filename: &str, extensions: &[String]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|accepted| accepted.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

//! JSDoc comment lookup and tag parsing
//!
//! Global invariants enforced:
//! - Deterministic extraction (pure function of source text and offset)
//! - The block must directly precede the function: only whitespace, `//` line
//!   comments and modifier keywords may sit between the two
//! - Malformed tags are ignored, never reported

use regex::Regex;
use std::sync::OnceLock;

/// Keywords that may sit between a doc block and the node it documents
const MODIFIERS: &[&str] = &[
    "export",
    "default",
    "declare",
    "async",
    "static",
    "public",
    "private",
    "protected",
    "readonly",
    "abstract",
    "override",
];

/// Raw text of a `/** ... */` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    text: String,
}

impl DocComment {
    pub fn new(text: impl Into<String>) -> Self {
        DocComment { text: text.into() }
    }

    /// Type declared by an `@param {Type} name` tag for the given parameter
    ///
    /// Accepts `@arg`/`@argument` spellings and the optional `[name]` or
    /// `[name=default]` forms. Rest parameters are looked up without `...`.
    /// Property tags such as `opts.name` never match the parameter `opts`.
    pub fn param_type(&self, param: &str) -> Option<String> {
        static PARAM_RE: OnceLock<Regex> = OnceLock::new();
        let param_re = PARAM_RE.get_or_init(|| {
            Regex::new(
                r"@(?:param|arg|argument)\s+\{([^}]+)\}\s+\[?\s*(?:\.\.\.)?([A-Za-z_$][\w$]*)(?:[\s\]=*]|$)",
            )
            .unwrap()
        });

        let wanted = param.trim_start_matches("...");
        param_re
            .captures_iter(&self.text)
            .find(|cap| &cap[2] == wanted)
            .map(|cap| cap[1].trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Type declared by an `@returns {Type}` or `@return {Type}` tag
    pub fn return_type(&self) -> Option<String> {
        static RETURN_RE: OnceLock<Regex> = OnceLock::new();
        let return_re =
            RETURN_RE.get_or_init(|| Regex::new(r"@returns?\s+\{([^}]+)\}").unwrap());

        return_re
            .captures(&self.text)
            .map(|cap| cap[1].trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// Find the JSDoc block that directly precedes `offset` in `source`
///
/// `offset` is the byte offset where the documented node starts.
pub fn find_preceding(source: &str, offset: usize) -> Option<DocComment> {
    let mut head = source.get(..offset)?;

    loop {
        head = head.trim_end();

        if let Some(stripped) = strip_trailing_modifier(head) {
            head = stripped;
            continue;
        }

        // Skip `//` comments sitting between the block and the node
        let line_start = head.rfind('\n').map(|i| i + 1).unwrap_or(0);
        if !head.is_empty() && head[line_start..].trim_start().starts_with("//") {
            head = &head[..line_start];
            continue;
        }

        break;
    }

    if !head.ends_with("*/") {
        return None;
    }

    let open = head.rfind("/*")?;
    let block = &head[open..];
    if !block.starts_with("/**") || block.len() < 5 {
        return None;
    }

    Some(DocComment::new(block))
}

fn strip_trailing_modifier(head: &str) -> Option<&str> {
    MODIFIERS.iter().find_map(|kw| {
        let rest = head.strip_suffix(kw)?;
        let boundary = rest
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '$'));
        boundary.then_some(rest)
    })
}

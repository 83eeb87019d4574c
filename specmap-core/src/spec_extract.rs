//! Specification extraction from prose documentation
//!
//! Global invariants enforced:
//! - Deterministic output ordered by first-seen position in the text
//! - Every evidence rule runs independently; duplicates are kept
//! - Malformed or unterminated markup yields nothing and never panics
//!
//! Each rule sets `mapped_function` to the name it found and `confidence` to
//! its weight from `EvidenceWeights`. See `EvidenceRule` for the patterns.

use crate::specification::{EvidenceRule, EvidenceWeights, Specification};
use regex::Regex;
use std::sync::OnceLock;

/// Info strings accepted on a fenced block (an empty info string also counts)
const SCRIPT_FENCES: &[&str] = &["js", "javascript", "ts", "typescript", "jsx", "tsx"];

/// Words that look like `name(...) {` in code but never name a function
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "return", "function",
];

const CODE_BLOCK_DESCRIPTION: &str = "Extracted from code block";

/// A specification tagged with the offset where its evidence starts
struct Found {
    offset: usize,
    spec: Specification,
}

/// Extract specifications from one documentation text
pub fn extract_specifications(text: &str, weights: &EvidenceWeights) -> Vec<Specification> {
    let mut found = Vec::new();

    collect_call_signatures(text, weights, &mut found);
    collect_bold_bullets(text, weights, &mut found);
    collect_code_blocks(text, weights, &mut found);
    collect_section_mentions(text, weights, &mut found);

    // Stable sort keeps rule order for evidence starting at the same offset
    found.sort_by_key(|f| f.offset);
    found.into_iter().map(|f| f.spec).collect()
}

fn call_signature_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([A-Za-z0-9_$]+)\(([^)\n]*)\)\*\*:?").unwrap())
}

fn bold_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*-[ \t]*\*\*([A-Za-z0-9_$]+)\*\*:?").unwrap())
}

fn code_definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:function\s+)?([A-Za-z_$][\w$]*)\s*\(([^)]*)\)[^{};]*\{").unwrap()
    })
}

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z0-9_$]+)\([^)]*\)").unwrap())
}

/// `**name(params)**: description`
fn collect_call_signatures(text: &str, weights: &EvidenceWeights, found: &mut Vec<Found>) {
    let mut consumed = 0;
    for cap in call_signature_re().captures_iter(text) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        // Markup inside a previous description belongs to that description
        if whole.start() < consumed {
            continue;
        }

        let (description, end) = block_text(text, whole.end());
        consumed = end;

        let name = &cap[1];
        let full = format!("{}({}): {}", name, &cap[2], description);
        found.push(Found {
            offset: whole.start(),
            spec: Specification::from_evidence(
                full.trim_end(),
                name,
                EvidenceRule::CallSignature,
                weights,
            ),
        });
    }
}

/// `- **name**: description`
fn collect_bold_bullets(text: &str, weights: &EvidenceWeights, found: &mut Vec<Found>) {
    let mut consumed = 0;
    for cap in bold_bullet_re().captures_iter(text) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        if whole.start() < consumed {
            continue;
        }

        let (description, end) = block_text(text, whole.end());
        consumed = end;

        let name = &cap[1];
        let full = format!("{}: {}", name, description);
        found.push(Found {
            offset: whole.start(),
            spec: Specification::from_evidence(
                full.trim_end(),
                name,
                EvidenceRule::BoldBullet,
                weights,
            ),
        });
    }
}

/// `name(params) {` inside fenced script blocks
fn collect_code_blocks(text: &str, weights: &EvidenceWeights, found: &mut Vec<Found>) {
    for (body_start, body) in script_blocks(text) {
        for cap in code_definition_re().captures_iter(body) {
            let name = &cap[1];
            if CONTROL_KEYWORDS.contains(&name) {
                continue;
            }
            let offset = body_start + cap.get(0).map_or(0, |m| m.start());
            let params = cap[2].split_whitespace().collect::<Vec<_>>().join(" ");
            found.push(Found {
                offset,
                spec: Specification::from_evidence(
                    format!("{}({}): {}", name, params, CODE_BLOCK_DESCRIPTION),
                    name,
                    EvidenceRule::CodeBlock,
                    weights,
                ),
            });
        }
    }
}

/// Bullets mentioning `name(...)` under `## Requirements` or `## Features`
fn collect_section_mentions(text: &str, weights: &EvidenceWeights, found: &mut Vec<Found>) {
    let mut in_section = false;

    for (offset, line) in lines_with_offsets(text) {
        let trimmed = line.trim();

        if trimmed.starts_with("##") {
            let heading = trimmed.trim_start_matches('#').trim_start();
            in_section = heading.starts_with("Requirements") || heading.starts_with("Features");
            continue;
        }

        if !in_section || !trimmed.starts_with(['-', '*']) {
            continue;
        }

        if let Some(cap) = mention_re().captures(trimmed) {
            // Bullet markers are ASCII, so byte 1 is a char boundary
            let description = trimmed[1..].trim_start();
            found.push(Found {
                offset,
                spec: Specification::from_evidence(
                    description,
                    &cap[1],
                    EvidenceRule::SectionMention,
                    weights,
                ),
            });
        }
    }
}

/// Text from `start` to the next block boundary, lines joined by single spaces
///
/// Returns the joined text and the offset where the block ends.
fn block_text(text: &str, start: usize) -> (String, usize) {
    let rest = text.get(start..).unwrap_or_default();
    let mut parts = Vec::new();
    let mut consumed = 0;

    for (index, line) in rest.split_inclusive('\n').enumerate() {
        if index > 0 && is_block_boundary(line) {
            break;
        }
        consumed += line.len();
        let content = line.trim();
        if !content.is_empty() {
            parts.push(content);
        }
    }

    (parts.join(" "), start + consumed)
}

fn is_block_boundary(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty()
        || line.starts_with("```")
        || line.starts_with(['-', '*', '#'])
        || line.starts_with(|c: char| c.is_ascii_digit())
}

/// Bodies of terminated fenced blocks tagged as script (or untagged)
fn script_blocks(text: &str) -> Vec<(usize, &str)> {
    let mut blocks = Vec::new();
    let mut open: Option<(bool, usize)> = None;

    for (offset, line) in lines_with_offsets(text) {
        let Some(info) = line.trim().strip_prefix("```") else {
            continue;
        };
        // Inline fences such as ```code``` are not block delimiters
        if info.contains("```") {
            continue;
        }

        match open.take() {
            None => open = Some((is_script_fence(info), offset + line.len())),
            Some((accepted, body_start)) => {
                if accepted {
                    blocks.push((body_start, &text[body_start..offset]));
                }
            }
        }
    }

    blocks
}

fn is_script_fence(info: &str) -> bool {
    match info.split_whitespace().next() {
        None => true,
        Some(lang) => SCRIPT_FENCES.iter().any(|f| lang.eq_ignore_ascii_case(f)),
    }
}

fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0usize, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

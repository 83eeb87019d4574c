//! Specification records and evidence rules
//!
//! Global invariants enforced:
//! - `confidence` is always within 0..=100 when present
//! - `mapped_function` and `confidence` are set or cleared together

use serde::{Deserialize, Serialize};

/// Upper bound for any confidence value
pub const MAX_CONFIDENCE: u8 = 100;

/// Documentation pattern that produced a specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceRule {
    /// `**name(params)**: description`
    CallSignature,
    /// `- **name**: description`
    BoldBullet,
    /// `name(params) {` inside a fenced JavaScript/TypeScript block
    CodeBlock,
    /// `name(...)` on a bullet under a Requirements or Features heading
    SectionMention,
}

impl EvidenceRule {
    pub const ALL: [EvidenceRule; 4] = [
        EvidenceRule::CallSignature,
        EvidenceRule::BoldBullet,
        EvidenceRule::CodeBlock,
        EvidenceRule::SectionMention,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceRule::CallSignature => "call_signature",
            EvidenceRule::BoldBullet => "bold_bullet",
            EvidenceRule::CodeBlock => "code_block",
            EvidenceRule::SectionMention => "section_mention",
        }
    }
}

/// Confidence assigned by each evidence rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceWeights {
    pub call_signature: u8,
    pub bold_bullet: u8,
    pub code_block: u8,
    pub section_mention: u8,
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        EvidenceWeights {
            call_signature: 90,
            bold_bullet: 85,
            code_block: 80,
            section_mention: 70,
        }
    }
}

impl EvidenceWeights {
    pub fn weight(&self, rule: EvidenceRule) -> u8 {
        match rule {
            EvidenceRule::CallSignature => self.call_signature,
            EvidenceRule::BoldBullet => self.bold_bullet,
            EvidenceRule::CodeBlock => self.code_block,
            EvidenceRule::SectionMention => self.section_mention,
        }
    }
}

/// An informal description of a function's intended behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<EvidenceRule>,
}

impl Specification {
    /// Unmapped specification with only a description
    pub fn new(description: impl Into<String>) -> Self {
        Specification {
            description: description.into(),
            mapped_function: None,
            confidence: None,
            evidence: None,
        }
    }

    /// Specification produced by an evidence rule
    pub fn from_evidence(
        description: impl Into<String>,
        function: impl Into<String>,
        rule: EvidenceRule,
        weights: &EvidenceWeights,
    ) -> Self {
        Specification {
            description: description.into(),
            mapped_function: Some(function.into()),
            confidence: Some(weights.weight(rule).min(MAX_CONFIDENCE)),
            evidence: Some(rule),
        }
    }

    /// Replace the mapping, keeping description and evidence
    pub fn mapped_to(self, function: impl Into<String>, confidence: u8) -> Self {
        Specification {
            mapped_function: Some(function.into()),
            confidence: Some(confidence.min(MAX_CONFIDENCE)),
            ..self
        }
    }

    /// Clear the mapping, keeping description and evidence
    pub fn unmapped(self) -> Self {
        Specification {
            mapped_function: None,
            confidence: None,
            ..self
        }
    }
}

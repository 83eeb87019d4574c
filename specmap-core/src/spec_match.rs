//! Specification-to-function reconciliation by name
//!
//! Global invariants enforced:
//! - Output has the same length and order as the input
//! - Functions are consulted in input order; the first case-insensitive hit wins
//! - An ambiguous fuzzy match leaves the specification unmapped
//! - Re-running on its own output never changes a mapping whose confidence
//!   exceeds `MatchPolicy::carry_threshold`
//!
//! Cascade, first match wins:
//! 1. Carry an existing mapping above the threshold if that function exists
//! 2. Exact name from the description prefix (`name(` or `name:`)
//! 3. Case-insensitive name
//! 4. Exactly one distinct name containing, or contained in, the candidate
//! 5. Otherwise clear the mapping

use crate::ast::FunctionInfo;
use crate::specification::{Specification, MAX_CONFIDENCE};
use anyhow::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Confidence values assigned at each step of the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Existing mappings strictly above this are carried over unchanged
    pub carry_threshold: u8,
    pub exact: u8,
    pub case_insensitive: u8,
    pub fuzzy: u8,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy {
            carry_threshold: 80,
            exact: 95,
            case_insensitive: 90,
            fuzzy: 75,
        }
    }
}

impl MatchPolicy {
    /// Check the cascade is monotonic and that re-matching is stable
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("carry_threshold", self.carry_threshold),
            ("exact", self.exact),
            ("case_insensitive", self.case_insensitive),
            ("fuzzy", self.fuzzy),
        ] {
            if value > MAX_CONFIDENCE {
                anyhow::bail!(
                    "matching.{} must be at most {} (got {})",
                    name,
                    MAX_CONFIDENCE,
                    value
                );
            }
        }

        if self.exact < self.case_insensitive {
            anyhow::bail!(
                "matching.exact ({}) must be at least matching.case_insensitive ({})",
                self.exact,
                self.case_insensitive
            );
        }
        if self.case_insensitive < self.fuzzy {
            anyhow::bail!(
                "matching.case_insensitive ({}) must be at least matching.fuzzy ({})",
                self.case_insensitive,
                self.fuzzy
            );
        }
        if self.case_insensitive <= self.carry_threshold {
            anyhow::bail!(
                "matching.case_insensitive ({}) must be greater than matching.carry_threshold ({})",
                self.case_insensitive,
                self.carry_threshold
            );
        }

        Ok(())
    }
}

/// Reconcile specifications against extracted functions
///
/// Specifications are consumed and replaced with their reconciled values.
pub fn match_specifications(
    specifications: Vec<Specification>,
    functions: &[FunctionInfo],
    policy: &MatchPolicy,
) -> Vec<Specification> {
    specifications
        .into_iter()
        .map(|spec| match_one(spec, functions, policy))
        .collect()
}

fn match_one(
    spec: Specification,
    functions: &[FunctionInfo],
    policy: &MatchPolicy,
) -> Specification {
    if carries_over(&spec, functions, policy) {
        return spec;
    }

    let Some(candidate) = candidate_name(&spec.description).map(str::to_string) else {
        return spec.unmapped();
    };

    if let Some(exact) = functions.iter().find(|f| f.name == candidate) {
        return spec.mapped_to(&exact.name, policy.exact);
    }

    let lowered = candidate.to_lowercase();
    if let Some(folded) = functions.iter().find(|f| f.name.to_lowercase() == lowered) {
        return spec.mapped_to(&folded.name, policy.case_insensitive);
    }

    // Duplicate names across files count once
    let fuzzy: BTreeSet<&str> = functions
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| name.contains(candidate.as_str()) || candidate.contains(name))
        .collect();

    let mut fuzzy = fuzzy.into_iter();
    match (fuzzy.next(), fuzzy.next()) {
        (Some(only), None) => spec.mapped_to(only, policy.fuzzy),
        _ => spec.unmapped(),
    }
}

fn carries_over(spec: &Specification, functions: &[FunctionInfo], policy: &MatchPolicy) -> bool {
    match (&spec.mapped_function, spec.confidence) {
        (Some(name), Some(confidence)) if confidence > policy.carry_threshold => {
            functions.iter().any(|f| &f.name == name)
        }
        _ => false,
    }
}

/// Function name a description starts with, as in `name(...)` or `name: ...`
fn candidate_name(description: &str) -> Option<&str> {
    static PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    let prefix_re = PREFIX_RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_$]+)[(:]").unwrap());

    prefix_re
        .captures(description)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

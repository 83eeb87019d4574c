//! Project configuration
//!
//! A JSON object with optional keys, taken from the first of: the `--config`
//! path, `.specmaprc.json`, `specmap.config.json`, or the `"specmap"` key of
//! `package.json`. Missing keys fall back to built-in values.

use crate::language::DEFAULT_DOCUMENTATION_EXTENSIONS;
use crate::spec_match::MatchPolicy;
use crate::specification::{EvidenceRule, EvidenceWeights, MAX_CONFIDENCE};
use crate::AnalysisOptions;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Used only when the config lists no `exclude` patterns
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/*.min.js",
];

/// Stand-alone config files, in lookup order
const CONFIG_FILE_NAMES: &[&str] = &[".specmaprc.json", "specmap.config.json"];

const PACKAGE_JSON_KEY: &str = "specmap";

/// Raw configuration as written by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecmapConfig {
    /// Globs a walked file must match; empty accepts everything
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// File extensions read as prose, with or without the leading dot
    #[serde(default)]
    pub documentation_extensions: Vec<String>,

    #[serde(default)]
    pub evidence: Option<EvidenceConfig>,

    #[serde(default)]
    pub matching: Option<MatchingConfig>,

    #[serde(default)]
    pub parallel: Option<bool>,
}

/// Per-rule overrides of `EvidenceWeights`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvidenceConfig {
    pub call_signature: Option<u8>,
    pub bold_bullet: Option<u8>,
    pub code_block: Option<u8>,
    pub section_mention: Option<u8>,
}

/// Per-step overrides of `MatchPolicy`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    pub carry_threshold: Option<u8>,
    pub exact: Option<u8>,
    pub case_insensitive: Option<u8>,
    pub fuzzy: Option<u8>,
}

/// Validated configuration with globs compiled and defaults filled in
#[derive(Debug)]
pub struct ResolvedConfig {
    pub include: Option<GlobSet>,
    pub exclude: GlobSet,
    /// Compared case-insensitively, without the leading dot
    pub documentation_extensions: Vec<String>,
    pub evidence: EvidenceWeights,
    pub matching: MatchPolicy,
    pub parallel: bool,
    /// Where the config came from; `None` when built-in defaults are used
    pub config_path: Option<PathBuf>,
}

impl SpecmapConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = self.evidence_weights();
        for rule in EvidenceRule::ALL {
            let weight = weights.weight(rule);
            if weight > MAX_CONFIDENCE {
                anyhow::bail!(
                    "evidence.{} must be at most {} (got {})",
                    rule.as_str(),
                    MAX_CONFIDENCE,
                    weight
                );
            }
        }

        self.match_policy().validate()?;

        if self
            .documentation_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            anyhow::bail!("documentation_extensions must not contain empty entries");
        }

        for (field, patterns) in [("include", &self.include), ("exclude", &self.exclude)] {
            for pattern in patterns {
                Glob::new(pattern)
                    .with_context(|| format!("invalid {} pattern: {}", field, pattern))?;
            }
        }

        Ok(())
    }

    fn evidence_weights(&self) -> EvidenceWeights {
        let base = EvidenceWeights::default();
        let Some(e) = &self.evidence else {
            return base;
        };
        EvidenceWeights {
            call_signature: e.call_signature.unwrap_or(base.call_signature),
            bold_bullet: e.bold_bullet.unwrap_or(base.bold_bullet),
            code_block: e.code_block.unwrap_or(base.code_block),
            section_mention: e.section_mention.unwrap_or(base.section_mention),
        }
    }

    fn match_policy(&self) -> MatchPolicy {
        let base = MatchPolicy::default();
        let Some(m) = &self.matching else {
            return base;
        };
        MatchPolicy {
            carry_threshold: m.carry_threshold.unwrap_or(base.carry_threshold),
            exact: m.exact.unwrap_or(base.exact),
            case_insensitive: m.case_insensitive.unwrap_or(base.case_insensitive),
            fuzzy: m.fuzzy.unwrap_or(base.fuzzy),
        }
    }

    /// Validate, compile globs and fill in defaults
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let include = if self.include.is_empty() {
            None
        } else {
            Some(compile_globs(self.include.iter().map(String::as_str))?)
        };

        let exclude = if self.exclude.is_empty() {
            compile_globs(DEFAULT_EXCLUDES.iter().copied())?
        } else {
            compile_globs(self.exclude.iter().map(String::as_str))?
        };

        let documentation_extensions = if self.documentation_extensions.is_empty() {
            DEFAULT_DOCUMENTATION_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        } else {
            self.documentation_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect()
        };

        Ok(ResolvedConfig {
            include,
            exclude,
            documentation_extensions,
            evidence: self.evidence_weights(),
            matching: self.match_policy(),
            parallel: self.parallel.unwrap_or(false),
            config_path: None,
        })
    }
}

fn compile_globs<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

impl ResolvedConfig {
    /// Excludes win over includes; no include globs means everything passes
    pub fn should_include(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        if self.exclude.is_match(path.as_ref()) {
            return false;
        }
        self.include
            .as_ref()
            .map_or(true, |include| include.is_match(path.as_ref()))
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            evidence: self.evidence,
            matching: self.matching,
            parallel: self.parallel,
        }
    }

    pub fn defaults() -> Result<Self> {
        SpecmapConfig::default().resolve()
    }
}

/// Look for a config in `project_root`, returning it with the file it came from
pub fn discover_config(project_root: &Path) -> Result<Option<(SpecmapConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

pub fn load_config_file(path: &Path) -> Result<SpecmapConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: SpecmapConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

fn load_from_package_json(path: &Path) -> Result<Option<SpecmapConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let Some(value) = pkg.get(PACKAGE_JSON_KEY) else {
        return Ok(None);
    };

    let config = SpecmapConfig::deserialize(value)
        .with_context(|| format!("invalid specmap config in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid specmap config in {}", path.display()))?;
    Ok(Some(config))
}

/// Resolve the explicit config if given, else the discovered one, else defaults
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let found = match config_path {
        Some(path) => Some((load_config_file(path)?, path.to_path_buf())),
        None => discover_config(project_root)?,
    };

    let (config, source) = match found {
        Some((config, path)) => (config, Some(path)),
        None => (SpecmapConfig::default(), None),
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source;
    Ok(resolved)
}

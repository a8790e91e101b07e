//! Engine configuration — the versioned keyword/label and glyph tables.
//!
//! Everything the engine matches against is injected here rather than
//! hardcoded, so operators can tune the classification vocabulary without
//! redeploying the engine. The shipped `Default` is the canonical table;
//! `from_toml_path` loads an operator override and validates it.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Current configuration schema version.
pub const CONFIG_VERSION: u32 = 1;

/// One classification rule: a label name and the keyword substrings that must
/// ALL appear (case-insensitively) in a line for the rule to match.
///
/// Rules are evaluated exhaustively per line; table order decides the single
/// winning label when several rules match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl LabelRule {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True when every keyword appears in the (already lowercased) line.
    pub fn matches(&self, line_lower: &str) -> bool {
        self.keywords
            .iter()
            .all(|kw| line_lower.contains(kw.to_lowercase().as_str()))
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub version: u32,
    /// Exchange-local time zone; trading days are calendar dates here.
    pub exchange_timezone: Tz,
    /// Header lines scanned by the classifier marker check and the
    /// trading-day resolver.
    pub header_scan_lines: usize,
    /// Minimum content length; guards against placeholder/test messages.
    pub min_content_len: usize,
    /// Case-folded tokens that reject a message when present anywhere in the
    /// content.
    pub blocklist: Vec<String>,
    /// Reference set for the coverage auditor. Empty means "use the names of
    /// `label_rules`" (see `expected_labels()`).
    pub expected_labels: Vec<String>,
    pub bullish_glyphs: Vec<char>,
    pub bearish_glyphs: Vec<char>,
    /// Glyphs that open a section-level bias note line.
    pub bias_markers: Vec<char>,
    /// Ordered classification table. Kept last so TOML serialization emits
    /// plain values before the array of tables.
    pub label_rules: Vec<LabelRule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            exchange_timezone: chrono_tz::America::New_York,
            header_scan_lines: 3,
            min_content_len: 20,
            blocklist: vec!["test".into(), "draft".into(), "ignore".into()],
            expected_labels: Vec::new(),
            bullish_glyphs: vec!['🔼', '⬆', '📈', '🚀', '🟢'],
            bearish_glyphs: vec!['🔽', '⬇', '📉', '🔻', '🔴'],
            bias_markers: vec!['⚠'],
            label_rules: vec![
                LabelRule::new("AggressiveBreakout", &["aggressive", "breakout"]),
                LabelRule::new("ConservativeBreakout", &["conservative", "breakout"]),
                LabelRule::new("AggressiveBreakdown", &["aggressive", "breakdown"]),
                LabelRule::new("ConservativeBreakdown", &["conservative", "breakdown"]),
                LabelRule::new("BounceLevel", &["bounce"]),
                LabelRule::new("RejectionLevel", &["rejection"]),
            ],
        }
    }
}

impl EngineConfig {
    /// Load and validate a TOML override file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The auditor's reference label set: explicit `expected_labels`, or the
    /// rule names when no explicit set was configured.
    pub fn expected_labels(&self) -> Vec<String> {
        if self.expected_labels.is_empty() {
            self.label_rules.iter().map(|r| r.name.clone()).collect()
        } else {
            self.expected_labels.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header_scan_lines == 0 {
            return Err(ConfigError::InvalidField {
                field: "header_scan_lines",
                reason: "must be at least 1".into(),
            });
        }
        let mut seen = HashSet::new();
        for rule in &self.label_rules {
            if rule.name.is_empty() {
                return Err(ConfigError::InvalidField {
                    field: "label_rules",
                    reason: "label name must not be empty".into(),
                });
            }
            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.is_empty()) {
                return Err(ConfigError::InvalidField {
                    field: "label_rules",
                    reason: format!("label '{}' must have non-empty keywords", rule.name),
                });
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigError::InvalidField {
                    field: "label_rules",
                    reason: format!("duplicate label name '{}'", rule.name),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

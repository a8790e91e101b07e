//! Classifier — decides whether a message is eligible for structured
//! extraction. Pure; failure is reported, never thrown.

use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// Outcome of the eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub eligible: bool,
    pub reason: Option<RejectReason>,
}

impl Classification {
    fn eligible() -> Self {
        Self { eligible: true, reason: None }
    }

    fn rejected(reason: RejectReason) -> Self {
        Self { eligible: false, reason: Some(reason) }
    }
}

/// Why a message was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Below the minimum content length; likely a placeholder.
    TooShort,
    /// A blocklisted token ("test", "draft", ...) appeared in the content.
    Blocklisted { token: String },
    /// The header lines lack the required marker tokens.
    MissingMarkers,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort => write!(f, "content below minimum length"),
            Self::Blocklisted { token } => write!(f, "blocklisted token '{token}' in content"),
            Self::MissingMarkers => write!(f, "header lacks A+ scalp setup markers"),
        }
    }
}

/// Case-fold and tokenize a line on whitespace/punctuation.
///
/// `+` is kept inside tokens so the "A+" marker survives tokenization.
pub(crate) fn tokenize(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct Classifier<'a> {
    config: &'a EngineConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Eligible only if the first `header_scan_lines` lines contain all of:
    /// an "A+" marker token, the word "scalp", and a word containing "setup".
    /// A blocklisted token anywhere in the content rejects the message.
    pub fn classify(&self, content: &str) -> Classification {
        if content.trim().chars().count() < self.config.min_content_len {
            return Classification::rejected(RejectReason::TooShort);
        }

        for token in content.lines().flat_map(tokenize) {
            if self.config.blocklist.iter().any(|b| *b == token) {
                return Classification::rejected(RejectReason::Blocklisted { token });
            }
        }

        let tokens: Vec<String> = content
            .lines()
            .take(self.config.header_scan_lines)
            .flat_map(tokenize)
            .collect();

        let has_marker = tokens.iter().any(|t| t == "a+");
        let has_scalp = tokens.iter().any(|t| t == "scalp");
        let has_setup = tokens.iter().any(|t| t.contains("setup"));

        if has_marker && has_scalp && has_setup {
            Classification::eligible()
        } else {
            Classification::rejected(RejectReason::MissingMarkers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(content: &str) -> Classification {
        let config = EngineConfig::default();
        Classifier::new(&config).classify(content)
    }

    #[test]
    fn accepts_standard_header() {
        let c = classify("A+ Scalp Trade Setups — Thursday May 29\nSPY\n🔼 600.10 601.00");
        assert!(c.eligible);
        assert!(c.reason.is_none());
    }

    #[test]
    fn accepts_case_variations() {
        let c = classify("a+ SCALP trade SETUPS for today\nSPY\n600.10 601.00");
        assert!(c.eligible);
    }

    #[test]
    fn accepts_setup_as_substring_token() {
        // "setups" contains "setup"
        let c = classify("A+ scalp setups\nQQQ\n500.10 501.00 502.00");
        assert!(c.eligible);
    }

    #[test]
    fn rejects_short_content() {
        let c = classify("A+ scalp setup");
        assert_eq!(c.reason, Some(RejectReason::TooShort));
    }

    #[test]
    fn rejects_blocklisted_token() {
        let c = classify("A+ Scalp Trade Setups test\nSPY\n600.10 601.00");
        assert_eq!(
            c.reason,
            Some(RejectReason::Blocklisted { token: "test".into() })
        );
    }

    #[test]
    fn rejects_blocklisted_token_in_body() {
        let c = classify("A+ Scalp Trade Setups — May 29\nSPY\ndraft levels 600.10 601.00");
        assert_eq!(
            c.reason,
            Some(RejectReason::Blocklisted { token: "draft".into() })
        );
    }

    #[test]
    fn blocklist_is_not_a_substring_match() {
        // "latest" contains "test" but is not the token "test"
        let c = classify("A+ Scalp Trade Setups — latest levels\nSPY\n600.10 601.00");
        assert!(c.eligible);
    }

    #[test]
    fn rejects_missing_marker() {
        let c = classify("Scalp trade setups for Thursday, no grade here\nSPY\n600.10");
        assert_eq!(c.reason, Some(RejectReason::MissingMarkers));
    }

    #[test]
    fn markers_outside_scanned_lines_do_not_count() {
        let c = classify("morning watchlist\nSPY\nQQQ\nA+ scalp trade setups below 600.10");
        assert_eq!(c.reason, Some(RejectReason::MissingMarkers));
    }

    #[test]
    fn tokenize_keeps_a_plus_together() {
        assert_eq!(tokenize("A+ Scalp — Setups!"), vec!["a+", "scalp", "setups"]);
    }
}

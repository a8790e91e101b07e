//! Section Splitter — partitions a message body into per-ticker text blocks
//! and an optional shared bias note per block.

use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// One ticker's block: the header symbol, its body lines in order, and the
/// shared bias note if a bias-marker line was present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSection {
    pub ticker: String,
    /// Non-empty body lines in message order, bias lines removed.
    pub lines: Vec<String>,
    pub bias_note: Option<String>,
}

/// Result of splitting: sections in message order plus advisory notes
/// (currently: extra bias lines that were dropped).
#[derive(Debug, Clone, Default)]
pub struct SplitOutcome {
    pub sections: Vec<TickerSection>,
    pub notes: Vec<String>,
}

/// A trimmed line of 1–5 ASCII uppercase letters is a ticker header.
pub fn is_ticker_header(line: &str) -> bool {
    let t = line.trim();
    (1..=5).contains(&t.len()) && t.chars().all(|c| c.is_ascii_uppercase())
}

fn bias_text(line: &str, config: &EngineConfig) -> Option<String> {
    let t = line.trim();
    let first = t.chars().next()?;
    if config.bias_markers.contains(&first) {
        // Emoji presentation often carries a trailing variation selector.
        let rest = t[first.len_utf8()..].trim_start_matches('\u{FE0F}');
        Some(rest.trim().to_string())
    } else {
        None
    }
}

/// Split a message body into ticker sections.
///
/// Lines before the first ticker header (the message header/preamble) are
/// discarded. Within a section, the first bias-marker line becomes the
/// section's shared note; later bias lines are dropped and reported in
/// `notes` rather than silently overwriting.
pub fn split_sections(content: &str, config: &EngineConfig) -> SplitOutcome {
    let mut outcome = SplitOutcome::default();
    let mut current: Option<TickerSection> = None;

    for line in content.lines() {
        if is_ticker_header(line) {
            if let Some(section) = current.take() {
                outcome.sections.push(section);
            }
            current = Some(TickerSection {
                ticker: line.trim().to_string(),
                lines: Vec::new(),
                bias_note: None,
            });
            continue;
        }

        let Some(section) = current.as_mut() else {
            // Preamble before the first ticker header.
            continue;
        };

        if let Some(bias) = bias_text(line, config) {
            if section.bias_note.is_none() {
                section.bias_note = Some(bias);
            } else {
                outcome
                    .notes
                    .push(format!("extra bias line dropped in section {}", section.ticker));
            }
            continue;
        }

        if !line.trim().is_empty() {
            section.lines.push(line.trim().to_string());
        }
    }

    if let Some(section) = current.take() {
        outcome.sections.push(section);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(content: &str) -> SplitOutcome {
        split_sections(content, &EngineConfig::default())
    }

    #[test]
    fn ticker_header_recognition() {
        assert!(is_ticker_header("SPY"));
        assert!(is_ticker_header("  QQQ  "));
        assert!(is_ticker_header("A"));
        assert!(is_ticker_header("GOOGL"));
        assert!(!is_ticker_header("TOOLONG"));
        assert!(!is_ticker_header("spy"));
        assert!(!is_ticker_header("SPY1"));
        assert!(!is_ticker_header(""));
        assert!(!is_ticker_header("SPY calls"));
    }

    #[test]
    fn splits_two_sections_in_order() {
        let out = split(
            "A+ Scalp Trade Setups — May 29\n\
             SPY\n\
             🔼 600.10 601.00\n\
             🔽 598.50 597.00\n\
             QQQ\n\
             🔼 520.25 521.50",
        );
        assert_eq!(out.sections.len(), 2);
        assert_eq!(out.sections[0].ticker, "SPY");
        assert_eq!(out.sections[0].lines.len(), 2);
        assert_eq!(out.sections[1].ticker, "QQQ");
        assert_eq!(out.sections[1].lines.len(), 1);
    }

    #[test]
    fn preamble_is_discarded() {
        let out = split("A+ Scalp Trade Setups\nsome commentary 600.10\nSPY\n600.10 601.00");
        assert_eq!(out.sections.len(), 1);
        assert_eq!(out.sections[0].lines, vec!["600.10 601.00"]);
    }

    #[test]
    fn bias_line_is_removed_from_body_and_captured() {
        let out = split("SPY\n⚠ Bias long above 600\n600.10 601.00");
        let section = &out.sections[0];
        assert_eq!(section.bias_note.as_deref(), Some("Bias long above 600"));
        assert_eq!(section.lines, vec!["600.10 601.00"]);
    }

    #[test]
    fn second_bias_line_is_dropped_with_note() {
        let out = split("SPY\n⚠ first bias\n⚠ second bias\n600.10 601.00");
        let section = &out.sections[0];
        assert_eq!(section.bias_note.as_deref(), Some("first bias"));
        assert_eq!(out.notes.len(), 1);
        assert!(out.notes[0].contains("SPY"));
    }

    #[test]
    fn bias_marker_with_variation_selector() {
        let out = split("SPY\n⚠\u{FE0F} fade strength into 601\n600.10 601.00");
        assert_eq!(
            out.sections[0].bias_note.as_deref(),
            Some("fade strength into 601")
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let out = split("SPY\n\n600.10 601.00\n\n");
        assert_eq!(out.sections[0].lines, vec!["600.10 601.00"]);
    }

    #[test]
    fn no_ticker_headers_yields_no_sections() {
        let out = split("A+ scalp setups\njust commentary\nmore text 600.10 601.00");
        assert!(out.sections.is_empty());
    }

    #[test]
    fn bias_before_any_ticker_is_preamble() {
        let out = split("⚠ market-wide caution\nSPY\n600.10 601.00");
        assert_eq!(out.sections[0].bias_note, None);
    }
}

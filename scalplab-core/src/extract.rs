//! Line Extractor — converts one setup line into a structured record:
//! price levels, direction, classification label, emoji hint.

use crate::config::EngineConfig;
use crate::domain::{Direction, MessageId, SetupId, TradeSetup};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeSet;
use thiserror::Error;

/// Recoverable per-line failures. The caller logs and skips the line;
/// the rest of the section continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than two price tokens on the line (a setup needs a trigger and
    /// at least one target).
    #[error("insufficient_prices: found {found} price token(s), need at least 2")]
    InsufficientPrices { found: usize },
}

/// Everything identifying the line being extracted.
pub struct LineContext<'a> {
    pub ticker: &'a str,
    pub trading_day: NaiveDate,
    /// 1-based position within the ticker section.
    pub index: u32,
    pub bias_note: Option<&'a str>,
    pub source_message_id: &'a MessageId,
}

pub struct LineExtractor {
    price_re: Regex,
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor {
    pub fn new() -> Self {
        // Candidate decimals; digit-count bounds are checked per match since
        // the regex crate has no lookarounds for clean word boundaries here.
        let price_re = Regex::new(r"\d+\.\d+").expect("price pattern is valid");
        Self { price_re }
    }

    /// All price tokens on the line, left to right: two-to-five integer
    /// digits, a dot, exactly two fraction digits.
    pub fn prices(&self, line: &str) -> Vec<f64> {
        self.price_re
            .find_iter(line)
            .filter_map(|m| {
                let (int_part, frac_part) = m.as_str().split_once('.')?;
                if (2..=5).contains(&int_part.len()) && frac_part.len() == 2 {
                    m.as_str().parse::<f64>().ok()
                } else {
                    None
                }
            })
            .collect()
    }

    /// Extract one setup line.
    ///
    /// The first price token is the trigger, the rest are targets in line
    /// order. Direction and label come from the configured glyph and
    /// keyword tables. The id is synthesized from
    /// `(trading_day, ticker, index)` so reprocessing is idempotent.
    pub fn extract(
        &self,
        config: &EngineConfig,
        line: &str,
        ctx: LineContext<'_>,
    ) -> Result<TradeSetup, LineError> {
        let prices = self.prices(line);
        if prices.len() < 2 {
            return Err(LineError::InsufficientPrices { found: prices.len() });
        }

        let trigger_level = prices[0];
        let target_prices = prices[1..].to_vec();

        let line_lower = line.to_lowercase();
        let mut matched_keywords = BTreeSet::new();
        let mut label = None;
        for rule in &config.label_rules {
            if rule.matches(&line_lower) {
                if label.is_none() {
                    label = Some(rule.name.clone());
                }
                matched_keywords.insert(rule.name.clone());
            }
        }

        Ok(TradeSetup {
            id: SetupId::synthesize(ctx.trading_day, ctx.ticker, ctx.index),
            ticker: ctx.ticker.to_string(),
            trading_day: ctx.trading_day,
            index: ctx.index,
            trigger_level,
            target_prices,
            direction: direction_of(line, config),
            label,
            matched_keywords,
            emoji_hint: first_emoji(line),
            raw_line: line.to_string(),
            bias_note: ctx.bias_note.map(str::to_string),
            source_message_id: ctx.source_message_id.clone(),
        })
    }
}

/// Direction is a total function of the line: the first directional glyph in
/// line order wins; no glyph defaults to `Long`.
pub fn direction_of(line: &str, config: &EngineConfig) -> Direction {
    for c in line.chars() {
        if config.bearish_glyphs.contains(&c) {
            return Direction::Short;
        }
        if config.bullish_glyphs.contains(&c) {
            return Direction::Long;
        }
    }
    Direction::Long
}

/// First decorative/emoji glyph on the line, independent of whether it was
/// direction-bearing. Variation selectors are skipped.
pub fn first_emoji(line: &str) -> Option<char> {
    line.chars().find(|&c| is_emoji(c))
}

fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x2190..=0x21FF      // arrows
        | 0x2300..=0x27BF    // misc technical, misc symbols, dingbats
        | 0x2B00..=0x2BFF    // misc symbols and arrows
        | 0x1F000..=0x1FAFF  // emoji blocks
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(msg: &MessageId) -> LineContext<'_> {
        LineContext {
            ticker: "SPY",
            trading_day: NaiveDate::from_ymd_opt(2025, 5, 29).unwrap(),
            index: 1,
            bias_note: None,
            source_message_id: msg,
        }
    }

    fn extract(line: &str) -> Result<TradeSetup, LineError> {
        let config = EngineConfig::default();
        let msg = MessageId::new("m-1");
        LineExtractor::new().extract(&config, line, ctx(&msg))
    }

    #[test]
    fn worked_example_aggressive_breakout() {
        let setup = extract("🔼 Aggressive Breakout Above 144.02 146.20, 148.00, 150.00").unwrap();
        assert_eq!(setup.trigger_level, 144.02);
        assert_eq!(setup.target_prices, vec![146.20, 148.00, 150.00]);
        assert_eq!(setup.direction, Direction::Long);
        assert_eq!(setup.label.as_deref(), Some("AggressiveBreakout"));
        assert!(setup.matched_keywords.contains("AggressiveBreakout"));
        assert_eq!(setup.emoji_hint, Some('🔼'));
    }

    #[test]
    fn price_pattern_digit_bounds() {
        let ex = LineExtractor::new();
        assert_eq!(ex.prices("10.50 12345.99"), vec![10.50, 12345.99]);
        // 1 integer digit, 6 integer digits, 3 fraction digits: all rejected
        assert!(ex.prices("1.50").is_empty());
        assert!(ex.prices("123456.50").is_empty());
        assert!(ex.prices("100.505").is_empty());
        // integers without a dot are not price tokens
        assert!(ex.prices("above 600 to 601").is_empty());
    }

    #[test]
    fn prices_preserve_line_order() {
        let ex = LineExtractor::new();
        assert_eq!(
            ex.prices("598.50 then 597.00, 595.25"),
            vec![598.50, 597.00, 595.25]
        );
    }

    #[test]
    fn one_price_is_insufficient() {
        assert_eq!(
            extract("Breakout above 144.02"),
            Err(LineError::InsufficientPrices { found: 1 })
        );
    }

    #[test]
    fn zero_prices_is_insufficient() {
        assert_eq!(
            extract("watch the open"),
            Err(LineError::InsufficientPrices { found: 0 })
        );
    }

    #[test]
    fn bearish_glyph_yields_short() {
        let setup = extract("🔻 Aggressive Breakdown Below 598.50 597.00").unwrap();
        assert_eq!(setup.direction, Direction::Short);
        assert_eq!(setup.label.as_deref(), Some("AggressiveBreakdown"));
    }

    #[test]
    fn no_glyph_defaults_to_long() {
        let setup = extract("Bounce off 595.00 596.50").unwrap();
        assert_eq!(setup.direction, Direction::Long);
        assert_eq!(setup.label.as_deref(), Some("BounceLevel"));
    }

    #[test]
    fn first_directional_glyph_wins() {
        let setup = extract("🔻🔼 mixed signals 598.50 600.00").unwrap();
        assert_eq!(setup.direction, Direction::Short);
        let setup = extract("🔼🔻 mixed signals 598.50 600.00").unwrap();
        assert_eq!(setup.direction, Direction::Long);
    }

    #[test]
    fn label_table_order_breaks_ties() {
        // Matches both AggressiveBreakout and (hypothetically) nothing else;
        // craft a line matching two rules to check ordering.
        let config = EngineConfig::default();
        let msg = MessageId::new("m-1");
        let line = "🔼 Aggressive Conservative Breakout 144.02 146.20";
        let setup = LineExtractor::new().extract(&config, line, ctx(&msg)).unwrap();
        // Both rules fully match; the first in table order wins.
        assert_eq!(setup.label.as_deref(), Some("AggressiveBreakout"));
        assert!(setup.matched_keywords.contains("ConservativeBreakout"));
        assert_eq!(setup.matched_keywords.len(), 2);
    }

    #[test]
    fn unlabeled_line_has_no_label() {
        let setup = extract("reclaim over 144.02 146.20").unwrap();
        assert_eq!(setup.label, None);
        assert!(setup.matched_keywords.is_empty());
    }

    #[test]
    fn emoji_hint_is_first_emoji_even_if_not_directional() {
        let setup = extract("⭐ 🔻 fade 598.50 597.00").unwrap();
        assert_eq!(setup.emoji_hint, Some('⭐'));
        assert_eq!(setup.direction, Direction::Short);
    }

    #[test]
    fn no_emoji_yields_none() {
        let setup = extract("bounce 595.00 596.50").unwrap();
        assert_eq!(setup.emoji_hint, None);
    }

    #[test]
    fn id_is_stable_across_reparses() {
        let a = extract("🔼 breakout 144.02 146.20").unwrap();
        let b = extract("🔼 breakout 144.02 146.20").unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn bias_note_is_carried_through() {
        let config = EngineConfig::default();
        let msg = MessageId::new("m-1");
        let context = LineContext {
            bias_note: Some("long bias above 600"),
            ..ctx(&msg)
        };
        let setup = LineExtractor::new()
            .extract(&config, "bounce 595.00 596.50", context)
            .unwrap();
        assert_eq!(setup.bias_note.as_deref(), Some("long bias above 600"));
    }
}

//! TradeSetup — one structured record per extracted price-trigger line,
//! plus the normalized per-price ParsedLevel child rows.

use super::ids::{MessageId, SetupId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trade direction inferred from directional glyphs on the line.
///
/// Direction is a total function of the line: absence of any directional
/// glyph defaults to `Long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

/// One extracted setup line, fully structured.
///
/// Invariants:
/// - exactly one `trigger_level`; `target_prices` preserves line order
/// - `(ticker, trading_day, index)` is unique within one engine invocation
///   and is the basis of `id`
/// - `trading_day` is an exchange-local calendar date, never a UTC date
/// - `bias_note`, when present, is shared by every setup in the same ticker
///   section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub id: SetupId,
    /// 1–5 uppercase letters.
    pub ticker: String,
    pub trading_day: NaiveDate,
    /// 1-based position within the ticker section.
    pub index: u32,
    pub trigger_level: f64,
    /// Target prices in line order; may be empty.
    pub target_prices: Vec<f64>,
    pub direction: Direction,
    /// Winning classification: first fully-matched rule in table order.
    pub label: Option<String>,
    /// Every rule whose full keyword set matched, for coverage auditing.
    /// Distinct from the single winning `label`.
    pub matched_keywords: BTreeSet<String>,
    /// First emoji found on the line, direction-bearing or not.
    pub emoji_hint: Option<char>,
    pub raw_line: String,
    pub bias_note: Option<String>,
    pub source_message_id: MessageId,
}

impl TradeSetup {
    /// Flatten this setup into normalized per-price level rows:
    /// the trigger first, then each target in line order.
    pub fn levels(&self) -> Vec<ParsedLevel> {
        let mut out = Vec::with_capacity(1 + self.target_prices.len());
        out.push(ParsedLevel {
            setup_id: self.id.clone(),
            level_type: LevelType::Trigger,
            sequence_order: 0,
            price: self.trigger_level,
        });
        for (i, &price) in self.target_prices.iter().enumerate() {
            out.push(ParsedLevel {
                setup_id: self.id.clone(),
                level_type: LevelType::Target,
                sequence_order: (i + 1) as u32,
                price,
            });
        }
        out
    }
}

/// Whether a parsed level is the trigger or one of the targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelType {
    Trigger,
    Target,
}

/// Normalized child row: one price, with a back-reference to its setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLevel {
    pub setup_id: SetupId,
    pub level_type: LevelType,
    /// 0 for the trigger, then 1..=N for targets in line order.
    pub sequence_order: u32,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_setup() -> TradeSetup {
        let day = NaiveDate::from_ymd_opt(2025, 5, 29).unwrap();
        TradeSetup {
            id: SetupId::synthesize(day, "SPY", 1),
            ticker: "SPY".into(),
            trading_day: day,
            index: 1,
            trigger_level: 144.02,
            target_prices: vec![146.20, 148.00, 150.00],
            direction: Direction::Long,
            label: Some("AggressiveBreakout".into()),
            matched_keywords: BTreeSet::from(["AggressiveBreakout".to_string()]),
            emoji_hint: Some('🔼'),
            raw_line: "🔼 Aggressive Breakout Above 144.02 146.20, 148.00, 150.00".into(),
            bias_note: None,
            source_message_id: MessageId::new("m-1"),
        }
    }

    #[test]
    fn levels_put_trigger_first_then_targets_in_order() {
        let levels = sample_setup().levels();
        assert_eq!(levels.len(), 4);
        assert_eq!(levels[0].level_type, LevelType::Trigger);
        assert_eq!(levels[0].sequence_order, 0);
        assert_eq!(levels[0].price, 144.02);
        assert_eq!(levels[1].level_type, LevelType::Target);
        assert_eq!(levels[1].price, 146.20);
        assert_eq!(levels[3].sequence_order, 3);
        assert_eq!(levels[3].price, 150.00);
    }

    #[test]
    fn levels_share_the_setup_id() {
        let setup = sample_setup();
        for level in setup.levels() {
            assert_eq!(level.setup_id, setup.id);
        }
    }

    #[test]
    fn setup_serialization_roundtrip() {
        let setup = sample_setup();
        let json = serde_json::to_string(&setup).unwrap();
        let deser: TradeSetup = serde_json::from_str(&json).unwrap();
        assert_eq!(setup, deser);
    }

    #[test]
    fn direction_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Direction::Long).unwrap(), "\"LONG\"");
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"SHORT\"");
    }
}

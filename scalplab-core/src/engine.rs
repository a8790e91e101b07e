//! Engine — the full extraction pipeline over one message:
//! classify → resolve trading day → split sections → extract lines → audit.
//!
//! Pure and synchronous: one call per message, no shared mutable state, no
//! I/O. Invocations may run concurrently with no coordination. Fatal
//! conditions short-circuit to a failed `EngineResult`; recoverable per-line
//! conditions accumulate into `diagnostics.errors`. Nothing is thrown
//! across this boundary.

use crate::audit::audit;
use crate::calendar::{is_weekend, resolve_trading_day};
use crate::classify::Classifier;
use crate::config::EngineConfig;
use crate::domain::{EngineResult, RawMessage, TradeSetup};
use crate::extract::{LineContext, LineExtractor};
use crate::sections::split_sections;

/// Fatal reason strings, stable across versions: callers and operators key
/// off these for manual-reprocessing workflows.
pub mod reason {
    pub const NOT_ELIGIBLE: &str = "not_eligible";
    pub const TRADING_DAY_UNRESOLVABLE: &str = "trading_day_unresolvable";
    pub const NO_TICKER_SECTIONS: &str = "no_ticker_sections";
}

pub struct Engine {
    config: EngineConfig,
    extractor: LineExtractor,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            extractor: LineExtractor::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one message into structured setups plus diagnostics.
    pub fn process(&self, message: &RawMessage) -> EngineResult {
        let classification = Classifier::new(&self.config).classify(&message.content);
        if !classification.eligible {
            let detail = classification
                .reason
                .map(|r| r.to_string())
                .unwrap_or_default();
            return EngineResult::failed(format!("{}: {detail}", reason::NOT_ELIGIBLE));
        }

        let trading_day =
            match resolve_trading_day(&message.content, message.timestamp, &self.config) {
                Ok(day) => day,
                Err(_) => return EngineResult::failed(reason::TRADING_DAY_UNRESOLVABLE),
            };

        let split = split_sections(&message.content, &self.config);
        if split.sections.is_empty() {
            return EngineResult::failed(reason::NO_TICKER_SECTIONS);
        }

        let mut setups: Vec<TradeSetup> = Vec::new();
        let mut errors: Vec<String> = split.notes;

        for section in &split.sections {
            let mut index: u32 = 0;
            for line in &section.lines {
                let ctx = LineContext {
                    ticker: &section.ticker,
                    trading_day,
                    index: index + 1,
                    bias_note: section.bias_note.as_deref(),
                    source_message_id: &message.message_id,
                };
                match self.extractor.extract(&self.config, line, ctx) {
                    Ok(setup) => {
                        index += 1;
                        setups.push(setup);
                    }
                    Err(err) => {
                        errors.push(format!("{}: skipped line '{line}': {err}", section.ticker));
                    }
                }
            }
        }

        let expected = self.config.expected_labels();
        let coverage = audit(&setups, &expected);

        EngineResult {
            success: true,
            trading_day: Some(trading_day),
            setups,
            diagnostics: crate::domain::Diagnostics {
                missing_labels: coverage.missing_labels,
                extra_count: coverage.extra_count,
                weekend_flag: is_weekend(trading_day),
                errors,
            },
        }
    }
}

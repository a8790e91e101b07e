//! EngineResult and its diagnostics block — the engine's output contract
//! toward the storage/notification collaborators.

use super::setup::TradeSetup;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of one engine invocation over a single message.
///
/// Fatal conditions (`not_eligible`, `trading_day_unresolvable`,
/// `no_ticker_sections`) produce `success = false` with zero setups and the
/// reason in `diagnostics.errors`. Recoverable per-line conditions are
/// accumulated in `diagnostics.errors` without affecting `success`.
/// Nothing is thrown across this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResult {
    pub success: bool,
    pub trading_day: Option<NaiveDate>,
    pub setups: Vec<TradeSetup>,
    pub diagnostics: Diagnostics,
}

impl EngineResult {
    /// A failed result: no trading day, no setups, one reason recorded.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            trading_day: None,
            setups: Vec::new(),
            diagnostics: Diagnostics {
                errors: vec![reason.into()],
                ..Diagnostics::default()
            },
        }
    }
}

/// Advisory signals accumulated across the pipeline. Never blocks output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Expected canonical labels with no matching setup in this message.
    pub missing_labels: Vec<String>,
    /// Labeled setups whose label is outside the expected set.
    pub extra_count: usize,
    /// Resolved date fell on Saturday/Sunday. Setups are still returned.
    pub weekend_flag: bool,
    /// Accumulated non-fatal conditions plus the fatal reason, if any.
    pub errors: Vec<String>,
}

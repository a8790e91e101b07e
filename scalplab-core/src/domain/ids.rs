use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic setup identifier.
///
/// Synthesized from `(trading_day, ticker, index)` so that re-parsing the
/// same logical line always yields the same id. This is what makes backlog
/// reprocessing idempotent: a replayed message produces setups with the same
/// ids as the original pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetupId(pub String);

impl SetupId {
    /// Synthesize the id from its logical key.
    ///
    /// Canonical form is `"YYYY-MM-DD:TICKER:index"` hashed with BLAKE3 for a
    /// stable, collision-resistant hex id across builds and platforms.
    pub fn synthesize(trading_day: NaiveDate, ticker: &str, index: u32) -> Self {
        let canonical = format!("{}:{}:{}", trading_day.format("%Y-%m-%d"), ticker, index);
        let hash = blake3::hash(canonical.as_bytes());
        Self(hash.to_hex().to_string())
    }
}

impl fmt::Display for SetupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat message identifier, assigned by the transport collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

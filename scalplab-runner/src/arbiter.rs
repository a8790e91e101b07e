//! Duplicate Arbiter — decides, across repeated submissions for the same
//! `(ticker, trading_day)`, which candidate batch is authoritative.
//!
//! The decision is a pure function of the governing policy plus the two
//! batches' metadata; the serialization boundary around shared state lives
//! in the store, not here. Keyed strictly by `(ticker, trading_day)`,
//! independent of which raw message produced either batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Governing policy for re-submissions. A configuration input, never a
/// hardcoded constant. The documented default is `Replace`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// First established batch wins; later candidates are always discarded.
    Skip,
    /// A strictly newer and longer candidate replaces the established batch;
    /// anything else is discarded.
    #[default]
    Replace,
    /// Like `Replace`, but losing candidates are retained as flagged,
    /// inactive revisions instead of being discarded.
    Allow,
}

/// Lifecycle state of a batch for one `(ticker, trading_day)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    /// Authoritative batch for its key.
    Established,
    /// Logically retired by a replacement. Never partially merged.
    Superseded,
    /// Losing candidate kept for inspection under the `Allow` policy.
    Inactive,
}

/// The metadata arbitration operates on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchMeta {
    pub message_timestamp: DateTime<Utc>,
    pub content_len: usize,
}

/// What to do with a candidate batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterDecision {
    /// No established batch, or the candidate wins: install it (prior data,
    /// if any, becomes superseded atomically).
    Install,
    /// The candidate loses and is dropped.
    Discard,
    /// The candidate loses but is kept as an inactive revision (`Allow`).
    RetainInactive,
}

/// A candidate replaces an established batch only when it is both strictly
/// newer and strictly longer.
pub fn should_replace(existing: &BatchMeta, candidate: &BatchMeta) -> bool {
    candidate.message_timestamp > existing.message_timestamp
        && candidate.content_len > existing.content_len
}

/// Arbitrate one candidate against the (possibly absent) established batch.
pub fn decide(
    policy: DuplicatePolicy,
    existing: Option<&BatchMeta>,
    candidate: &BatchMeta,
) -> ArbiterDecision {
    let Some(existing) = existing else {
        // absent → established, regardless of policy.
        return ArbiterDecision::Install;
    };

    match policy {
        DuplicatePolicy::Skip => ArbiterDecision::Discard,
        DuplicatePolicy::Replace => {
            if should_replace(existing, candidate) {
                ArbiterDecision::Install
            } else {
                ArbiterDecision::Discard
            }
        }
        DuplicatePolicy::Allow => {
            if should_replace(existing, candidate) {
                ArbiterDecision::Install
            } else {
                ArbiterDecision::RetainInactive
            }
        }
    }
}

//! Backlog replay — reprocess many historical messages.
//!
//! Engine invocations are pure and parallelize freely across a rayon pool;
//! commits are applied afterwards, serially and in input order, so
//! arbitration outcomes are deterministic for a given backlog ordering.

use rayon::prelude::*;
use scalplab_core::domain::{EngineResult, RawMessage, TradeSetup};
use scalplab_core::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::store::{BatchKey, CandidateBatch, CommitOutcome, SetupStore, StoreError};

/// Tally of one replay pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Messages fed to the engine.
    pub processed: usize,
    /// Messages that produced a successful parse.
    pub parsed: usize,
    /// Messages rejected or fatally failed; left for manual reprocessing.
    pub failed: usize,
    /// Recoverable per-line errors accumulated across all messages.
    pub line_errors: usize,
    pub established: usize,
    pub replaced: usize,
    pub discarded: usize,
    pub retained: usize,
}

/// Parse every message in parallel, then commit per-ticker batches serially.
///
/// A failed message never aborts the pass; it is tallied and logged with its
/// id so an operator can reprocess it manually.
pub fn replay_messages(
    messages: &[RawMessage],
    engine: &Engine,
    store: &SetupStore,
) -> Result<ReplayReport, StoreError> {
    let results: Vec<EngineResult> = messages
        .par_iter()
        .map(|message| engine.process(message))
        .collect();

    let mut report = ReplayReport {
        processed: messages.len(),
        ..ReplayReport::default()
    };

    for (message, result) in messages.iter().zip(&results) {
        report.line_errors += result
            .diagnostics
            .errors
            .iter()
            .filter(|e| e.contains("insufficient_prices"))
            .count();

        if !result.success {
            report.failed += 1;
            warn!(
                message_id = %message.message_id,
                reason = result.diagnostics.errors.first().map(String::as_str).unwrap_or(""),
                "message failed; left for manual reprocessing"
            );
            continue;
        }
        report.parsed += 1;

        for candidate in candidates_from(message, result) {
            match store.commit(candidate)? {
                CommitOutcome::Established => report.established += 1,
                CommitOutcome::Replaced => report.replaced += 1,
                CommitOutcome::Discarded => report.discarded += 1,
                CommitOutcome::RetainedInactive => report.retained += 1,
            }
        }
    }

    info!(
        processed = report.processed,
        parsed = report.parsed,
        failed = report.failed,
        established = report.established,
        replaced = report.replaced,
        "replay complete"
    );
    Ok(report)
}

/// Group one engine result into per-`(ticker, trading_day)` candidate
/// batches, preserving setup order within each ticker.
pub fn candidates_from(message: &RawMessage, result: &EngineResult) -> Vec<CandidateBatch> {
    let Some(trading_day) = result.trading_day else {
        return Vec::new();
    };
    let Some(timestamp) = message.timestamp else {
        return Vec::new();
    };

    let mut by_ticker: BTreeMap<String, Vec<TradeSetup>> = BTreeMap::new();
    for setup in &result.setups {
        by_ticker
            .entry(setup.ticker.clone())
            .or_default()
            .push(setup.clone());
    }

    by_ticker
        .into_iter()
        .map(|(ticker, setups)| CandidateBatch {
            key: BatchKey { ticker, trading_day },
            message_timestamp: timestamp,
            content_len: message.content.len(),
            setups,
        })
        .collect()
}

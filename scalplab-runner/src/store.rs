//! Setup store — the keyed, single-writer home of committed batches.
//!
//! Arbitration touches shared state keyed by `(ticker, trading_day)` and
//! must be serialized per key; a single mutex over the whole map is the
//! read-decide-write boundary here. Optionally journals every install as
//! one JSON object per line, so a restart can rebuild the active state by
//! replaying the file.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use scalplab_core::domain::TradeSetup;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::arbiter::{decide, ArbiterDecision, BatchMeta, BatchState, DuplicatePolicy};

/// Arbitration key: exchange-local trading day plus ticker, independent of
/// which raw message produced the batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchKey {
    pub ticker: String,
    pub trading_day: NaiveDate,
}

/// One candidate batch produced by a single engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateBatch {
    pub key: BatchKey,
    pub message_timestamp: DateTime<Utc>,
    /// Length of the raw message content the batch came from.
    pub content_len: usize,
    pub setups: Vec<TradeSetup>,
}

impl CandidateBatch {
    fn meta(&self) -> BatchMeta {
        BatchMeta {
            message_timestamp: self.message_timestamp,
            content_len: self.content_len,
        }
    }
}

/// How a commit was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// absent → established.
    Established,
    /// established → established with the prior batch superseded.
    Replaced,
    Discarded,
    RetainedInactive,
}

/// A batch at rest, with any retained inactive revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBatch {
    pub meta: BatchMeta,
    pub state: BatchState,
    pub setups: Vec<TradeSetup>,
    /// Revisions kept under the `Allow` policy, oldest first.
    pub inactive_revisions: Vec<RetainedRevision>,
}

/// A non-authoritative revision kept for inspection under the `Allow`
/// policy: a losing candidate (`Inactive`) or a prior authoritative batch
/// retired by a replacement (`Superseded`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetainedRevision {
    pub meta: BatchMeta,
    pub state: BatchState,
    pub setups: Vec<TradeSetup>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("journal I/O at '{path}': {source}")]
    Journal {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt journal line {line}: {source}")]
    CorruptJournal {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Store of authoritative batches behind a single-writer mutex.
#[derive(Debug)]
pub struct SetupStore {
    policy: DuplicatePolicy,
    inner: Mutex<HashMap<BatchKey, StoredBatch>>,
    journal: Option<PathBuf>,
}

impl SetupStore {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            inner: Mutex::new(HashMap::new()),
            journal: None,
        }
    }

    /// Attach a JSONL journal. Installs are appended; the file is created on
    /// first write.
    pub fn with_journal(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal = Some(path.into());
        self
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Commit one candidate batch under the arbitration policy.
    ///
    /// The read-decide-write runs entirely under the store mutex, so two
    /// concurrent commits on the same key cannot interleave their replace
    /// decisions.
    pub fn commit(&self, candidate: CandidateBatch) -> Result<CommitOutcome, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");

        let existing_meta = inner.get(&candidate.key).map(|b| b.meta);
        let decision = decide(self.policy, existing_meta.as_ref(), &candidate.meta());

        let outcome = match decision {
            ArbiterDecision::Install => {
                // Journal before touching the map: on an append failure the
                // live store must not run ahead of what a restart replays.
                self.journal_install(&candidate)?;
                let prior = inner.insert(
                    candidate.key.clone(),
                    StoredBatch {
                        meta: candidate.meta(),
                        state: BatchState::Established,
                        setups: candidate.setups.clone(),
                        inactive_revisions: Vec::new(),
                    },
                );
                let replaced = prior.is_some();
                // The superseded batch is retired whole. Under Allow it stays
                // inspectable as a revision, after any earlier losers; under
                // the other policies it is dropped.
                if let Some(mut old) = prior {
                    if self.policy == DuplicatePolicy::Allow {
                        let mut revisions = std::mem::take(&mut old.inactive_revisions);
                        revisions.push(RetainedRevision {
                            meta: old.meta,
                            state: BatchState::Superseded,
                            setups: old.setups,
                        });
                        if let Some(current) = inner.get_mut(&candidate.key) {
                            current.inactive_revisions = revisions;
                        }
                    }
                }
                if replaced {
                    CommitOutcome::Replaced
                } else {
                    CommitOutcome::Established
                }
            }
            ArbiterDecision::Discard => CommitOutcome::Discarded,
            ArbiterDecision::RetainInactive => {
                if let Some(batch) = inner.get_mut(&candidate.key) {
                    batch.inactive_revisions.push(RetainedRevision {
                        meta: candidate.meta(),
                        state: BatchState::Inactive,
                        setups: candidate.setups.clone(),
                    });
                }
                CommitOutcome::RetainedInactive
            }
        };

        match outcome {
            CommitOutcome::Established | CommitOutcome::Replaced => info!(
                ticker = %candidate.key.ticker,
                trading_day = %candidate.key.trading_day,
                setups = candidate.setups.len(),
                ?outcome,
                "batch committed"
            ),
            _ => debug!(
                ticker = %candidate.key.ticker,
                trading_day = %candidate.key.trading_day,
                ?outcome,
                "batch not installed"
            ),
        }

        Ok(outcome)
    }

    /// The authoritative setups for one key, if established.
    pub fn active(&self, key: &BatchKey) -> Option<Vec<TradeSetup>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner.get(key).map(|b| b.setups.clone())
    }

    /// All authoritative setups across keys, ordered by (day, ticker, index).
    pub fn all_active(&self) -> Vec<TradeSetup> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut setups: Vec<TradeSetup> = inner.values().flat_map(|b| b.setups.clone()).collect();
        setups.sort_by(|a, b| {
            (a.trading_day, &a.ticker, a.index).cmp(&(b.trading_day, &b.ticker, b.index))
        });
        setups
    }

    /// Revisions retained for a key under the `Allow` policy.
    pub fn inactive_revisions(&self, key: &BatchKey) -> Vec<RetainedRevision> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .get(key)
            .map(|b| b.inactive_revisions.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn journal_install(&self, candidate: &CandidateBatch) -> Result<(), StoreError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| StoreError::Journal {
                path: path.display().to_string(),
                source,
            })?;
        let line =
            serde_json::to_string(candidate).expect("CandidateBatch must serialize");
        writeln!(file, "{line}").map_err(|source| StoreError::Journal {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    /// Rebuild active state from a journal written by `commit`.
    ///
    /// Installs are replayed in file order, later installs for a key
    /// overwriting earlier ones — arbitration already happened when the
    /// journal was written, so it is not re-run here. Inactive revisions are
    /// not journaled and are not restored.
    pub fn load_journal(
        policy: DuplicatePolicy,
        path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::new(policy);

        let file = std::fs::File::open(path).map_err(|source| StoreError::Journal {
            path: path.display().to_string(),
            source,
        })?;
        let reader = std::io::BufReader::new(file);

        let mut inner = store.inner.lock().expect("store mutex poisoned");
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| StoreError::Journal {
                path: path.display().to_string(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let candidate: CandidateBatch = serde_json::from_str(&line)
                .map_err(|source| StoreError::CorruptJournal { line: i + 1, source })?;
            inner.insert(
                candidate.key.clone(),
                StoredBatch {
                    meta: candidate.meta(),
                    state: BatchState::Established,
                    setups: candidate.setups,
                    inactive_revisions: Vec::new(),
                },
            );
        }
        drop(inner);

        let mut store = store;
        store.journal = Some(path.to_path_buf());
        Ok(store)
    }
}

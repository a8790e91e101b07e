//! ScalpLab Runner — storage-side orchestration on top of `scalplab-core`.
//!
//! This crate provides everything around the pure engine:
//! - Duplicate arbitration keyed by `(ticker, trading_day)`
//! - Keyed setup store behind a single-writer boundary, with JSONL journal
//! - Parallel backlog replay (rayon) with deterministic serial commits
//! - CSV export of committed setups and normalized levels
//! - TOML runner configuration

pub mod arbiter;
pub mod config;
pub mod export;
pub mod replay;
pub mod store;

pub use arbiter::{decide, should_replace, ArbiterDecision, BatchMeta, BatchState, DuplicatePolicy};
pub use config::{ConfigError, RunnerConfig};
pub use export::{write_levels_csv, write_setups_csv, ExportError};
pub use replay::{candidates_from, replay_messages, ReplayReport};
pub use store::{
    BatchKey, CandidateBatch, CommitOutcome, RetainedRevision, SetupStore, StoreError, StoredBatch,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn store_is_send_sync() {
        assert_send::<SetupStore>();
        assert_sync::<SetupStore>();
    }

    #[test]
    fn report_is_send_sync() {
        assert_send::<ReplayReport>();
        assert_sync::<ReplayReport>();
    }
}

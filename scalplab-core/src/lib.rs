//! ScalpLab Core — deterministic extraction engine for A+ scalp setup
//! messages.
//!
//! The engine is a pure function of (message text, message metadata) →
//! (resolved trading day, structured setups, diagnostics):
//! - Classifier: eligibility gate over the header marker tokens
//! - Trading-Day Resolver: header date + exchange-local timestamp year
//! - Section Splitter: per-ticker blocks and shared bias notes
//! - Line Extractor: prices, direction, classification label per line
//! - Coverage Auditor: advisory label coverage, never blocking
//!
//! Storage, transport, and duplicate arbitration live in `scalplab-runner`.

pub mod audit;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod domain;
pub mod engine;
pub mod extract;
pub mod sections;

pub use config::{ConfigError, EngineConfig, LabelRule};
pub use domain::{
    Diagnostics, Direction, EngineResult, LevelType, MessageId, ParsedLevel, RawMessage, SetupId,
    TradeSetup,
};
pub use engine::Engine;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything crossing the replay worker-pool
    /// boundary is Send + Sync. Engine invocations parallelize freely; if
    /// any of these types loses the property, the build breaks here first.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::RawMessage>();
        require_sync::<domain::RawMessage>();
        require_send::<domain::TradeSetup>();
        require_sync::<domain::TradeSetup>();
        require_send::<domain::ParsedLevel>();
        require_sync::<domain::ParsedLevel>();
        require_send::<domain::EngineResult>();
        require_sync::<domain::EngineResult>();
        require_send::<domain::Diagnostics>();
        require_sync::<domain::Diagnostics>();
        require_send::<domain::SetupId>();
        require_sync::<domain::SetupId>();

        require_send::<config::EngineConfig>();
        require_sync::<config::EngineConfig>();
        require_send::<engine::Engine>();
        require_sync::<engine::Engine>();
    }
}

//! Domain types for the setup extraction engine.

pub mod diagnostics;
pub mod ids;
pub mod message;
pub mod setup;

pub use diagnostics::{Diagnostics, EngineResult};
pub use ids::{MessageId, SetupId};
pub use message::RawMessage;
pub use setup::{Direction, LevelType, ParsedLevel, TradeSetup};

/// Ticker symbol type alias (1–5 uppercase letters).
pub type Ticker = String;

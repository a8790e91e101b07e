//! CSV artifacts — committed setups and normalized level rows for
//! downstream analysis tooling.

use scalplab_core::domain::{LevelType, TradeSetup};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write one row per setup. Targets are `;`-joined in a single column so the
/// file stays one-row-per-setup.
pub fn write_setups_csv(path: impl AsRef<Path>, setups: &[TradeSetup]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record([
        "id",
        "ticker",
        "trading_day",
        "index",
        "direction",
        "trigger_level",
        "target_prices",
        "label",
        "emoji_hint",
        "bias_note",
        "source_message_id",
    ])?;

    for setup in setups {
        let targets = setup
            .target_prices
            .iter()
            .map(|p| format!("{p:.2}"))
            .collect::<Vec<_>>()
            .join(";");
        writer.write_record([
            setup.id.0.as_str(),
            setup.ticker.as_str(),
            &setup.trading_day.format("%Y-%m-%d").to_string(),
            &setup.index.to_string(),
            &format!("{:?}", setup.direction).to_uppercase(),
            &format!("{:.2}", setup.trigger_level),
            &targets,
            setup.label.as_deref().unwrap_or(""),
            &setup.emoji_hint.map(String::from).unwrap_or_default(),
            setup.bias_note.as_deref().unwrap_or(""),
            &setup.source_message_id.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the normalized level rows: one row per price, trigger first.
pub fn write_levels_csv(path: impl AsRef<Path>, setups: &[TradeSetup]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["setup_id", "level_type", "sequence_order", "price"])?;

    for setup in setups {
        for level in setup.levels() {
            let level_type = match level.level_type {
                LevelType::Trigger => "trigger",
                LevelType::Target => "target",
            };
            writer.write_record([
                level.setup_id.0.as_str(),
                level_type,
                &level.sequence_order.to_string(),
                &format!("{:.2}", level.price),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

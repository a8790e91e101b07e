//! Coverage Auditor — advisory comparison of the labels actually extracted
//! against the expected canonical set. Never removes, rejects, or alters
//! setups; feeds operator-facing health signals only.

use crate::domain::TradeSetup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of a coverage pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Expected labels with no matching setup, in expected-list order.
    pub missing_labels: Vec<String>,
    /// Setups carrying a label outside the expected set. Unlabeled setups do
    /// not count.
    pub extra_count: usize,
}

/// Compare the labels present in `setups` against `expected_labels`.
pub fn audit(setups: &[TradeSetup], expected_labels: &[String]) -> CoverageReport {
    let present: BTreeSet<&str> = setups
        .iter()
        .filter_map(|s| s.label.as_deref())
        .collect();
    let expected: BTreeSet<&str> = expected_labels.iter().map(String::as_str).collect();

    let missing_labels = expected_labels
        .iter()
        .filter(|l| !present.contains(l.as_str()))
        .cloned()
        .collect();

    let extra_count = setups
        .iter()
        .filter(|s| {
            s.label
                .as_deref()
                .is_some_and(|l| !expected.contains(l))
        })
        .count();

    CoverageReport { missing_labels, extra_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, MessageId, SetupId};
    use chrono::NaiveDate;
    use std::collections::BTreeSet as KwSet;

    fn setup_with_label(index: u32, label: Option<&str>) -> TradeSetup {
        let day = NaiveDate::from_ymd_opt(2025, 5, 29).unwrap();
        TradeSetup {
            id: SetupId::synthesize(day, "SPY", index),
            ticker: "SPY".into(),
            trading_day: day,
            index,
            trigger_level: 600.10,
            target_prices: vec![601.00],
            direction: Direction::Long,
            label: label.map(str::to_string),
            matched_keywords: KwSet::new(),
            emoji_hint: None,
            raw_line: "600.10 601.00".into(),
            bias_note: None,
            source_message_id: MessageId::new("m-1"),
        }
    }

    fn expected() -> Vec<String> {
        vec!["AggressiveBreakout".into(), "BounceLevel".into()]
    }

    #[test]
    fn reports_missing_labels_in_order() {
        let setups = vec![setup_with_label(1, Some("BounceLevel"))];
        let report = audit(&setups, &expected());
        assert_eq!(report.missing_labels, vec!["AggressiveBreakout"]);
        assert_eq!(report.extra_count, 0);
    }

    #[test]
    fn full_coverage_reports_nothing() {
        let setups = vec![
            setup_with_label(1, Some("AggressiveBreakout")),
            setup_with_label(2, Some("BounceLevel")),
        ];
        let report = audit(&setups, &expected());
        assert!(report.missing_labels.is_empty());
        assert_eq!(report.extra_count, 0);
    }

    #[test]
    fn unexpected_labels_are_counted_not_rejected() {
        let setups = vec![
            setup_with_label(1, Some("AggressiveBreakout")),
            setup_with_label(2, Some("GapFill")),
            setup_with_label(3, Some("GapFill")),
        ];
        let report = audit(&setups, &expected());
        assert_eq!(report.extra_count, 2);
        assert_eq!(report.missing_labels, vec!["BounceLevel"]);
    }

    #[test]
    fn unlabeled_setups_are_not_extra() {
        let setups = vec![setup_with_label(1, None)];
        let report = audit(&setups, &expected());
        assert_eq!(report.extra_count, 0);
        assert_eq!(report.missing_labels.len(), 2);
    }

    #[test]
    fn empty_setups_report_all_expected_missing() {
        let report = audit(&[], &expected());
        assert_eq!(report.missing_labels.len(), 2);
        assert_eq!(report.extra_count, 0);
    }
}

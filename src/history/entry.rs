//! A single recorded calculation.

use serde::{Deserialize, Serialize};

use crate::calculator::CalcResult;

/// A successful calculation kept in history.
///
/// Entries are never modified after creation; loading one back into the
/// calculator copies its fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The expression as the user entered it.
    pub expression: String,
    /// The canonical formatted result (no thousand separators).
    pub result: String,
    /// Local time the calculation was made, already formatted.
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Create an entry from a calculation result.
    /// Returns None for failed calculations, which are never recorded.
    pub fn from_calc_result(result: &CalcResult, timestamp: impl Into<String>) -> Option<Self> {
        match result {
            CalcResult::Success {
                expression, result, ..
            } => Some(Self::new(expression.as_str(), result.as_str(), timestamp)),
            CalcResult::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::evaluate_expression;

    #[test]
    fn test_from_successful_result() {
        let calc = evaluate_expression("1000*3", "Error").unwrap();
        let entry = HistoryEntry::from_calc_result(&calc, "16.10.2026 10:00:00").unwrap();
        assert_eq!(entry.expression, "1000*3");
        assert_eq!(entry.result, "3000");
        assert_eq!(entry.timestamp, "16.10.2026 10:00:00");
    }

    #[test]
    fn test_failed_result_is_not_recorded() {
        let calc = evaluate_expression("1/0", "Error").unwrap();
        assert!(HistoryEntry::from_calc_result(&calc, "now").is_none());
    }

    #[test]
    fn test_json_field_names() {
        let entry = HistoryEntry::new("2+2", "4", "t");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "expression": "2+2", "result": "4", "timestamp": "t" })
        );
    }
}

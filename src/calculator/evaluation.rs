//! Expression evaluation.
//!
//! Runs the rewrite pipeline, parses what is left as plain arithmetic and
//! wraps the outcome for display.

use super::error::EvalError;
use super::format::{apply_grouping, format_result};
use super::parser::evaluate_arithmetic;
use super::preprocess::rewrite;

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcResult {
    /// Successful calculation with a finite numeric result.
    Success {
        /// The original expression.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Canonical formatted result, as stored in history.
        result: String,
        /// Formatted for display (with thousand separators).
        display_result: String,
    },
    /// The expression could not be evaluated.
    Error {
        /// The original expression.
        expression: String,
        /// Error marker to display.
        message: String,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string (result or error marker).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { message, .. } => message,
        }
    }

    /// Get the canonical result string (only for successful results).
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Success { result, .. } => Some(result),
            Self::Error { .. } => None,
        }
    }

    /// Get the numeric value (only for successful results).
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }
}

/// Evaluate an expression to a finite number.
///
/// Deterministic: the same input always gives the same outcome.
pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    let rewritten = rewrite(expr)?;
    let value = evaluate_arithmetic(&rewritten)?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Evaluate user input for display.
///
/// Returns `None` for empty or whitespace-only input, in which case nothing
/// is evaluated. Failures are reported with `error_marker` as the message.
pub fn evaluate_expression(input: &str, error_marker: &str) -> Option<CalcResult> {
    if input.trim().is_empty() {
        return None;
    }

    let expression = input.to_string();

    match evaluate(input) {
        Ok(value) => {
            let result = format_result(value);
            tracing::debug!(%expression, %result, "evaluated expression");
            Some(CalcResult::Success {
                expression,
                display_result: apply_grouping(&result),
                result,
                value,
            })
        }
        Err(err) => {
            tracing::debug!(%expression, error = %err, "evaluation failed");
            Some(CalcResult::Error {
                expression,
                message: error_marker.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::format::strip_grouping;

    const MARKER: &str = "Error";

    fn formatted(input: &str) -> String {
        format_result(evaluate(input).unwrap())
    }

    #[test]
    fn test_basic_evaluation() {
        let result = evaluate_expression("2+2", MARKER).unwrap();
        assert!(result.is_success());
        assert_eq!(result.display(), "4");
        assert_eq!(result.result(), Some("4"));
        assert_eq!(result.value(), Some(4.0));
    }

    #[test]
    fn test_decimal_result() {
        assert_eq!(evaluate("10/4"), Ok(2.5));
        assert_eq!(formatted("10/4"), "2.5");
        assert_eq!(formatted("1/3"), "0.33333333");
    }

    #[test]
    fn test_power_and_factorial() {
        assert_eq!(formatted("2^10"), "1024");
        assert_eq!(formatted("5!"), "120");
        assert_eq!(formatted("3!+2^3"), "14");
        assert_eq!(formatted("-2^2"), "-4");
    }

    #[test]
    fn test_functions() {
        assert_eq!(formatted("sqrt(16)"), "4");
        assert_eq!(formatted("sin(90)"), "1");
        assert_eq!(formatted("cos(0)"), "1");
        assert_eq!(formatted("cos(90)"), "0");
        assert_eq!(formatted("sin(180)"), "0");
        assert_eq!(formatted("tan(45)"), "1");
        assert_eq!(formatted("log(1000)"), "3");
        assert_eq!(formatted("ln(1)"), "0");
        assert_eq!(formatted("2*sqrt(9)+1"), "7");
    }

    #[test]
    fn test_display_symbols() {
        assert_eq!(formatted("6 × 7"), "42");
        assert_eq!(formatted("9 ÷ 3"), "3");
        assert_eq!(formatted("π"), "3.14159265");
        assert_eq!(formatted("2×π"), "6.28318531");
    }

    #[test]
    fn test_thousand_separators() {
        let result = evaluate_expression("1,000 × 1,000", MARKER).unwrap();
        assert_eq!(result.display(), "1,000,000");
        assert_eq!(result.result(), Some("1000000"));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1/0"), Err(EvalError::NonFinite));
        assert_eq!(evaluate("0/0"), Err(EvalError::NonFinite));

        let result = evaluate_expression("1/0", MARKER).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.display(), MARKER);
        assert_eq!(result.result(), None);
    }

    #[test]
    fn test_invalid_expressions() {
        for input in ["2 +* 2", "(1+2", "abc", "sin(sqrt(16))", "5!!", "2(3)", "sqrt(-4)"] {
            let result = evaluate_expression(input, MARKER).unwrap();
            assert!(!result.is_success(), "{input} should fail");
            assert_eq!(result.display(), MARKER);
        }
    }

    #[test]
    fn test_empty_input_is_not_evaluated() {
        assert!(evaluate_expression("", MARKER).is_none());
        assert!(evaluate_expression("   \t", MARKER).is_none());
        assert_eq!(evaluate(""), Err(EvalError::Empty));
    }

    #[test]
    fn test_expression_is_preserved() {
        let result = evaluate_expression(" 1 + 1 ", MARKER).unwrap();
        assert_eq!(result.expression(), " 1 + 1 ");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        for input in ["sin(30)+cos(60)", "7!/3!", "2^0.5"] {
            assert_eq!(evaluate(input), evaluate(input));
        }
    }

    #[test]
    fn test_grouping_round_trip_preserves_outcome() {
        for input in [
            "12345+67890",
            "1000000/3",
            "sqrt(10000)*1234",
            "1234.5678*2",
            "2^12",
            "1/0",
            "9999!",
        ] {
            let regrouped = strip_grouping(&apply_grouping(input));
            assert_eq!(evaluate(&regrouped), evaluate(input), "{input}");
        }
    }
}

//! Calculator module for evaluating mathematical expressions.
//!
//! This module provides functionality to:
//! - Rewrite display input (`×`, `÷`, `π`, `^`, functions, `n!`) into arithmetic
//! - Parse and evaluate the arithmetic without any dynamic code execution
//! - Format results and apply or strip display grouping

mod error;
mod evaluation;
mod format;
mod parser;
mod preprocess;

pub use error::EvalError;
pub use evaluation::{CalcResult, evaluate, evaluate_expression};
pub use format::{GROUP_SEPARATOR, apply_grouping, format_result, strip_grouping};
pub use parser::{Token, evaluate_arithmetic, tokenize};
pub use preprocess::{Function, factorial, rewrite};

//! # zcalc
//!
//! A scientific calculator with a persistent, bounded history.
//!
//! Input may use display symbols (`×`, `÷`, `π`, `^`), the degree-based
//! trigonometric functions `sin`, `cos` and `tan`, plus `sqrt`, `log` (base 10),
//! `ln` and postfix factorial on integer literals (`5!`). Thousands separators
//! are ignored, so a grouped result can be fed straight back in.
//!
//! ```
//! use zcalc::calculator::{evaluate, format_result};
//!
//! let value = evaluate("2^10 + sqrt(16)").unwrap();
//! assert_eq!(format_result(value), "1028");
//! ```

pub mod calculator;
pub mod config;
pub mod history;
pub mod session;
pub mod store;
pub mod theme;
pub mod ui;

pub use calculator::{CalcResult, EvalError, evaluate, evaluate_expression, format_result};
pub use config::Config;
pub use history::{History, HistoryEntry};
pub use session::Session;
pub use store::{FileStore, MemoryStore, StateStore};
pub use theme::Theme;

//! Text rendering of calculator state.

use colored::ColoredString;

use crate::calculator::apply_grouping;
use crate::history::{History, HistoryEntry};
use crate::session::Session;
use crate::store::StateStore;

use super::Palette;

/// Render the current result with an "= " prefix.
///
/// Errors use the palette's error style; an empty result renders nothing.
pub fn render_result<S: StateStore>(session: &Session<S>, palette: &Palette) -> Option<String> {
    if session.result().is_empty() {
        return None;
    }

    let text = format!("= {}", session.display_result());
    let is_error = session.result() == session.config().error_marker;

    Some(if is_error {
        palette.error(&text)
    } else {
        palette.result(&text)
    })
}

/// Render the history list, newest first, with the index used by
/// `Session::load_from_history`.
pub fn render_history(history: &History, empty_label: &str, palette: &Palette) -> Vec<String> {
    if history.is_empty() {
        return vec![palette.muted(empty_label)];
    }

    history
        .list()
        .enumerate()
        .map(|(index, entry)| render_history_entry(index, entry, palette))
        .collect()
}

fn render_history_entry(index: usize, entry: &HistoryEntry, palette: &Palette) -> String {
    format!(
        "{} {} {}  {}",
        palette.muted(&format!("[{index}]")),
        palette.expression(&apply_grouping(&entry.expression)),
        palette.result(&format!("= {}", apply_grouping(&entry.result))),
        palette.muted(&entry.timestamp),
    )
}

pub(super) fn paint(text: &str, enabled: bool, style: impl FnOnce(&str) -> ColoredString) -> String {
    if enabled {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

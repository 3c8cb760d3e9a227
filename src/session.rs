//! Calculator state driven by user actions.
//!
//! A [`Session`] owns the current input and result, the history and the theme
//! preference. Each public method corresponds to one user action. Persistence
//! goes through a [`StateStore`]; write failures are logged and otherwise
//! ignored.

use crate::calculator::{CalcResult, apply_grouping, evaluate_expression};
use crate::config::Config;
use crate::history::{History, HistoryEntry};
use crate::store::{HISTORY_KEY, StateStore, THEME_KEY};
use crate::theme::Theme;

pub struct Session<S: StateStore> {
    store: S,
    config: Config,
    input: String,
    result: String,
    history: History,
    theme: Theme,
    show_history: bool,
}

impl<S: StateStore> Session<S> {
    /// Start a session, restoring theme and history from `store`.
    pub fn open(store: S, config: Config) -> Self {
        let theme = Theme::from_stored(store.load(THEME_KEY).as_deref());
        let history = store
            .load(HISTORY_KEY)
            .map(|json| History::from_json(&json))
            .unwrap_or_default();

        tracing::debug!(%theme, entries = history.len(), "restored session state");

        Self {
            store,
            config,
            input: String::new(),
            result: String::new(),
            history,
            theme,
            show_history: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current input with thousand separators.
    pub fn display_input(&self) -> String {
        apply_grouping(&self.input)
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    /// Current result with thousand separators. The error marker is returned
    /// untouched.
    pub fn display_result(&self) -> String {
        if self.result == self.config.error_marker {
            self.result.clone()
        } else {
            apply_grouping(&self.result)
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_history_visible(&self) -> bool {
        self.show_history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add text (a digit, operator, function name...) to the input.
    pub fn append(&mut self, text: &str) {
        self.input.push_str(text);
    }

    /// Replace the whole input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Clear both input and result.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.result.clear();
    }

    /// Remove the last character of the input.
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Evaluate the current input.
    ///
    /// Whitespace-only input is ignored and returns `None`. A successful
    /// calculation becomes the current result and is recorded in history; a
    /// failed one only sets the error marker.
    pub fn calculate(&mut self) -> Option<CalcResult> {
        let outcome = evaluate_expression(&self.input, &self.config.error_marker)?;

        match &outcome {
            CalcResult::Success { result, .. } => {
                self.result = result.clone();
                self.history
                    .append(self.input.as_str(), result.as_str(), &self.config.timestamp_format);
                self.save_history();
            }
            CalcResult::Error { message, .. } => {
                self.result = message.clone();
            }
        }

        Some(outcome)
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
    }

    /// Copy a history entry (newest first indexing) into input and result and
    /// close the history panel.
    pub fn load_from_history(&mut self, index: usize) -> Option<&HistoryEntry> {
        let entry = self.history.get(index)?;
        self.input = entry.expression.clone();
        self.result = entry.result.clone();
        self.show_history = false;
        Some(entry)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::warn!("Failed to clear stored history: {}", e);
        }
    }

    /// Switch between dark and light and persist the choice.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.save(THEME_KEY, self.theme.as_str()) {
            tracing::warn!("Failed to save theme: {}", e);
        }
        self.theme
    }

    fn save_history(&mut self) {
        let json = match self.history.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode history: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.save(HISTORY_KEY, &json) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MAX_HISTORY_ENTRIES;
    use crate::store::MemoryStore;

    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new(), Config::default())
    }

    fn calculate(session: &mut Session<MemoryStore>, input: &str) -> Option<CalcResult> {
        session.clear_input();
        session.append(input);
        session.calculate()
    }

    #[test]
    fn test_defaults() {
        let session = session();
        assert_eq!(session.theme(), Theme::Dark);
        assert!(session.history().is_empty());
        assert!(!session.is_history_visible());
        assert_eq!(session.input(), "");
        assert_eq!(session.result(), "");
    }

    #[test]
    fn test_button_input() {
        let mut session = session();
        for key in ["1", "2", "×", "3", "4"] {
            session.append(key);
        }
        assert_eq!(session.input(), "12×34");

        session.backspace();
        assert_eq!(session.input(), "12×3");

        session.calculate();
        assert_eq!(session.result(), "36");

        session.clear_input();
        assert_eq!(session.input(), "");
        assert_eq!(session.result(), "");
    }

    #[test]
    fn test_backspace_on_multibyte_char() {
        let mut session = session();
        session.append("2π");
        session.backspace();
        assert_eq!(session.input(), "2");
    }

    #[test]
    fn test_successful_calculation_is_recorded_and_saved() {
        let mut session = session();
        let outcome = calculate(&mut session, "2+2").unwrap();
        assert!(outcome.is_success());
        assert_eq!(session.result(), "4");

        let latest = session.history().latest().unwrap();
        assert_eq!(latest.expression, "2+2");
        assert_eq!(latest.result, "4");

        let stored = session.store().load(HISTORY_KEY).unwrap();
        assert_eq!(History::from_json(&stored), *session.history());
    }

    #[test]
    fn test_failed_calculation_leaves_history_untouched() {
        let mut session = session();
        calculate(&mut session, "2+2");
        let before = session.history().clone();

        let outcome = calculate(&mut session, "1/0").unwrap();
        assert!(!outcome.is_success());
        assert_eq!(session.result(), "Error");
        assert_eq!(session.display_result(), "Error");
        assert_eq!(*session.history(), before);
    }

    #[test]
    fn test_custom_error_marker() {
        let config = Config {
            error_marker: "Hata".to_string(),
            ..Config::default()
        };
        let mut session = Session::open(MemoryStore::new(), config);
        session.append("2+*2");
        session.calculate();
        assert_eq!(session.result(), "Hata");
    }

    #[test]
    fn test_blank_input_does_nothing() {
        let mut session = session();
        calculate(&mut session, "7*6");

        session.set_input("   ");
        assert!(session.calculate().is_none());
        assert_eq!(session.result(), "42");
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_display_grouping() {
        let mut session = session();
        calculate(&mut session, "1234*1000");
        assert_eq!(session.display_input(), "1,234*1,000");
        assert_eq!(session.result(), "1234000");
        assert_eq!(session.display_result(), "1,234,000");
    }

    #[test]
    fn test_history_cap_and_reload() {
        let mut session = session();
        for n in 1..=MAX_HISTORY_ENTRIES + 1 {
            calculate(&mut session, &format!("{n}*2"));
        }
        assert_eq!(session.history().len(), MAX_HISTORY_ENTRIES);

        session.clear_input();
        session.toggle_history();
        assert!(session.is_history_visible());

        let entry = session.load_from_history(0).cloned().unwrap();
        assert_eq!(entry.expression, "21*2");
        assert_eq!(entry.result, "42");
        assert_eq!(session.input(), "21*2");
        assert_eq!(session.result(), "42");
        assert!(!session.is_history_visible());

        let oldest = session.load_from_history(MAX_HISTORY_ENTRIES - 1).cloned().unwrap();
        assert_eq!(oldest.expression, "2*2");
        assert!(session.load_from_history(MAX_HISTORY_ENTRIES).is_none());
    }

    #[test]
    fn test_reloaded_entry_recalculates_to_same_result() {
        let mut session = session();
        calculate(&mut session, "sqrt(2)*π");
        let expected = session.result().to_string();

        session.clear_input();
        session.load_from_history(0);
        session.calculate();
        assert_eq!(session.result(), expected);
    }

    #[test]
    fn test_clear_history_removes_stored_key() {
        let mut session = session();
        calculate(&mut session, "1+1");
        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.store().load(HISTORY_KEY), None);
    }

    #[test]
    fn test_theme_toggle_is_persisted() {
        let mut session = session();
        assert_eq!(session.toggle_theme(), Theme::Light);
        assert_eq!(session.store().load(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(session.toggle_theme(), Theme::Dark);
        assert_eq!(session.store().load(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_state_is_restored_on_open() {
        let mut store = MemoryStore::new();
        store.save(THEME_KEY, "light").unwrap();
        store
            .save(
                HISTORY_KEY,
                r#"[{"expression":"5!","result":"120","timestamp":"01.01.2026 00:00:00"}]"#,
            )
            .unwrap();

        let session = Session::open(store, Config::default());
        assert_eq!(session.theme(), Theme::Light);
        assert_eq!(session.history().latest().map(|e| e.result.as_str()), Some("120"));
    }

    #[test]
    fn test_corrupt_stored_history_is_ignored() {
        let mut store = MemoryStore::new();
        store.save(HISTORY_KEY, "[{broken").unwrap();

        let mut session = Session::open(store, Config::default());
        assert!(session.history().is_empty());

        calculate(&mut session, "3*3");
        assert_eq!(session.history().len(), 1);
    }
}

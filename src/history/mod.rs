//! Bounded calculation history.
//!
//! Entries are kept oldest first. Once the cap is reached, appending evicts
//! the oldest entry. Consumers see the newest entry first.

mod entry;

pub use entry::HistoryEntry;

use std::collections::VecDeque;
use std::fmt::Write;

/// Maximum number of entries kept.
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// Default timestamp layout (`day.month.year hour:minute:second`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a calculation stamped with the current local time.
    pub fn append(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp_format: &str,
    ) -> &HistoryEntry {
        let timestamp = local_timestamp(timestamp_format);
        self.push(HistoryEntry::new(expression, result, timestamp))
    }

    /// Append an entry, evicting the oldest one if the cap is exceeded.
    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::trace!(expression = %evicted.expression, "evicted history entry");
            }
        }
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn list(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Entry at `index` in the newest-first view.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        let len = self.entries.len();
        if index >= len {
            return None;
        }
        self.entries.get(len - 1 - index)
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a JSON array, oldest first.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    /// Decode stored history.
    ///
    /// Anything unparseable yields an empty history. Stored lists longer than
    /// the cap keep only the newest entries.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<HistoryEntry>>(json) {
            Ok(entries) => entries.into_iter().collect(),
            Err(e) => {
                tracing::warn!("Discarding unreadable history: {}", e);
                Self::new()
            }
        }
    }
}

/// Current local time in `format`, falling back to the default layout when
/// `format` contains an invalid specifier.
fn local_timestamp(format: &str) -> String {
    let now = chrono::Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_ok() {
        return out;
    }

    tracing::warn!("Invalid timestamp format {:?}, using default", format);
    now.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
}

impl FromIterator<HistoryEntry> for History {
    fn from_iter<T: IntoIterator<Item = HistoryEntry>>(iter: T) -> Self {
        let mut history = Self::new();
        for entry in iter {
            history.push(entry);
        }
        history
    }
}

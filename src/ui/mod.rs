//! Terminal presentation.

pub mod render;

pub use render::{render_history, render_result};

use colored::Colorize;

use crate::theme::Theme;

use render::paint;

/// Styles for one theme. With `enabled` false every style is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    theme: Theme,
    enabled: bool,
}

impl Palette {
    pub fn new(theme: Theme, enabled: bool) -> Self {
        Self { theme, enabled }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn result(&self, text: &str) -> String {
        paint(text, self.enabled, |t| {
            if self.theme.is_dark() {
                t.bright_white().bold()
            } else {
                t.black().bold()
            }
        })
    }

    pub fn expression(&self, text: &str) -> String {
        paint(text, self.enabled, |t| {
            if self.theme.is_dark() {
                t.bright_blue()
            } else {
                t.blue()
            }
        })
    }

    pub fn error(&self, text: &str) -> String {
        paint(text, self.enabled, |t| {
            if self.theme.is_dark() {
                t.bright_red()
            } else {
                t.red()
            }
        })
    }

    pub fn muted(&self, text: &str) -> String {
        paint(text, self.enabled, |t| t.dimmed())
    }

    pub fn prompt(&self) -> String {
        paint("> ", self.enabled, |t| {
            if self.theme.is_dark() {
                t.bright_yellow()
            } else {
                t.purple()
            }
        })
    }
}

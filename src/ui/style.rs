//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors. Every helper
//! falls back to plain text when colors are disabled.

use owo_colors::OwoColorize;
use std::fmt::Display;

use crate::output;

/// Styles for different semantic elements.
pub struct Style;

fn paint<T: Display>(text: T, colored: impl FnOnce(&T) -> String) -> String {
    if output::is_no_color() {
        text.to_string()
    } else {
        colored(&text)
    }
}

impl Style {
    /// Style for section headers (e.g., "Supported language codes")
    pub fn header<T: Display>(text: T) -> String {
        paint(text, |t| t.bold().to_string())
    }

    /// Style for primary values (e.g., language names, key counts)
    pub fn value<T: Display>(text: T) -> String {
        paint(text, |t| t.cyan().to_string())
    }

    /// Style for secondary/supplementary info (e.g., descriptions)
    pub fn secondary<T: Display>(text: T) -> String {
        paint(text, |t| t.dimmed().to_string())
    }

    /// Style for file paths
    pub fn path<T: Display>(text: T) -> String {
        paint(text, |t| t.underline().to_string())
    }

    /// Style for success messages
    pub fn success<T: Display>(text: T) -> String {
        paint(text, |t| t.green().to_string())
    }

    /// Style for error messages
    pub fn error<T: Display>(text: T) -> String {
        paint(text, |t| t.red().bold().to_string())
    }

    /// Style for language codes
    pub fn code<T: Display>(text: T) -> String {
        paint(text, |t| t.yellow().to_string())
    }
}

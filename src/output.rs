//! Global output configuration and utilities.
//!
//! This module provides centralized control over CLI output behavior,
//! including quiet mode, verbose request dumps and color support.
//!
//! ## Design Principles
//!
//! - The completion message goes to stdout
//! - Status messages, progress, and logs go to stderr
//! - Errors always go to stderr
//! - Quiet mode suppresses non-essential output
//! - Verbose mode additionally dumps HTTP traffic to stderr
//! - Colors can be disabled via flag or `NO_COLOR` environment variable

use std::sync::OnceLock;

/// Global output configuration.
static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// Output configuration settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Disable colored output.
    pub no_color: bool,
    /// Print request/response details.
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            // Check NO_COLOR environment variable (https://no-color.org/)
            no_color: std::env::var("NO_COLOR").is_ok(),
            verbose: false,
        }
    }
}

/// Initialize the global output configuration.
///
/// This should be called once at startup with the CLI flags.
/// If called multiple times, subsequent calls are ignored.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

/// Get the current output configuration.
pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(OutputConfig::default)
}

/// Check if quiet mode is enabled.
pub fn is_quiet() -> bool {
    config().quiet
}

/// Check if colors are disabled.
pub fn is_no_color() -> bool {
    config().no_color
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    config().verbose
}

/// Print a status message to stderr (respects quiet mode).
///
/// Use this for progress indicators, informational messages, etc.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Print a diagnostic message to stderr (only in verbose mode).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::output::is_verbose() {
            eprintln!("[debug] {}", format_args!($($arg)*));
        }
    };
}

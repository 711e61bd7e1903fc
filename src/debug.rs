//! Debug logging utilities
//!
//! Debug output is switched on once at startup, by `--debug` or
//! `CMEXT_DEBUG`, and written to stderr with a `[DEBUG]` prefix. When it is
//! off, the `debug!` macro does not format its arguments.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize debug mode from the command-line flag and environment
///
/// Only the first call has an effect.
pub fn init_debug(flag: bool) {
    let _ = DEBUG_ENABLED.set(flag || crate::env_vars::debug());
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Print a debug message if debug mode is enabled
pub fn debug_log(message: &str) {
    if is_debug_enabled() {
        eprintln!("[DEBUG] {message}");
    }
}

/// Macro for convenient debug logging
///
/// Usage: `cmext::debug!("configured {} in {}", name, dir.display())`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}

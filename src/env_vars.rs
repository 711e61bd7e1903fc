//! Environment variable handling.
//!
//! Every variable cmext reads is looked up here. Command-line flags take
//! precedence over these, and these over config files.

use std::env;

// Helper for boolean environment variables that accept "1", "true", "yes"
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| {
        let s = s.to_lowercase();
        s == "1" || s == "true" || s == "yes"
    })
}

// Empty values count as unset
fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

// Build tool and interpreter

/// Get the `CMake` executable path (`CMAKE`).
pub fn cmake() -> Option<String> {
    non_empty("CMAKE")
}

/// Get the interpreter the extension is built for (`PYTHON`).
pub fn python() -> Option<String> {
    non_empty("PYTHON")
}

// Compiler settings forwarded to the configure step

/// Get the C compiler (`CC`).
pub fn cc() -> Option<String> {
    non_empty("CC")
}

/// Get the C++ compiler (`CXX`).
pub fn cxx() -> Option<String> {
    non_empty("CXX")
}

/// Get extra C compiler flags (`CFLAGS`).
pub fn cflags() -> Option<String> {
    non_empty("CFLAGS")
}

/// Get extra C++ compiler flags (`CXXFLAGS`).
pub fn cxxflags() -> Option<String> {
    non_empty("CXXFLAGS")
}

/// Get extra linker flags (`LDFLAGS`).
pub fn ldflags() -> Option<String> {
    non_empty("LDFLAGS")
}

// cmext settings

/// Get the build type (`CMEXT_BUILD_TYPE`), e.g. `Release`.
pub fn build_type() -> Option<String> {
    non_empty("CMEXT_BUILD_TYPE")
}

/// Get the number of parallel build jobs.
///
/// Checks `CMEXT_JOBS`, then `CMAKE_BUILD_PARALLEL_LEVEL`; returns None if
/// neither is set to a positive number.
pub fn jobs() -> Option<usize> {
    first_job_count(
        ["CMEXT_JOBS", "CMAKE_BUILD_PARALLEL_LEVEL"]
            .iter()
            .map(|var| env::var(var).ok()),
    )
}

/// First value that is a positive number; zero and garbage count as unset
fn first_job_count(values: impl IntoIterator<Item = Option<String>>) -> Option<usize> {
    values
        .into_iter()
        .flatten()
        .find_map(|value| value.trim().parse().ok().filter(|jobs: &usize| *jobs > 0))
}

/// Check if verbose output is enabled (`CMEXT_VERBOSE`).
pub fn verbose() -> bool {
    is_enabled("CMEXT_VERBOSE")
}

/// Check if debug logging is enabled (`CMEXT_DEBUG`).
pub fn debug() -> bool {
    is_enabled("CMEXT_DEBUG")
}

/// Get the user config directory override (`XDG_CONFIG_HOME`).
pub fn xdg_config_home() -> Option<String> {
    non_empty("XDG_CONFIG_HOME")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn job_count_prefers_first_variable() {
        assert_eq!(first_job_count(values(&[Some("8"), Some("2")])), Some(8));
        assert_eq!(first_job_count(values(&[None, Some(" 3 ")])), Some(3));
    }

    #[test]
    fn zero_or_garbage_falls_through_to_next_variable() {
        assert_eq!(first_job_count(values(&[Some("0"), Some("4")])), Some(4));
        assert_eq!(first_job_count(values(&[Some("many"), Some("4")])), Some(4));
        assert_eq!(first_job_count(values(&[Some("0"), None])), None);
    }
}

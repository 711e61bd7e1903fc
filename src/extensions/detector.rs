//! Extension detection
//!
//! Checks what is on disk around a build: whether a target's source
//! directory holds a `CMakeLists.txt`, whether its module name is usable,
//! and whether the build left a shared library in the output directory.

use super::error::BuildError;
use super::types::BuildTarget;
use std::fs;
use std::path::{Path, PathBuf};

/// Build descriptor the configure step expects in the source directory
pub const CMAKE_DESCRIPTOR: &str = "CMakeLists.txt";

/// File extensions accepted for a built shared library
pub const SHARED_LIBRARY_EXTENSIONS: [&str; 4] = ["so", "pyd", "dylib", "dll"];

/// Check that a name is a dotted sequence of identifiers
///
/// Examples:
/// - `hand_isomorphism_py` -> true
/// - `pkg._native` -> true
/// - `pkg..native`, `2fast`, `` -> false
#[must_use]
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|first| first == '_' || first.is_alphabetic())
                && chars.all(|c| c == '_' || c.is_alphanumeric())
        })
}

/// Locate the build descriptor in a source directory
#[must_use]
pub fn find_descriptor(source_dir: &Path) -> Option<PathBuf> {
    let descriptor = source_dir.join(CMAKE_DESCRIPTOR);
    descriptor.is_file().then_some(descriptor)
}

/// Validate a target before any build directory is touched
///
/// Returns the path of the build descriptor.
pub fn validate_target(target: &BuildTarget) -> Result<PathBuf, BuildError> {
    let invalid = |reason: String| BuildError::InvalidTarget {
        name: target.name.clone(),
        reason,
    };

    if !is_valid_module_name(&target.name) {
        return Err(invalid("module name must be dot-separated identifiers".to_string()));
    }

    if !target.source_dir.is_dir() {
        return Err(invalid(format!(
            "source directory {} does not exist",
            target.source_dir.display()
        )));
    }

    find_descriptor(&target.source_dir).ok_or_else(|| {
        invalid(format!(
            "no {CMAKE_DESCRIPTOR} in {}",
            target.source_dir.display()
        ))
    })
}

/// Check if a file name looks like the shared library for `leaf`
///
/// The name must be `leaf` or `lib` + `leaf`, followed by a `.`-led suffix
/// that is either the host's extension suffix or ends in a shared library
/// extension. `hand_iso.so` matches `hand_iso`; `hand_iso_extra.so` does not.
#[must_use]
pub fn is_artifact_name(file_name: &str, leaf: &str, ext_suffix: &str) -> bool {
    let rest = file_name
        .strip_prefix(leaf)
        .or_else(|| file_name.strip_prefix("lib").and_then(|n| n.strip_prefix(leaf)));

    let Some(rest) = rest else {
        return false;
    };

    if !rest.starts_with('.') {
        return false;
    }

    if !ext_suffix.is_empty() && rest.ends_with(ext_suffix) {
        return true;
    }

    rest.rsplit('.')
        .next()
        .is_some_and(|ext| SHARED_LIBRARY_EXTENSIONS.contains(&ext))
}

/// Find the shared library built for `leaf` in `output_dir`
///
/// Entries are checked in name order so the result does not depend on
/// directory iteration order.
#[must_use]
pub fn find_artifact(output_dir: &Path, leaf: &str, ext_suffix: &str) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(output_dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    candidates.into_iter().find(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| is_artifact_name(name, leaf, ext_suffix))
    })
}

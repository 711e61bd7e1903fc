//! Shared test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Module name used by the project fixtures
#[allow(dead_code)]
pub(crate) const MODULE: &str = "hand_isomorphism_py";

/// Get the path to the cmext binary built for this test run
pub(crate) fn get_cmext_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmext"))
}

/// Create a project directory whose root holds a `CMakeLists.txt`
#[allow(dead_code)]
pub(crate) fn create_project() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp.path().join("CMakeLists.txt"),
        format!("cmake_minimum_required(VERSION 3.15)\nproject({MODULE})\n"),
    )
    .expect("Failed to write CMakeLists.txt");
    temp
}

/// Write an executable shell script standing in for `cmake`
///
/// Every invocation is appended to `cmake.log` next to the script. The
/// configure step records `CMAKE_LIBRARY_OUTPUT_DIRECTORY` in the scratch
/// tree, and the build step creates `<module>.so` there. With
/// `fail_configure` the configure step prints a `CMake Error` and exits 1.
#[cfg(unix)]
#[allow(dead_code)]
pub(crate) fn write_fake_cmake(dir: &Path, fail_configure: bool) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("cmake.log");
    let configure_failure = if fail_configure {
        "echo \"CMake Error at CMakeLists.txt:3 (find_package): pybind11 not found\" >&2\nexit 1\n"
    } else {
        ""
    };

    let script = format!(
        r#"#!/bin/sh
echo "$(pwd) $*" >> "{log}"
case "$1" in
  --version)
    echo "cmake version 3.28.1"
    exit 0
    ;;
  --build)
    out=$(cat .fake-output-dir)
    mkdir -p "$out"
    touch "$out/{MODULE}.so"
    echo "[100%] Built target {MODULE}"
    exit 0
    ;;
esac
{configure_failure}for arg in "$@"; do
  case "$arg" in
    -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=*)
      echo "${{arg#-DCMAKE_LIBRARY_OUTPUT_DIRECTORY=}}" > .fake-output-dir
      ;;
  esac
done
echo "-- Configuring done"
"#,
        log = log.display(),
    );

    let path = dir.join("fake-cmake");
    fs::write(&path, script).expect("Failed to write fake cmake");
    let mut permissions = fs::metadata(&path).expect("Failed to stat fake cmake").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("Failed to chmod fake cmake");
    path
}

/// Read the invocation log written by the fake `cmake`
#[allow(dead_code)]
pub(crate) fn read_cmake_log(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("cmake.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

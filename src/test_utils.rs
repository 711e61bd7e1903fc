//! Shared test utilities for cmext tests
//!
//! Fixtures for source trees and a build tool fake that records every
//! invocation instead of spawning processes.

pub mod fixtures {
    use std::fs;
    use tempfile::TempDir;

    /// Create a source directory holding a minimal `CMakeLists.txt`
    pub fn create_source_tree() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let content = r"cmake_minimum_required(VERSION 3.15)
project(hand_isomorphism C CXX)
add_library(hand_isomorphism_py MODULE src/hand_isomorphism_py.cpp)
";

        fs::write(dir.path().join("CMakeLists.txt"), content)
            .expect("Failed to write CMakeLists.txt");
        dir
    }
}

pub mod fake_tool {
    use crate::extensions::tool::{BuildTool, CompileRequest, ConfigureRequest};
    use crate::extensions::types::ToolOutput;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    /// Build tool fake that logs calls into a shared sequence
    ///
    /// Calls are logged as `version`, `configure <scratch>` and
    /// `compile <scratch>`, where `<scratch>` is the scratch directory name
    /// (the target name). A successful compile writes `<leaf>.so` into the
    /// library output directory given to configure.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingTool {
        calls: Rc<RefCell<Vec<String>>>,
        library_dirs: Rc<RefCell<HashMap<PathBuf, PathBuf>>>,
        interpreters: Rc<RefCell<Vec<PathBuf>>>,
        /// Version query fails to spawn
        pub missing: bool,
        /// Version query runs but exits non-zero
        pub fail_version: bool,
        /// Target whose configure step exits non-zero
        pub fail_configure: Option<String>,
        /// Target whose build step exits non-zero
        pub fail_compile: Option<String>,
        /// Compile succeeds without writing a library
        pub skip_artifact: bool,
    }

    impl RecordingTool {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn missing() -> Self {
            Self {
                missing: true,
                ..Self::default()
            }
        }

        pub fn failing_version() -> Self {
            Self {
                fail_version: true,
                ..Self::default()
            }
        }

        /// Configure exits non-zero for the target named `name`
        pub fn failing_configure(name: &str) -> Self {
            Self {
                fail_configure: Some(name.to_string()),
                ..Self::default()
            }
        }

        /// Compile exits non-zero for the target named `name`
        pub fn failing_compile(name: &str) -> Self {
            Self {
                fail_compile: Some(name.to_string()),
                ..Self::default()
            }
        }

        pub fn without_artifact() -> Self {
            Self {
                skip_artifact: true,
                ..Self::default()
            }
        }

        /// Snapshot of the call sequence
        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        /// Interpreter paths passed to configure, in call order
        pub fn interpreters(&self) -> Vec<PathBuf> {
            self.interpreters.borrow().clone()
        }

        fn scratch_name(scratch_dir: &Path) -> String {
            scratch_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        }

        fn exit(success: bool, output: &str) -> ToolOutput {
            ToolOutput {
                success,
                code: Some(i32::from(!success)),
                output: output.to_string(),
            }
        }
    }

    impl BuildTool for RecordingTool {
        fn name(&self) -> &str {
            "fake-cmake"
        }

        fn version(&self) -> io::Result<ToolOutput> {
            self.calls.borrow_mut().push("version".to_string());
            if self.missing {
                return Err(io::Error::new(io::ErrorKind::NotFound, "fake-cmake not found"));
            }
            if self.fail_version {
                return Ok(Self::exit(false, "fake-cmake: unsupported option\n"));
            }
            Ok(Self::exit(true, "fake-cmake version 3.28.1\n"))
        }

        fn configure(&self, request: &ConfigureRequest<'_>) -> io::Result<ToolOutput> {
            let name = Self::scratch_name(request.scratch_dir);
            self.calls.borrow_mut().push(format!("configure {name}"));
            self.interpreters
                .borrow_mut()
                .push(request.interpreter.to_path_buf());

            if self.fail_configure.as_deref() == Some(name.as_str()) {
                return Ok(Self::exit(false, "CMake Error: bad project\n"));
            }

            self.library_dirs.borrow_mut().insert(
                request.scratch_dir.to_path_buf(),
                request.library_output_dir.to_path_buf(),
            );
            Ok(Self::exit(true, "-- Configuring done\n"))
        }

        fn compile(&self, request: &CompileRequest<'_>) -> io::Result<ToolOutput> {
            let name = Self::scratch_name(request.scratch_dir);
            self.calls.borrow_mut().push(format!("compile {name}"));

            if self.fail_compile.as_deref() == Some(name.as_str()) {
                return Ok(Self::exit(false, "error: hand_index.c:12: expected ';'\n"));
            }

            if !self.skip_artifact {
                let library_dir = self.library_dirs.borrow().get(request.scratch_dir).cloned();
                if let Some(library_dir) = library_dir {
                    let leaf = name.rsplit('.').next().unwrap_or(&name);
                    fs::create_dir_all(&library_dir)?;
                    fs::write(library_dir.join(format!("{leaf}.so")), "")?;
                }
            }

            Ok(Self::exit(true, "[100%] Built target\n"))
        }
    }
}

pub mod assertions {
    /// Assert that an error message contains a specific substring
    pub fn assert_error_contains(error_msg: &str, expected_text: &str) {
        assert!(
            error_msg.to_lowercase().contains(&expected_text.to_lowercase()),
            "Error message '{error_msg}' does not contain '{expected_text}'"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tree_has_descriptor() {
        let dir = fixtures::create_source_tree();
        let content = std::fs::read_to_string(dir.path().join("CMakeLists.txt")).unwrap();
        assert!(content.contains("hand_isomorphism_py"));
    }

    #[test]
    fn clones_share_the_call_log() {
        use crate::extensions::tool::BuildTool;

        let tool = fake_tool::RecordingTool::new();
        let handle = tool.clone();
        tool.version().unwrap();

        assert_eq!(handle.calls(), vec!["version"]);
    }
}

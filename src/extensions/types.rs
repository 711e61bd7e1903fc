//! Extension build types
//!
//! A native extension is described by its logical module name and the
//! directory holding its `CMakeLists.txt`. This module defines that unit of
//! work, the per-target build state machine, and what a finished build
//! reports back.

use super::error::{BuildError, Step};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

/// A native extension to build
///
/// Created when the host enumerates its extensions and consumed by exactly
/// one build. The output directory is not stored here: it is resolved from
/// the host layout each time the target is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Logical module name, possibly dotted (`pkg.hand_isomorphism_py`)
    pub name: String,
    /// Absolute path to the directory containing the build descriptor
    pub source_dir: PathBuf,
}

impl BuildTarget {
    /// Create a target, making `source_dir` absolute.
    ///
    /// An empty `source_dir` means the current directory.
    pub fn new(name: impl Into<String>, source_dir: impl AsRef<Path>) -> Result<Self, BuildError> {
        let name = name.into();
        let source_dir = source_dir.as_ref();
        let source_dir = if source_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            source_dir
        };

        let absolute = std::path::absolute(source_dir).map_err(|source| BuildError::Io {
            step: Step::Validate,
            path: source_dir.to_path_buf(),
            source,
        })?;

        Ok(Self {
            name,
            source_dir: absolute,
        })
    }

    /// Last component of the dotted module name
    ///
    /// `pkg.sub.fast` -> `fast`
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Build progress of a single target
///
/// `Unbuilt -> Configuring -> Configured -> Compiling -> Built`, and any
/// state that is not terminal may move to `Failed`. Nothing skips a step and
/// nothing moves backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    Unbuilt,
    Configuring,
    Configured,
    Compiling,
    Built,
    /// Terminal failure with the reason shown to the user
    Failed(String),
}

impl TargetState {
    /// The state reached when the current step succeeds
    #[must_use]
    pub const fn successor(&self) -> Option<Self> {
        match self {
            Self::Unbuilt => Some(Self::Configuring),
            Self::Configuring => Some(Self::Configured),
            Self::Configured => Some(Self::Compiling),
            Self::Compiling => Some(Self::Built),
            Self::Built | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Built | Self::Failed(_))
    }

    /// Check whether moving to `next` is allowed
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match next {
            Self::Failed(_) => !self.is_terminal(),
            _ => self.successor().as_ref() == Some(next),
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbuilt => f.write_str("unbuilt"),
            Self::Configuring => f.write_str("configuring"),
            Self::Configured => f.write_str("configured"),
            Self::Compiling => f.write_str("compiling"),
            Self::Built => f.write_str("built"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// State of one target within a builder run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetProgress {
    pub name: String,
    pub state: TargetState,
}

/// Captured result of one build tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
    /// stdout followed by stderr, unmodified
    pub output: String,
}

impl ToolOutput {
    #[must_use]
    pub fn from_process(output: &Output) -> Self {
        let mut combined = Vec::with_capacity(output.stdout.len() + output.stderr.len());
        combined.extend_from_slice(&output.stdout);
        combined.extend_from_slice(&output.stderr);

        Self {
            success: output.status.success(),
            code: output.status.code(),
            output: String::from_utf8_lossy(&combined).into_owned(),
        }
    }

    /// First non-empty line, e.g. `cmake version 3.28.1` for a version query
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.output.lines().map(str::trim).find(|line| !line.is_empty())
    }
}

/// Compiler settings forwarded to the configure step
///
/// Taken from `CC`, `CXX`, `CFLAGS`, `CXXFLAGS` and `LDFLAGS` by the caller
/// so the builder never reads the process environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilerEnv {
    pub cc: Option<String>,
    pub cxx: Option<String>,
    pub cflags: Option<String>,
    pub cxxflags: Option<String>,
    pub ldflags: Option<String>,
}

impl CompilerEnv {
    /// Read compiler settings from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            cc: crate::env_vars::cc(),
            cxx: crate::env_vars::cxx(),
            cflags: crate::env_vars::cflags(),
            cxxflags: crate::env_vars::cxxflags(),
            ldflags: crate::env_vars::ldflags(),
        }
    }
}

/// Optional knobs on top of the fixed configure parameters
///
/// The default value adds nothing to either tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// `CMAKE_BUILD_TYPE` on configure, `--config` on build
    pub build_type: Option<String>,
    /// Generator passed as `-G`
    pub generator: Option<String>,
    /// Extra configure arguments, appended in order
    pub cmake_args: Vec<String>,
    /// Parallel jobs for the build step
    pub jobs: Option<usize>,
    pub compiler: CompilerEnv,
}

/// A configured scratch build tree, ready for compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredTree {
    pub scratch_dir: PathBuf,
    pub output: ToolOutput,
}

/// Result of a successful extension build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Module name
    pub name: String,
    /// Directory the host imports the module from
    pub output_dir: PathBuf,
    /// Scratch build directory used by the tool
    pub scratch_dir: PathBuf,
    /// The shared library that was produced
    pub artifact: PathBuf,
    pub duration: Duration,
    /// Configure output followed by build output
    pub output: String,
}

//! Extension build errors

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Step of an extension build, used to report where a build stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Build tool lookup and version query
    Tool,
    /// Target validation and output path resolution
    Validate,
    Configure,
    Compile,
    /// Check that the shared library was produced
    Artifact,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tool => "tool check",
            Self::Validate => "validation",
            Self::Configure => "configure",
            Self::Compile => "compile",
            Self::Artifact => "artifact check",
        })
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{tool} is not available: {detail}")]
    ToolNotFound { tool: String, detail: String },

    #[error("invalid extension {name}: {reason}")]
    InvalidTarget { name: String, reason: String },

    #[error("configuration of {target} failed ({})", exit_label(.code))]
    Configuration {
        target: String,
        code: Option<i32>,
        output: String,
    },

    #[error("build of {target} failed ({})", exit_label(.code))]
    Build {
        target: String,
        code: Option<i32>,
        output: String,
    },

    #[error("build of {target} produced no shared library in {}", output_dir.display())]
    ArtifactMissing { target: String, output_dir: PathBuf },

    #[error("failed to run the {step} step: {source}")]
    Spawn {
        step: Step,
        #[source]
        source: io::Error,
    },

    #[error("{step} step failed on {}: {source}", path.display())]
    Io {
        step: Step,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// The step that failed
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::ToolNotFound { .. } => Step::Tool,
            Self::InvalidTarget { .. } => Step::Validate,
            Self::Configuration { .. } => Step::Configure,
            Self::Build { .. } => Step::Compile,
            Self::ArtifactMissing { .. } => Step::Artifact,
            Self::Spawn { step, .. } | Self::Io { step, .. } => *step,
        }
    }

    /// Captured tool output for configure and build failures
    #[must_use]
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::Configuration { output, .. } | Self::Build { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}

//! Extension Builder Orchestration
//!
//! Turns build targets into shared libraries placed where the host imports
//! them from. For each target: validate, resolve the output directory,
//! configure a scratch tree, build it, and check the library exists.
//! Targets are built one after another and the first failure stops the run.

use super::detector::{find_artifact, validate_target};
use super::error::{BuildError, Step};
use super::layout::HostLayout;
use super::tool::{BuildTool, CompileRequest, ConfigureRequest};
use super::types::{
    BuildOptions, BuildReport, BuildTarget, ConfiguredTree, TargetProgress, TargetState,
    ToolOutput,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Extension builder coordinator
///
/// Generic over the build tool and the host layout so both can be replaced
/// in tests. The interpreter path is given explicitly and passed through to
/// every configure step.
#[derive(Debug)]
pub struct ExtensionBuilder<T, L> {
    tool: T,
    layout: L,
    interpreter: PathBuf,
    options: BuildOptions,
    /// Echo captured tool output after successful steps
    verbose: bool,
    progress: Vec<TargetProgress>,
}

impl<T: BuildTool, L: HostLayout> ExtensionBuilder<T, L> {
    /// Create a new extension builder.
    #[must_use]
    pub fn new(tool: T, layout: L, interpreter: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            layout,
            interpreter: interpreter.into(),
            options: BuildOptions::default(),
            verbose: false,
            progress: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub const fn tool(&self) -> &T {
        &self.tool
    }

    #[must_use]
    pub const fn layout(&self) -> &L {
        &self.layout
    }

    /// Per-target states of the current or last run, in build order
    #[must_use]
    pub fn progress(&self) -> &[TargetProgress] {
        &self.progress
    }

    /// Check that the build tool answers a version query
    ///
    /// Returns the first line of the version output.
    pub fn verify_tool_available(&self) -> Result<String, BuildError> {
        verify_tool(&self.tool)
    }

    /// Directory the host expects the compiled module for `target` in
    ///
    /// Resolved from the layout on every call.
    pub fn resolve_output_path(&self, target: &BuildTarget) -> Result<PathBuf, BuildError> {
        output_dir_for(&self.layout, &target.name)
    }

    /// Scratch directory for a target: `<build_temp>/<name>`
    #[must_use]
    pub fn scratch_dir(&self, target: &BuildTarget) -> PathBuf {
        self.layout.build_temp().join(&target.name)
    }

    /// Create the scratch directory and run the configure step
    pub fn configure(
        &self,
        target: &BuildTarget,
        output_path: &Path,
    ) -> Result<ConfiguredTree, BuildError> {
        let scratch_dir = self.scratch_dir(target);
        std::fs::create_dir_all(&scratch_dir).map_err(|source| BuildError::Io {
            step: Step::Configure,
            path: scratch_dir.clone(),
            source,
        })?;

        let request = ConfigureRequest {
            source_dir: &target.source_dir,
            scratch_dir: &scratch_dir,
            library_output_dir: output_path,
            interpreter: &self.interpreter,
            options: &self.options,
        };

        let output = self
            .tool
            .configure(&request)
            .map_err(|source| BuildError::Spawn {
                step: Step::Configure,
                source,
            })?;

        if !output.success {
            return Err(BuildError::Configuration {
                target: target.name.clone(),
                code: output.code,
                output: output.output,
            });
        }

        self.echo(&output);
        Ok(ConfiguredTree {
            scratch_dir,
            output,
        })
    }

    /// Run the build step in a configured scratch tree
    pub fn compile(
        &self,
        target: &BuildTarget,
        tree: &ConfiguredTree,
    ) -> Result<ToolOutput, BuildError> {
        let request = CompileRequest {
            scratch_dir: &tree.scratch_dir,
            options: &self.options,
        };

        let output = self
            .tool
            .compile(&request)
            .map_err(|source| BuildError::Spawn {
                step: Step::Compile,
                source,
            })?;

        if !output.success {
            return Err(BuildError::Build {
                target: target.name.clone(),
                code: output.code,
                output: output.output,
            });
        }

        self.echo(&output);
        Ok(output)
    }

    /// Build a single target
    ///
    /// Steps run strictly in order and the first error aborts the build;
    /// the target's state then ends in `Failed`.
    pub fn build_extension(&mut self, target: &BuildTarget) -> Result<BuildReport, BuildError> {
        self.progress.push(TargetProgress {
            name: target.name.clone(),
            state: TargetState::Unbuilt,
        });
        let index = self.progress.len() - 1;

        let result = self.build_stages(index, target);
        if let Err(e) = &result {
            self.mark(index, TargetState::Failed(e.step().to_string()));
        }
        result
    }

    fn build_stages(
        &mut self,
        index: usize,
        target: &BuildTarget,
    ) -> Result<BuildReport, BuildError> {
        let start_time = Instant::now();

        if self.verbose {
            println!("Building {} from {}", target.name, target.source_dir.display());
        }

        validate_target(target)?;
        let output_dir = self.resolve_output_path(target)?;
        crate::debug!("{}: output directory {}", target.name, output_dir.display());

        self.mark(index, TargetState::Configuring);
        let tree = self.configure(target, &output_dir)?;
        self.mark(index, TargetState::Configured);

        self.mark(index, TargetState::Compiling);
        let compiled = self.compile(target, &tree)?;

        let artifact = find_artifact(&output_dir, target.leaf_name(), self.layout.ext_suffix())
            .ok_or_else(|| BuildError::ArtifactMissing {
                target: target.name.clone(),
                output_dir: output_dir.clone(),
            })?;
        self.mark(index, TargetState::Built);

        let mut output = tree.output.output;
        output.push_str(&compiled.output);

        Ok(BuildReport {
            name: target.name.clone(),
            output_dir,
            scratch_dir: tree.scratch_dir,
            artifact,
            duration: start_time.elapsed(),
            output,
        })
    }

    /// Build all targets in order
    ///
    /// Checks the tool once before anything else. Stops at the first failing
    /// target; targets after it are not attempted.
    pub fn run(&mut self, targets: &[BuildTarget]) -> Result<Vec<BuildReport>, BuildError> {
        self.progress.clear();
        self.verify_tool_available()?;

        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            reports.push(self.build_extension(target)?);
        }

        Ok(reports)
    }

    /// Number of built targets and total build time
    #[must_use]
    pub fn summarize(reports: &[BuildReport]) -> (usize, Duration) {
        (reports.len(), reports.iter().map(|r| r.duration).sum())
    }

    fn mark(&mut self, index: usize, next: TargetState) {
        if let Some(entry) = self.progress.get_mut(index) {
            debug_assert!(
                entry.state.can_transition_to(&next),
                "invalid transition {} -> {next}",
                entry.state
            );
            crate::debug!("{}: {} -> {next}", entry.name, entry.state);
            entry.state = next;
        }
    }

    fn echo(&self, output: &ToolOutput) {
        if self.verbose && !output.output.is_empty() {
            print!("{}", output.output);
        }
    }
}

/// Check that a build tool answers a version query
///
/// Fails with `ToolNotFound` if the tool cannot be started or the query
/// exits unsuccessfully. Returns the first line of the version output.
pub fn verify_tool<T: BuildTool + ?Sized>(tool: &T) -> Result<String, BuildError> {
    let name = tool.name().to_string();

    match tool.version() {
        Ok(output) if output.success => {
            let version = output.first_line().unwrap_or_default().to_string();
            crate::debug!("{name} available: {version}");
            Ok(version)
        }
        Ok(output) => Err(BuildError::ToolNotFound {
            tool: name,
            detail: format!(
                "version query exited unsuccessfully: {}",
                output.output.trim()
            ),
        }),
        Err(e) => Err(BuildError::ToolNotFound {
            tool: name,
            detail: e.to_string(),
        }),
    }
}

/// Absolute directory holding module `name` under `layout`
pub fn output_dir_for<L: HostLayout + ?Sized>(layout: &L, name: &str) -> Result<PathBuf, BuildError> {
    let fullpath = layout.ext_fullpath(name)?;

    let Some(parent) = fullpath.parent() else {
        return Err(BuildError::InvalidTarget {
            name: name.to_string(),
            reason: format!("{} has no parent directory", fullpath.display()),
        });
    };

    std::path::absolute(parent).map_err(|source| BuildError::Io {
        step: Step::Validate,
        path: parent.to_path_buf(),
        source,
    })
}

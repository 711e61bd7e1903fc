//! Build tool interface
//!
//! The builder talks to the external build tool through two steps:
//! configure a scratch tree from a source directory, then build everything
//! configured in it. The tool's own caching and incremental decisions stay
//! behind this interface.

use super::types::{BuildOptions, ToolOutput};
use std::io;
use std::path::Path;

/// Everything the configure step is given
///
/// The interpreter path and working directory are passed explicitly rather
/// than read from the running process.
#[derive(Debug, Clone, Copy)]
pub struct ConfigureRequest<'a> {
    /// Directory holding the build descriptor
    pub source_dir: &'a Path,
    /// Scratch directory; the tool runs with it as working directory
    pub scratch_dir: &'a Path,
    /// Where the shared library must be written
    pub library_output_dir: &'a Path,
    /// Interpreter the extension is built against
    pub interpreter: &'a Path,
    pub options: &'a BuildOptions,
}

/// Everything the build step is given
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Configured scratch directory, used as working directory
    pub scratch_dir: &'a Path,
    pub options: &'a BuildOptions,
}

/// An external build tool
///
/// Implementations block until the process exits and return its captured
/// output. A non-zero exit is reported through `ToolOutput::success`; an
/// `Err` means the process could not be started at all.
pub trait BuildTool {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Query the tool's version
    fn version(&self) -> io::Result<ToolOutput>;

    /// Configure a build tree in `request.scratch_dir`
    fn configure(&self, request: &ConfigureRequest<'_>) -> io::Result<ToolOutput>;

    /// Build everything configured in `request.scratch_dir`
    fn compile(&self, request: &CompileRequest<'_>) -> io::Result<ToolOutput>;
}

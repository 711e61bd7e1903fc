//! Interpreter discovery
//!
//! Finds the interpreter an extension is built against and asks it for the
//! file suffix its import system expects on extension modules.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Query printing the extension module suffix, e.g. `.cpython-312-x86_64-linux-gnu.so`
const EXT_SUFFIX_QUERY: &str = "import sysconfig; print(sysconfig.get_config_var('EXT_SUFFIX') or '')";

/// Executable names tried on `PATH`, in order
const CANDIDATES: [&str; 2] = ["python3", "python"];

/// An interpreter executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    path: PathBuf,
}

impl Interpreter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Find the interpreter to build against
    ///
    /// Priority order:
    /// 1. Explicit path (CLI flag), used as given
    /// 2. `PYTHON` environment variable, if the path exists
    /// 3. Configured path (config file), used as given
    /// 4. `python3`, then `python` in `PATH`
    /// 5. Error if not found
    pub fn find(explicit: Option<&Path>, configured: Option<&Path>) -> Result<Self> {
        let from_env = crate::env_vars::python()
            .map(PathBuf::from)
            .filter(|path| path.exists());

        choose(explicit, from_env, configured)
            .or_else(|| CANDIDATES.iter().find_map(|name| find_on_path(name)))
            .map(Self::new)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Interpreter not found in PATH or PYTHON environment variable. \
                     Pass --interpreter to choose one."
                )
            })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ask the interpreter for its extension module suffix
    ///
    /// Returns None if the interpreter cannot be run or reports nothing.
    #[must_use]
    pub fn query_ext_suffix(&self) -> Option<String> {
        let output = Command::new(&self.path)
            .arg("-c")
            .arg(EXT_SUFFIX_QUERY)
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let suffix = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!suffix.is_empty()).then_some(suffix)
    }

    /// Extension module suffix, falling back to the platform default
    #[must_use]
    pub fn ext_suffix(&self) -> String {
        self.query_ext_suffix().unwrap_or_else(|| {
            crate::debug!(
                "could not query EXT_SUFFIX from {}, using {}",
                self.path.display(),
                default_ext_suffix()
            );
            default_ext_suffix().to_string()
        })
    }
}

/// Extension module suffix used when the interpreter cannot be asked
#[must_use]
pub const fn default_ext_suffix() -> &'static str {
    if cfg!(windows) { ".pyd" } else { ".so" }
}

/// Flag, then environment, then config
fn choose(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    configured: Option<&Path>,
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or(from_env)
        .or_else(|| configured.map(Path::to_path_buf))
}

/// Look up an executable in `PATH`
fn find_on_path(name: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(name).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let path_str = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(path_str.trim());
    path.exists().then_some(path)
}

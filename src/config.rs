//! Configuration file management
//!
//! Handles reading cmext's TOML configuration files from project and global
//! locations. A config file can list the extensions to build and default
//! values for every `build` flag.
//!
//! ```toml
//! build_type = "Release"
//! cmake_args = ["-DHAND_ISO_TESTS=OFF"]
//!
//! [[extension]]
//! name = "hand_isomorphism_py"
//! sourcedir = "."
//! ```

use crate::extensions::{BuildError, BuildTarget};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name, looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = ".cmext.toml";

/// Application configuration loaded from TOML files
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Library output root (setuptools `build_lib`)
    #[serde(default)]
    pub build_lib: Option<String>,

    /// Scratch root (setuptools `build_temp`)
    #[serde(default)]
    pub build_temp: Option<String>,

    /// Place modules next to package sources
    #[serde(default)]
    pub inplace: Option<bool>,

    /// Path to the `CMake` executable
    #[serde(default)]
    pub cmake: Option<String>,

    /// Interpreter the extensions are built against
    #[serde(default)]
    pub interpreter: Option<String>,

    /// Extension module suffix; queried from the interpreter when unset
    #[serde(default)]
    pub ext_suffix: Option<String>,

    #[serde(default)]
    pub build_type: Option<String>,

    #[serde(default)]
    pub generator: Option<String>,

    #[serde(default)]
    pub jobs: Option<usize>,

    /// Extra arguments for the configure step
    #[serde(default)]
    pub cmake_args: Vec<String>,

    /// Extensions to build, in order
    #[serde(default, rename = "extension")]
    pub extensions: Vec<ExtensionConfig>,
}

/// One `[[extension]]` entry
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Dotted module name
    pub name: String,
    /// Source directory, relative to the project root; empty means the root
    #[serde(default)]
    pub sourcedir: String,
}

impl ExtensionConfig {
    /// Build target for this entry, resolving `sourcedir` against `project_root`
    pub fn to_target(&self, project_root: &Path) -> Result<BuildTarget, BuildError> {
        let source_dir = if self.sourcedir.is_empty() {
            project_root.to_path_buf()
        } else {
            project_root.join(&self.sourcedir)
        };
        BuildTarget::new(self.name.clone(), source_dir)
    }
}

impl Config {
    /// Load configuration from TOML files.
    /// Priority: ./.cmext.toml -> ~/.config/cmext/config.toml
    ///
    /// # Errors
    ///
    /// Returns an error if config file parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_with_options(None, false)
    }

    /// Load configuration with custom options.
    ///
    /// # Arguments
    /// * `custom_path` - Optional custom path to config file (overrides defaults)
    /// * `skip_rc` - If true, skip loading config files (return default config)
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or if `custom_path` does not exist.
    pub fn load_with_options(custom_path: Option<&Path>, skip_rc: bool) -> Result<Self> {
        if skip_rc {
            return Ok(Self::default());
        }

        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load_from(local);
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let config_path = config_dir.join("config.toml");
            if config_path.is_file() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        crate::debug!("loading config from {}", path.display());

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Build targets for all configured extensions
    pub fn targets(&self, project_root: &Path) -> Result<Vec<BuildTarget>, BuildError> {
        self.extensions
            .iter()
            .map(|ext| ext.to_target(project_root))
            .collect()
    }

    fn user_config_dir() -> Option<PathBuf> {
        // Check XDG_CONFIG_HOME first
        if let Some(xdg_config) = crate::env_vars::xdg_config_home() {
            return Some(PathBuf::from(xdg_config).join("cmext"));
        }

        // Fall back to ~/.config/cmext
        dirs::home_dir().map(|home| home.join(".config").join("cmext"))
    }
}

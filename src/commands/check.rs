//! Check command
//!
//! Verify the build tool is installed before any build is attempted

use super::locate_cmake;
use anyhow::Result;
use cmext::{BuildTool, Config, env_vars, extensions::verify_tool};
use std::path::Path;

/// Verify `CMake` answers a version query
pub(crate) fn run(cmake: Option<&Path>, config: &Config) -> Result<()> {
    let tool = locate_cmake(cmake, config, env_vars::verbose());

    let version = verify_tool(&tool)?;
    println!("{} found at {}: {version}", tool.name(), tool.path().display());

    Ok(())
}

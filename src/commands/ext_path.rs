//! Ext-path command
//!
//! Print where a module is placed by the build, without building it

use super::{project_root, resolve_interpreter, resolve_layout};
use crate::LayoutArgs;
use anyhow::Result;
use cmext::{Config, HostLayout, extensions::output_dir_for};

/// Print the output directory (or full module path) for a dotted module name
pub(crate) fn run(name: &str, file: bool, layout_args: &LayoutArgs, config: &Config) -> Result<()> {
    let project_root = project_root()?;

    // The interpreter only matters for the suffix; fall back to the default
    let interpreter = if layout_args.ext_suffix.is_some() || config.ext_suffix.is_some() {
        None
    } else {
        resolve_interpreter(layout_args, config).ok()
    };
    let layout = resolve_layout(layout_args, config, &project_root, interpreter.as_ref());

    let path = if file {
        layout.ext_fullpath(name)?
    } else {
        output_dir_for(&layout, name)?
    };
    println!("{}", path.display());

    Ok(())
}

//! Clean command
//!
//! Remove scratch build trees, and optionally the library output root

use super::{project_root, resolve_layout};
use crate::LayoutArgs;
use anyhow::{Context, Result, bail};
use cmext::{Config, HostLayout, SetuptoolsLayout};
use std::fs;
use std::path::{Path, PathBuf};

/// Remove `build_temp` (and `build_lib` with `--all`)
pub(crate) fn run(layout_args: &LayoutArgs, config: &Config, all: bool, dry_run: bool) -> Result<()> {
    let project_root = project_root()?;
    let layout = resolve_layout(layout_args, config, &project_root, None);

    if dry_run {
        println!("Dry run mode - nothing will be removed\n");
    }

    let removed = clean_layout(&layout, all, dry_run)?;

    if removed.is_empty() {
        println!("Nothing to clean");
    } else if dry_run {
        println!("Would remove {} director(ies)", removed.len());
    } else {
        println!("Done");
    }

    Ok(())
}

/// Directories `clean` is allowed to touch
///
/// With an in-place layout modules live next to the sources, so only the
/// scratch root is ever removed.
fn clean_targets(layout: &SetuptoolsLayout, all: bool) -> Vec<PathBuf> {
    let mut dirs = vec![layout.build_temp().to_path_buf()];
    if all && !layout.is_inplace() {
        dirs.push(layout.build_lib().to_path_buf());
    }
    dirs
}

/// Remove the layout's build directories, returning the ones that existed
fn clean_layout(layout: &SetuptoolsLayout, all: bool, dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for dir in clean_targets(layout, all) {
        if !dir.exists() {
            cmext::debug!("{} does not exist, skipping", dir.display());
            continue;
        }

        refuse_project_root(&dir, layout.project_root())?;

        if dry_run {
            println!("Would remove: {}", dir.display());
        } else {
            println!("Removing: {}", dir.display());
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;
        }
        removed.push(dir);
    }

    Ok(removed)
}

fn refuse_project_root(dir: &Path, project_root: &Path) -> Result<()> {
    if project_root.starts_with(dir) {
        bail!(
            "Refusing to remove {}: it contains the project root",
            dir.display()
        );
    }
    Ok(())
}

//! Command implementations and the settings they share
//!
//! Each setting is taken from the command line first, then the environment,
//! then the config file, then the built-in default.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod clean;
pub(crate) mod completion;
pub(crate) mod ext_path;

use crate::LayoutArgs;
use anyhow::{Context, Result};
use cmext::{CMakeTool, Config, Interpreter, SetuptoolsLayout, default_ext_suffix};
use std::path::{Path, PathBuf};

/// Load the config file selected by `--config` / `--no-config`
pub(crate) fn load_config(custom_path: Option<&Path>, no_config: bool) -> Result<Config> {
    Config::load_with_options(custom_path, no_config)
}

/// Directory builds are rooted at
pub(crate) fn project_root() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine current directory")
}

/// Find the interpreter from `--interpreter`, `PYTHON`, config or `PATH`
pub(crate) fn resolve_interpreter(args: &LayoutArgs, config: &Config) -> Result<Interpreter> {
    Interpreter::find(
        args.interpreter.as_deref(),
        config.interpreter.as_deref().map(Path::new),
    )
}

/// Locate `CMake` from `--cmake`, `CMAKE`, config or `PATH`
pub(crate) fn locate_cmake(flag: Option<&Path>, config: &Config, verbose: bool) -> CMakeTool {
    CMakeTool::locate(flag, config.cmake.as_deref().map(Path::new), verbose)
}

/// Build the host layout for the current project
///
/// The extension suffix comes from `--ext-suffix`, the config file, the
/// interpreter (when one is given), or the platform default.
pub(crate) fn resolve_layout(
    args: &LayoutArgs,
    config: &Config,
    project_root: &Path,
    interpreter: Option<&Interpreter>,
) -> SetuptoolsLayout {
    let ext_suffix = args
        .ext_suffix
        .clone()
        .or_else(|| config.ext_suffix.clone())
        .or_else(|| interpreter.map(Interpreter::ext_suffix))
        .unwrap_or_else(|| default_ext_suffix().to_string());

    let mut layout = SetuptoolsLayout::new(project_root, ext_suffix)
        .inplace(args.inplace || config.inplace.unwrap_or(false));

    if let Some(build_lib) = args
        .build_lib
        .clone()
        .or_else(|| config.build_lib.as_ref().map(PathBuf::from))
    {
        layout = layout.with_build_lib(build_lib);
    }

    if let Some(build_temp) = args
        .build_temp
        .clone()
        .or_else(|| config.build_temp.as_ref().map(PathBuf::from))
    {
        layout = layout.with_build_temp(build_temp);
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmext::HostLayout;

    #[test]
    fn flags_override_config() {
        let args = LayoutArgs {
            build_lib: Some(PathBuf::from("cli/lib")),
            ext_suffix: Some(".cli.so".to_string()),
            ..LayoutArgs::default()
        };
        let config = Config {
            build_lib: Some("config/lib".to_string()),
            build_temp: Some("config/temp".to_string()),
            ext_suffix: Some(".config.so".to_string()),
            ..Config::default()
        };

        let layout = resolve_layout(&args, &config, Path::new("/repo"), None);

        assert_eq!(layout.build_lib(), Path::new("/repo/cli/lib"));
        assert_eq!(layout.build_temp(), Path::new("/repo/config/temp"));
        assert_eq!(layout.ext_suffix(), ".cli.so");
    }

    #[test]
    fn suffix_defaults_without_interpreter() {
        let layout = resolve_layout(
            &LayoutArgs::default(),
            &Config::default(),
            Path::new("/repo"),
            None,
        );
        assert_eq!(layout.ext_suffix(), default_ext_suffix());
        assert!(!layout.is_inplace());
    }

    #[test]
    fn inplace_from_config() {
        let config = Config {
            inplace: Some(true),
            ..Config::default()
        };
        let layout = resolve_layout(&LayoutArgs::default(), &config, Path::new("/repo"), None);
        assert!(layout.is_inplace());
    }

    #[test]
    fn interpreter_from_config() {
        let config = Config {
            interpreter: Some("/opt/python/bin/python3".to_string()),
            ..Config::default()
        };
        // PYTHON, when it names an existing file, outranks the config file
        let expected = cmext::env_vars::python()
            .map(PathBuf::from)
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from("/opt/python/bin/python3"));

        let interpreter = resolve_interpreter(&LayoutArgs::default(), &config).unwrap();
        assert_eq!(interpreter.path(), expected.as_path());
    }

    #[test]
    fn interpreter_flag_beats_config() {
        let args = LayoutArgs {
            interpreter: Some(PathBuf::from("/cli/python3")),
            ..LayoutArgs::default()
        };
        let config = Config {
            interpreter: Some("/config/python3".to_string()),
            ..Config::default()
        };

        let interpreter = resolve_interpreter(&args, &config).unwrap();
        assert_eq!(interpreter.path(), Path::new("/cli/python3"));
    }

    #[test]
    fn cmake_flag_beats_config() {
        let config = Config {
            cmake: Some("/config/cmake".to_string()),
            ..Config::default()
        };

        let tool = locate_cmake(Some(Path::new("/cli/cmake")), &config, false);
        assert_eq!(tool.path(), Path::new("/cli/cmake"));
    }
}

//! Build command
//!
//! Build every requested extension with `CMake`, in order, stopping at the
//! first failure

use super::{locate_cmake, project_root, resolve_interpreter, resolve_layout};
use crate::LayoutArgs;
use anyhow::{Result, bail};
use cmext::{
    BuildError, BuildOptions, BuildReport, BuildTarget, CMakeTool, CompilerEnv, Config,
    ExtensionBuilder, HostLayout, SetuptoolsLayout, env_vars,
};
use std::path::{Path, PathBuf};

/// Options for the build command
#[derive(Debug, Default)]
pub(crate) struct BuildArgs {
    /// `NAME` or `NAME=SOURCEDIR` entries from `--ext`
    pub(crate) extensions: Vec<String>,
    pub(crate) layout: LayoutArgs,
    pub(crate) cmake: Option<PathBuf>,
    pub(crate) build_type: Option<String>,
    pub(crate) generator: Option<String>,
    pub(crate) jobs: Option<usize>,
    pub(crate) cmake_args: Vec<String>,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

/// Build native extensions
pub(crate) fn run(args: &BuildArgs, config: &Config) -> Result<()> {
    let project_root = project_root()?;

    let targets = if args.extensions.is_empty() {
        config.targets(&project_root)?
    } else {
        args.extensions
            .iter()
            .map(|spec| parse_extension(spec, &project_root))
            .collect::<Result<Vec<_>, _>>()?
    };

    if targets.is_empty() {
        bail!(
            "No extensions to build. Pass --ext NAME[=SOURCEDIR] or add [[extension]] entries to .cmext.toml"
        );
    }

    let verbose = args.verbose || env_vars::verbose();
    let interpreter = resolve_interpreter(&args.layout, config)?;
    let layout = resolve_layout(&args.layout, config, &project_root, Some(&interpreter));

    let tool = locate_cmake(args.cmake.as_deref(), config, verbose);

    cmext::debug!(
        "interpreter {}, build_lib {}, build_temp {}",
        interpreter.path().display(),
        layout.build_lib().display(),
        layout.build_temp().display()
    );

    let options = build_options(args, config);
    let mut builder = ExtensionBuilder::new(tool, layout, interpreter.path())
        .with_options(options)
        .verbose(verbose);

    match builder.run(&targets) {
        Ok(reports) => {
            if !args.quiet {
                print_reports(&reports);
            }
            Ok(())
        }
        Err(e) => {
            report_failure(&e, &builder, &targets);
            let step = e.step();
            Err(anyhow::Error::new(e).context(format!("{step} step failed")))
        }
    }
}

/// Parse `NAME` or `NAME=SOURCEDIR`; a missing source directory means the project root
fn parse_extension(spec: &str, project_root: &Path) -> Result<BuildTarget, BuildError> {
    match spec.split_once('=') {
        Some((name, source)) if !source.is_empty() => {
            BuildTarget::new(name.trim(), project_root.join(source))
        }
        Some((name, _)) => BuildTarget::new(name.trim(), project_root),
        None => BuildTarget::new(spec.trim(), project_root),
    }
}

/// Merge flag, environment and config values for the optional tool settings
fn build_options(args: &BuildArgs, config: &Config) -> BuildOptions {
    let mut cmake_args = config.cmake_args.clone();
    cmake_args.extend(args.cmake_args.iter().cloned());

    BuildOptions {
        build_type: args
            .build_type
            .clone()
            .or_else(env_vars::build_type)
            .or_else(|| config.build_type.clone()),
        generator: args.generator.clone().or_else(|| config.generator.clone()),
        cmake_args,
        jobs: args.jobs.or_else(env_vars::jobs).or(config.jobs),
        compiler: CompilerEnv::from_env(),
    }
}

fn print_reports(reports: &[BuildReport]) {
    for report in reports {
        println!(
            "Built {} -> {} ({:.2}s)",
            report.name,
            report.artifact.display(),
            report.duration.as_secs_f64()
        );
    }

    let (count, total) = ExtensionBuilder::<CMakeTool, SetuptoolsLayout>::summarize(reports);
    let noun = if count == 1 { "extension" } else { "extensions" };
    println!("Built {count} {noun} in {:.2}s", total.as_secs_f64());
}

/// Print the tool's own output and the targets that were never attempted
fn report_failure(
    error: &BuildError,
    builder: &ExtensionBuilder<CMakeTool, SetuptoolsLayout>,
    targets: &[BuildTarget],
) {
    if let Some(output) = error.tool_output()
        && !output.is_empty()
    {
        eprintln!("{output}");
    }

    let attempted = builder.progress().len();
    let skipped: Vec<&str> = targets
        .iter()
        .skip(attempted)
        .map(|t| t.name.as_str())
        .collect();

    if !skipped.is_empty() && attempted > 0 {
        eprintln!("Not attempted: {}", skipped.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_only() {
        let target = parse_extension("hand_isomorphism_py", Path::new("/repo")).unwrap();
        assert_eq!(target.name, "hand_isomorphism_py");
        assert_eq!(target.source_dir, PathBuf::from("/repo"));
    }

    #[test]
    fn parses_name_with_sourcedir() {
        let target = parse_extension("cards.fast=native/fast", Path::new("/repo")).unwrap();
        assert_eq!(target.name, "cards.fast");
        assert_eq!(target.source_dir, PathBuf::from("/repo/native/fast"));

        let target = parse_extension("fast=", Path::new("/repo")).unwrap();
        assert_eq!(target.source_dir, PathBuf::from("/repo"));
    }

    #[test]
    fn cli_values_win_and_args_append() {
        let args = BuildArgs {
            build_type: Some("Debug".to_string()),
            jobs: Some(2),
            cmake_args: vec!["-DCLI=1".to_string()],
            ..BuildArgs::default()
        };
        let config = Config {
            build_type: Some("Release".to_string()),
            generator: Some("Ninja".to_string()),
            jobs: Some(8),
            cmake_args: vec!["-DCONFIG=1".to_string()],
            ..Config::default()
        };

        let options = build_options(&args, &config);

        assert_eq!(options.build_type.as_deref(), Some("Debug"));
        assert_eq!(options.generator.as_deref(), Some("Ninja"));
        assert_eq!(options.jobs, Some(2));
        assert_eq!(options.cmake_args, vec!["-DCONFIG=1", "-DCLI=1"]);
    }
}

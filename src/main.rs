//! cmext command-line interface
//!
//! Builds `CMake`-based native extension modules into the host packaging
//! layout

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    // Show backtrace if enabled
    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "cmext")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build CMake native extensions for the host packaging layout", long_about = None)]
pub(crate) struct Cli {
    /// Load configuration from this file instead of .cmext.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore configuration files
    #[arg(long, global = true, conflicts_with = "config")]
    no_config: bool,

    /// Print debug logging to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Show a backtrace on errors (requires `RUST_BACKTRACE=1`)
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where modules and scratch trees go
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct LayoutArgs {
    /// Library output root (default: build/lib.<os>-<arch>)
    #[arg(long, value_name = "DIR")]
    pub(crate) build_lib: Option<PathBuf>,

    /// Scratch root for build trees (default: build/temp.<os>-<arch>)
    #[arg(long, value_name = "DIR")]
    pub(crate) build_temp: Option<PathBuf>,

    /// Place modules next to their package sources
    #[arg(long)]
    pub(crate) inplace: bool,

    /// Interpreter to build against (default: $PYTHON, python3, python)
    #[arg(long, value_name = "PATH")]
    pub(crate) interpreter: Option<PathBuf>,

    /// Extension module suffix (default: queried from the interpreter)
    #[arg(long, value_name = "SUFFIX", allow_hyphen_values = true)]
    pub(crate) ext_suffix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build native extensions
    Build {
        /// Extension to build as NAME or NAME=SOURCEDIR (replaces configured extensions)
        #[arg(long = "ext", value_name = "NAME[=SOURCEDIR]")]
        extensions: Vec<String>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Path to the CMake executable (default: $CMAKE, cmake)
        #[arg(long, value_name = "PATH")]
        cmake: Option<PathBuf>,

        /// CMake build type, e.g. Release or Debug
        #[arg(long, value_name = "TYPE")]
        build_type: Option<String>,

        /// CMake generator
        #[arg(long, short = 'G', value_name = "GENERATOR")]
        generator: Option<String>,

        /// Number of parallel build jobs
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// Extra argument for the configure step (repeatable)
        #[arg(long = "cmake-arg", value_name = "ARG", allow_hyphen_values = true)]
        cmake_args: Vec<String>,

        /// Show tool command lines and output
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long, short, conflicts_with = "verbose")]
        quiet: bool,
    },

    /// Check that CMake is available
    Check {
        /// Path to the CMake executable (default: $CMAKE, cmake)
        #[arg(long, value_name = "PATH")]
        cmake: Option<PathBuf>,
    },

    /// Print the directory a module is built into
    ExtPath {
        /// Dotted module name
        name: String,

        /// Print the full module file path instead of its directory
        #[arg(long)]
        file: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Remove scratch build trees
    Clean {
        /// Also remove the library output root
        #[arg(long)]
        all: bool,

        /// Show what would be removed without actually removing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize debug mode
    cmext::init_debug(cli.debug);
    let backtrace = cli.backtrace;

    let result = match cli.command {
        Commands::Build {
            extensions,
            layout,
            cmake,
            build_type,
            generator,
            jobs,
            cmake_args,
            verbose,
            quiet,
        } => commands::load_config(cli.config.as_deref(), cli.no_config).and_then(|config| {
            let args = commands::build::BuildArgs {
                extensions,
                layout,
                cmake,
                build_type,
                generator,
                jobs,
                cmake_args,
                verbose,
                quiet,
            };
            commands::build::run(&args, &config)
        }),
        Commands::Check { cmake } => commands::load_config(cli.config.as_deref(), cli.no_config)
            .and_then(|config| commands::check::run(cmake.as_deref(), &config)),
        Commands::ExtPath { name, file, layout } => {
            commands::load_config(cli.config.as_deref(), cli.no_config)
                .and_then(|config| commands::ext_path::run(&name, file, &layout, &config))
        }
        Commands::Clean {
            all,
            dry_run,
            layout,
        } => commands::load_config(cli.config.as_deref(), cli.no_config)
            .and_then(|config| commands::clean::run(&layout, &config, all, dry_run)),
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        // Display error with formatting
        display_error(&e, backtrace);
        process::exit(1);
    }
}

mod commands;

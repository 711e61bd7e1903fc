//! `CMake` build tool
//!
//! Drives `CMake` the way setuptools-based `CMake` extensions do:
//! ```bash
//! mkdir -p build/temp.linux-x86_64/<name>
//! cd build/temp.linux-x86_64/<name>
//! cmake <sourcedir> -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=<extdir> -DPYTHON_EXECUTABLE=<python>
//! cmake --build .
//! ```

use super::tool::{BuildTool, CompileRequest, ConfigureRequest};
use super::types::ToolOutput;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// `CMake` executable wrapper
#[derive(Debug, Clone)]
pub struct CMakeTool {
    /// Path to `CMake` executable
    cmake_path: PathBuf,
    /// Print each command line before running it
    verbose: bool,
}

impl CMakeTool {
    #[must_use]
    pub fn new(cmake_path: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            cmake_path: cmake_path.into(),
            verbose,
        }
    }

    /// Pick the `CMake` executable to use
    ///
    /// Priority order:
    /// 1. Explicit path (CLI flag)
    /// 2. `CMAKE` environment variable
    /// 3. Configured path (config file)
    /// 4. `cmake`, resolved through `PATH` when it is spawned
    ///
    /// Nothing is checked here; a missing tool shows up in the version query.
    #[must_use]
    pub fn locate(explicit: Option<&Path>, configured: Option<&Path>, verbose: bool) -> Self {
        let from_env = crate::env_vars::cmake().map(PathBuf::from);
        Self::new(choose_path(explicit, from_env, configured), verbose)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.cmake_path
    }

    /// Arguments of the configure invocation
    ///
    /// Source directory first, then the library output directory and the
    /// interpreter path, then optional settings.
    #[must_use]
    pub fn configure_args(request: &ConfigureRequest<'_>) -> Vec<OsString> {
        let mut args = vec![
            request.source_dir.as_os_str().to_os_string(),
            define("CMAKE_LIBRARY_OUTPUT_DIRECTORY", request.library_output_dir),
            define("PYTHON_EXECUTABLE", request.interpreter),
        ];

        let options = request.options;
        if let Some(generator) = &options.generator {
            args.push("-G".into());
            args.push(generator.into());
        }
        if let Some(build_type) = &options.build_type {
            args.push(format!("-DCMAKE_BUILD_TYPE={build_type}").into());
        }

        // CMake respects both CMAKE_* and standard compiler variables
        let compiler = &options.compiler;
        if let Some(cc) = &compiler.cc {
            args.push(format!("-DCMAKE_C_COMPILER={cc}").into());
        }
        if let Some(cxx) = &compiler.cxx {
            args.push(format!("-DCMAKE_CXX_COMPILER={cxx}").into());
        }
        if let Some(cflags) = &compiler.cflags {
            args.push(format!("-DCMAKE_C_FLAGS={cflags}").into());
        }
        if let Some(cxxflags) = &compiler.cxxflags {
            args.push(format!("-DCMAKE_CXX_FLAGS={cxxflags}").into());
        }
        if let Some(ldflags) = &compiler.ldflags {
            args.push(format!("-DCMAKE_SHARED_LINKER_FLAGS={ldflags}").into());
            args.push(format!("-DCMAKE_MODULE_LINKER_FLAGS={ldflags}").into());
        }

        args.extend(options.cmake_args.iter().map(OsString::from));
        args
    }

    /// Arguments of the build invocation
    #[must_use]
    pub fn compile_args(request: &CompileRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--build".into(), ".".into()];

        if let Some(build_type) = &request.options.build_type {
            args.push("--config".into());
            args.push(build_type.into());
        }
        if let Some(jobs) = request.options.jobs {
            args.push("--parallel".into());
            args.push(jobs.to_string().into());
        }

        args
    }

    fn execute(
        &self,
        args: &[OsString],
        cwd: Option<&Path>,
        env: &[(&str, &str)],
    ) -> io::Result<ToolOutput> {
        let mut cmd = Command::new(&self.cmake_path);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in env {
            cmd.env(key, value);
        }

        let rendered = render_command(&self.cmake_path, args);
        if self.verbose {
            println!("  Running: {rendered}");
        }
        crate::debug!("spawning {rendered} in {cwd:?}");

        let output = cmd.output()?;
        Ok(ToolOutput::from_process(&output))
    }
}

impl BuildTool for CMakeTool {
    fn name(&self) -> &str {
        "CMake"
    }

    fn version(&self) -> io::Result<ToolOutput> {
        self.execute(&["--version".into()], None, &[])
    }

    fn configure(&self, request: &ConfigureRequest<'_>) -> io::Result<ToolOutput> {
        let compiler = &request.options.compiler;
        let env: Vec<(&str, &str)> = [
            ("CC", compiler.cc.as_deref()),
            ("CXX", compiler.cxx.as_deref()),
            ("CFLAGS", compiler.cflags.as_deref()),
            ("CXXFLAGS", compiler.cxxflags.as_deref()),
            ("LDFLAGS", compiler.ldflags.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

        self.execute(&Self::configure_args(request), Some(request.scratch_dir), &env)
    }

    fn compile(&self, request: &CompileRequest<'_>) -> io::Result<ToolOutput> {
        self.execute(&Self::compile_args(request), Some(request.scratch_dir), &[])
    }
}

fn choose_path(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    configured: Option<&Path>,
) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or(from_env)
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("cmake"))
}

fn define(key: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(format!("-D{key}="));
    arg.push(path.as_os_str());
    arg
}

fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}

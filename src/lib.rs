//! cmext internal library code
//!
//! Builds native extension modules with `CMake` and places them where the
//! host packaging layout expects them.

pub mod config;
pub mod debug;
pub mod env_vars;
pub mod extensions;
pub mod interpreter;

#[cfg(test)]
pub mod test_utils;

// Re-export common types for convenience
pub use config::{Config, ExtensionConfig};
pub use debug::{debug_log, init_debug, is_debug_enabled};
pub use extensions::{
    BuildError, BuildOptions, BuildReport, BuildTarget, BuildTool, CMakeTool, CompilerEnv,
    ExtensionBuilder, HostLayout, SetuptoolsLayout, Step, TargetState, ToolOutput,
};
pub use interpreter::{Interpreter, default_ext_suffix};

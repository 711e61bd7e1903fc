//! Native extension building
//!
//! Compiles native extension modules with an external build tool and puts
//! the shared library where the host packaging system imports it from.
//!
//! Build flow per target:
//! - validate the source tree (`CMakeLists.txt`)
//! - resolve the output directory from the host layout
//! - configure a scratch tree (`cmake <src> -D...`)
//! - build it (`cmake --build .`)
//! - check the shared library exists

pub mod builder;
pub mod cmake_extension;
pub mod detector;
pub mod error;
pub mod layout;
pub mod tool;
pub mod types;

pub use builder::{ExtensionBuilder, output_dir_for, verify_tool};
pub use cmake_extension::CMakeTool;
pub use detector::{find_artifact, validate_target};
pub use error::{BuildError, Step};
pub use layout::{HostLayout, SetuptoolsLayout};
pub use tool::{BuildTool, CompileRequest, ConfigureRequest};
pub use types::{
    BuildOptions, BuildReport, BuildTarget, CompilerEnv, ConfiguredTree, TargetProgress,
    TargetState, ToolOutput,
};

//! Host packaging layout
//!
//! The host decides where a compiled module has to live to be importable.
//! The builder only asks for that path; `SetuptoolsLayout` follows the rules
//! setuptools' `build_ext` uses:
//!
//! ```text
//! build/lib.<os>-<arch>/pkg/sub/fast<EXT_SUFFIX>   (default)
//! <project>/pkg/sub/fast<EXT_SUFFIX>               (--inplace)
//! build/temp.<os>-<arch>/                          (scratch root)
//! ```

use super::detector::is_valid_module_name;
use super::error::BuildError;
use std::path::{Path, PathBuf};

/// Naming and layout rules of the packaging host
pub trait HostLayout {
    /// Full path of the importable module file for a dotted module name
    fn ext_fullpath(&self, name: &str) -> Result<PathBuf, BuildError>;

    /// Root under which per-target scratch directories are created
    fn build_temp(&self) -> &Path;

    /// File name suffix of extension modules (`.cpython-312-x86_64-linux-gnu.so`)
    fn ext_suffix(&self) -> &str;
}

/// Platform tag used in default build directory names (`linux-x86_64`)
#[must_use]
pub fn platform_tag() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// setuptools-compatible layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetuptoolsLayout {
    project_root: PathBuf,
    build_lib: PathBuf,
    build_temp: PathBuf,
    ext_suffix: String,
    inplace: bool,
}

impl SetuptoolsLayout {
    /// Create a layout with default build directories under `project_root/build`
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>, ext_suffix: impl Into<String>) -> Self {
        let project_root = project_root.into();
        let tag = platform_tag();
        let build_lib = project_root.join("build").join(format!("lib.{tag}"));
        let build_temp = project_root.join("build").join(format!("temp.{tag}"));

        Self {
            project_root,
            build_lib,
            build_temp,
            ext_suffix: ext_suffix.into(),
            inplace: false,
        }
    }

    /// Override the library output root; relative paths are taken from the project root
    #[must_use]
    pub fn with_build_lib(mut self, build_lib: impl AsRef<Path>) -> Self {
        self.build_lib = self.project_root.join(build_lib);
        self
    }

    /// Override the scratch root; relative paths are taken from the project root
    #[must_use]
    pub fn with_build_temp(mut self, build_temp: impl AsRef<Path>) -> Self {
        self.build_temp = self.project_root.join(build_temp);
        self
    }

    /// Place modules next to their package sources instead of under `build_lib`
    #[must_use]
    pub const fn inplace(mut self, inplace: bool) -> Self {
        self.inplace = inplace;
        self
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    #[must_use]
    pub fn build_lib(&self) -> &Path {
        &self.build_lib
    }

    #[must_use]
    pub const fn is_inplace(&self) -> bool {
        self.inplace
    }
}

impl HostLayout for SetuptoolsLayout {
    fn ext_fullpath(&self, name: &str) -> Result<PathBuf, BuildError> {
        if !is_valid_module_name(name) {
            return Err(BuildError::InvalidTarget {
                name: name.to_string(),
                reason: "module name must be dot-separated identifiers".to_string(),
            });
        }

        let mut path = if self.inplace {
            self.project_root.clone()
        } else {
            self.build_lib.clone()
        };

        let mut parts: Vec<&str> = name.split('.').collect();
        let leaf = parts.pop().unwrap_or(name);
        path.extend(parts);
        path.push(format!("{leaf}{}", self.ext_suffix));

        Ok(path)
    }

    fn build_temp(&self) -> &Path {
        &self.build_temp
    }

    fn ext_suffix(&self) -> &str {
        &self.ext_suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = ".cpython-312-x86_64-linux-gnu.so";

    #[test]
    fn default_directories() {
        let layout = SetuptoolsLayout::new("/repo", SUFFIX);
        let tag = platform_tag();

        assert_eq!(layout.build_lib(), Path::new("/repo/build").join(format!("lib.{tag}")));
        assert_eq!(layout.build_temp(), Path::new("/repo/build").join(format!("temp.{tag}")));
        assert!(!layout.is_inplace());
    }

    #[test]
    fn top_level_module_lands_in_build_lib() {
        let layout = SetuptoolsLayout::new("/repo", SUFFIX).with_build_lib("out/lib");

        let path = layout.ext_fullpath("hand_isomorphism_py").unwrap();
        assert_eq!(
            path,
            PathBuf::from(format!("/repo/out/lib/hand_isomorphism_py{SUFFIX}"))
        );
    }

    #[test]
    fn dotted_module_maps_to_package_dirs() {
        let layout = SetuptoolsLayout::new("/repo", ".so").with_build_lib("/abs/lib");

        let path = layout.ext_fullpath("cards.native.fast").unwrap();
        assert_eq!(path, PathBuf::from("/abs/lib/cards/native/fast.so"));
    }

    #[test]
    fn inplace_uses_project_root() {
        let layout = SetuptoolsLayout::new("/repo", ".so").inplace(true);

        let path = layout.ext_fullpath("cards.fast").unwrap();
        assert_eq!(path, PathBuf::from("/repo/cards/fast.so"));
    }

    #[test]
    fn rejects_invalid_names() {
        let layout = SetuptoolsLayout::new("/repo", ".so");
        assert!(layout.ext_fullpath("cards..fast").is_err());
        assert!(layout.ext_fullpath("").is_err());
    }

    #[test]
    fn fullpath_is_stable() {
        let layout = SetuptoolsLayout::new("/repo", SUFFIX);
        assert_eq!(
            layout.ext_fullpath("hand_isomorphism_py").unwrap(),
            layout.ext_fullpath("hand_isomorphism_py").unwrap()
        );
    }
}

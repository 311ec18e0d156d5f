//! Resolved dependency paths from the external package resolver.
//!
//! Dependency download and version resolution happen outside the pipeline.
//! The resolver materializes its answer as a JSON document mapping each
//! package name to its resolved version and include/lib/bin directories.
//! This module loads that document and answers path lookups; it never
//! constructs a resolved path itself.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "packages": {
//!     "cmake": {
//!       "version": "3.27.1",
//!       "bin_dirs": ["/opt/pkgs/cmake/3.27.1/bin"]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use vkprep_platform::exe_name;

use crate::config::{CMAKE_PACKAGE, SHADERC_PACKAGE, VALIDATION_LAYERS_PACKAGE};

/// Default file name of the resolver's output document, relative to the
/// build directory.
pub const RESOLUTION_FILE: &str = "resolved.json";

/// Errors raised when consuming the resolver's output.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The resolution document does not exist. Dependency resolution has not
  /// run for this build directory.
  #[error("resolution document not found: {0}")]
  NotFound(PathBuf),

  /// The resolution document could not be read.
  #[error("failed to read resolution document {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The resolution document exists but is not well-formed.
  #[error("malformed resolution document {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A package was looked up but the resolver never resolved it. Raised for
  /// example when Debug-only packages are requested outside a Debug build.
  #[error("package not resolved: {name}")]
  PackageNotResolved { name: String },

  /// A package resolved without any binary directory.
  #[error("package {name} has no binary directory")]
  NoBinaryDir { name: String },
}

/// Paths of one resolved package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPackage {
  pub version: String,
  #[serde(default)]
  pub include_dirs: Vec<PathBuf>,
  #[serde(default)]
  pub lib_dirs: Vec<PathBuf>,
  #[serde(default)]
  pub bin_dirs: Vec<PathBuf>,
}

/// The full answer of the external package resolver.
///
/// Keyed by package name; [`BTreeMap`] keeps serialization order stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
  pub packages: BTreeMap<String, ResolvedPackage>,
}

impl Resolution {
  /// Load a resolution document.
  ///
  /// A missing document is a precondition failure: the resolver must have
  /// run before any step that needs resolved paths.
  pub fn load(path: &Path) -> Result<Self, ResolveError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ResolveError::NotFound(path.to_path_buf()));
      }
      Err(e) => {
        return Err(ResolveError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let resolution: Resolution = serde_json::from_str(&content).map_err(|e| ResolveError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    debug!(
      path = %path.display(),
      packages = resolution.packages.len(),
      "loaded resolution document"
    );

    Ok(resolution)
  }

  /// Look up a resolved package by name.
  pub fn package(&self, name: &str) -> Result<&ResolvedPackage, ResolveError> {
    self
      .packages
      .get(name)
      .ok_or_else(|| ResolveError::PackageNotResolved { name: name.to_string() })
  }

  /// First binary directory of a resolved package.
  pub fn bin_dir(&self, name: &str) -> Result<&Path, ResolveError> {
    let package = self.package(name)?;
    package
      .bin_dirs
      .first()
      .map(PathBuf::as_path)
      .ok_or_else(|| ResolveError::NoBinaryDir { name: name.to_string() })
  }

  /// Path of the resolved cmake binary.
  pub fn cmake_executable(&self) -> Result<PathBuf, ResolveError> {
    Ok(self.bin_dir(CMAKE_PACKAGE)?.join(exe_name("cmake")))
  }

  /// Path of the resolved glslc shader compiler.
  pub fn shader_compiler(&self) -> Result<PathBuf, ResolveError> {
    Ok(self.bin_dir(SHADERC_PACKAGE)?.join(exe_name("glslc")))
  }

  /// Directory containing the instrumentation layer binaries.
  pub fn layer_dir(&self) -> Result<&Path, ResolveError> {
    self.bin_dir(VALIDATION_LAYERS_PACKAGE)
  }
}

//! Build-type-conditional configuration resolution.
//!
//! The resolver is the leaf of the pipeline: a pure mapping from the build
//! type chosen by the invoking orchestration to the preprocessor definitions
//! and package requirements of that build. Every conditional behavior in the
//! other pipeline steps derives from the single [`BuildType`] value resolved
//! here; no step consults ambient state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Name of the application the pipeline prepares builds for.
pub const APP_NAME: &str = "lantern";

/// Directory, relative to the build directory, where compiled shader
/// artifacts are placed and where the application looks them up at run time.
pub const SHADER_RUNTIME_DIR: &str = "shaders";

/// Instrumentation layers enabled for Debug builds, in load order.
pub const DEBUG_INSTANCE_LAYERS: &[&str] = &[
  "VK_LAYER_KHRONOS_validation",
  "VK_LAYER_KHRONOS_synchronization2",
];

/// Package providing the validation layer binaries, required only in Debug.
pub const VALIDATION_LAYERS_PACKAGE: &str = "vulkan-validationlayers";

/// Package providing the cmake binary used to drive the native build.
pub const CMAKE_PACKAGE: &str = "cmake";

/// Package providing the glslc shader compiler.
pub const SHADERC_PACKAGE: &str = "shaderc";

/// The build type selected by the invoking build orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
  Debug,
  Release,
}

/// Error returned when a build type string is not recognized.
#[derive(Debug, Error)]
#[error("unknown build type: {0} (expected 'debug' or 'release')")]
pub struct ParseBuildTypeError(String);

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      BuildType::Debug => "debug",
      BuildType::Release => "release",
    }
  }

  pub fn is_debug(&self) -> bool {
    matches!(self, BuildType::Debug)
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildType {
  type Err = ParseBuildTypeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "debug" => Ok(BuildType::Debug),
      "release" => Ok(BuildType::Release),
      other => Err(ParseBuildTypeError(other.to_string())),
    }
  }
}

/// Which phase of the build a package requirement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
  /// Linked into or loaded by the application itself.
  Runtime,
  /// Tooling used while building, never shipped.
  Build,
}

impl DependencyKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      DependencyKind::Runtime => "runtime",
      DependencyKind::Build => "build",
    }
  }
}

impl fmt::Display for DependencyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A single package requirement handed to the external resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
  pub name: &'static str,
  pub version_req: &'static str,
  pub kind: DependencyKind,
}

/// Packages required by every build of the application.
const REQUIREMENTS: &[DependencySpec] = &[
  DependencySpec {
    name: "vulkan-loader",
    version_req: "1.3.224.0",
    kind: DependencyKind::Runtime,
  },
  DependencySpec {
    name: "glfw",
    version_req: "3.3.8",
    kind: DependencyKind::Runtime,
  },
  DependencySpec {
    name: "fmt",
    version_req: "9.1.0",
    kind: DependencyKind::Runtime,
  },
  DependencySpec {
    name: "ms-gsl",
    version_req: "4.0.0",
    kind: DependencyKind::Runtime,
  },
  DependencySpec {
    name: "range-v3",
    version_req: "0.12.0",
    kind: DependencyKind::Runtime,
  },
  DependencySpec {
    name: SHADERC_PACKAGE,
    version_req: "2021.1",
    kind: DependencyKind::Build,
  },
  DependencySpec {
    name: CMAKE_PACKAGE,
    version_req: ">=3.24",
    kind: DependencyKind::Build,
  },
];

/// Validation tooling pulled in only when debugging.
const DEBUG_REQUIREMENTS: &[DependencySpec] = &[DependencySpec {
  name: VALIDATION_LAYERS_PACKAGE,
  version_req: "1.3.224.1",
  kind: DependencyKind::Runtime,
}];

/// Preprocessor definitions for a build, in stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Definitions(BTreeMap<String, String>);

impl Definitions {
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Insert a definition. Last write wins.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.0.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Render as `-DNAME=value` arguments for a native build invocation.
  pub fn to_args(&self) -> Vec<String> {
    self.0.iter().map(|(k, v)| format!("-D{}={}", k, v)).collect()
  }
}

/// Escape a path for embedding into a text-based compiler definition.
///
/// Each backslash separator is doubled twice so the value survives both the
/// build system and the downstream preprocessor. Forward slashes pass
/// through untouched.
pub fn escape_define_path(path: &str) -> String {
  path.replace('\\', r"\\\\")
}

/// The resolved configuration of one build invocation.
///
/// Constructed exactly once per invocation via [`BuildConfig::resolve`] and
/// passed by reference into every later pipeline step. Immutable thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct BuildConfig {
  pub build_type: BuildType,
  pub definitions: Definitions,
  pub dependencies: Vec<DependencySpec>,
}

impl BuildConfig {
  /// Resolve the configuration for a build type.
  ///
  /// Pure and total: no I/O, no failure. Exactly one of the two build-type
  /// flags is truthy, and the validation-layer requirement is present if and
  /// only if the build type is Debug.
  pub fn resolve(build_type: BuildType) -> Self {
    let prefix = APP_NAME.to_uppercase();

    let mut definitions = Definitions::new();
    definitions.insert(
      format!("{}_DEBUG", prefix),
      if build_type.is_debug() { "1" } else { "0" },
    );
    definitions.insert(
      format!("{}_RELEASE", prefix),
      if build_type.is_debug() { "0" } else { "1" },
    );
    definitions.insert(
      format!("{}_SHADERS_PATH", prefix),
      escape_define_path(SHADER_RUNTIME_DIR),
    );

    let mut dependencies: Vec<DependencySpec> = REQUIREMENTS.to_vec();
    if build_type.is_debug() {
      dependencies.extend_from_slice(DEBUG_REQUIREMENTS);
    }

    Self {
      build_type,
      definitions,
      dependencies,
    }
  }

  pub fn runtime_requirements(&self) -> impl Iterator<Item = &DependencySpec> {
    self
      .dependencies
      .iter()
      .filter(|d| d.kind == DependencyKind::Runtime)
  }

  pub fn build_requirements(&self) -> impl Iterator<Item = &DependencySpec> {
    self
      .dependencies
      .iter()
      .filter(|d| d.kind == DependencyKind::Build)
  }

  /// Instrumentation layers for this build, in load order. Empty for Release.
  pub fn instance_layers(&self) -> &'static [&'static str] {
    if self.build_type.is_debug() {
      DEBUG_INSTANCE_LAYERS
    } else {
      &[]
    }
  }
}

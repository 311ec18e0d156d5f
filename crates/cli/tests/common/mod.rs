//! Shared test helpers for CLI integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Preset document as the build-system generator would emit it.
pub const SAMPLE_PRESETS: &str = r#"
{
  "version": 4,
  "vendor": { "generated-by": "resolver 2.0" },
  "configurePresets": [
    {
      "name": "conan-debug",
      "generator": "Ninja",
      "environment": { "CC": "clang" }
    },
    { "name": "conan-release", "generator": "Ninja" }
  ],
  "buildPresets": [
    { "name": "conan-debug", "configurePreset": "conan-debug" },
    { "name": "conan-release", "configurePreset": "conan-release" }
  ]
}
"#;

/// Get a Command for the vkprep binary.
pub fn vkprep_cmd() -> Command {
  cargo_bin_cmd!("vkprep")
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory with a build directory and a
/// shader source tree.
pub struct TestEnv {
  pub temp: TempDir,
  pub build_dir: PathBuf,
  pub shader_dir: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let build_dir = temp.path().join("build");
    let shader_dir = temp.path().join("shaders");
    std::fs::create_dir_all(&build_dir).unwrap();
    std::fs::create_dir_all(&shader_dir).unwrap();
    Self {
      temp,
      build_dir,
      shader_dir,
    }
  }

  /// Write the generator's preset document into the build directory.
  pub fn write_presets(&self) -> PathBuf {
    let path = self.build_dir.join("CMakePresets.json");
    std::fs::write(&path, SAMPLE_PRESETS).unwrap();
    path
  }

  /// Write a resolver output document resolving cmake, shaderc, and the
  /// validation layers. The shaderc bin dir points at the tools directory
  /// so a stand-in glslc can be placed there.
  pub fn write_resolution(&self) -> PathBuf {
    let tools = self.tools_dir();
    let document = serde_json::json!({
      "packages": {
        "cmake": {
          "version": "3.27.1",
          "bin_dirs": ["/opt/pkgs/cmake/bin"]
        },
        "shaderc": {
          "version": "2021.1",
          "bin_dirs": [tools]
        },
        "vulkan-validationlayers": {
          "version": "1.3.224.1",
          "bin_dirs": ["/opt/sdk/layers"]
        }
      }
    });
    let path = self.build_dir.join("resolved.json");
    std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
    path
  }

  pub fn tools_dir(&self) -> PathBuf {
    let tools = self.temp.path().join("tools");
    std::fs::create_dir_all(&tools).unwrap();
    tools
  }

  /// Write a shader source file relative to the shader directory.
  pub fn write_shader(&self, relative_path: &str, content: &str) {
    let path = self.shader_dir.join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Install a stand-in glslc into the tools directory: copies the source
  /// to the output, or fails with a diagnostic when the source contains
  /// "bad".
  #[cfg(unix)]
  pub fn write_fake_compiler(&self) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.tools_dir().join("glslc");
    std::fs::write(
      &path,
      "#!/bin/sh\nif grep -q bad \"$1\"; then\n  echo \"$1: syntax error\" >&2\n  exit 1\nfi\ncp \"$1\" \"$3\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }
}

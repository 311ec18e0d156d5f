//! Sequential orchestration of the full preparation pipeline.
//!
//! Order matters only where the spec makes it matter: configuration is
//! resolved first, the environment script and the preset patch both consume
//! it, and shader compilation runs last. The preset patch and the shader
//! step both require the external generator/resolver artifacts to exist.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};

use vkprep_platform::Shell;

use crate::config::{BuildConfig, BuildType, SHADER_RUNTIME_DIR};
use crate::env::{self, EnvError};
use crate::preset::{self, PRESETS_FILE, PresetError, PresetPatch};
use crate::resolve::{RESOLUTION_FILE, Resolution, ResolveError};
use crate::shader::{ShaderCompiler, ShaderError};

/// Options for a full pipeline run.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
  pub build_type: BuildType,
  /// Directory holding the generator/resolver artifacts and receiving the
  /// emitted ones.
  pub build_dir: PathBuf,
  /// Root of the shader source tree.
  pub shader_source_dir: PathBuf,
  /// Preset document location. Defaults to `<build_dir>/CMakePresets.json`.
  pub presets_path: Option<PathBuf>,
  /// Resolver output location. Defaults to `<build_dir>/resolved.json`.
  pub resolution_path: Option<PathBuf>,
  /// Compiled shader destination. Defaults to `<build_dir>/shaders`.
  pub shader_output_dir: Option<PathBuf>,
  /// Shell for the environment script. Defaults to the detected shell.
  pub shell: Option<Shell>,
  /// Worker pool size for shader compilation. Defaults to the available
  /// parallelism.
  pub parallelism: Option<usize>,
}

impl PrepareOptions {
  pub fn new(build_type: BuildType, build_dir: impl Into<PathBuf>, shader_source_dir: impl Into<PathBuf>) -> Self {
    Self {
      build_type,
      build_dir: build_dir.into(),
      shader_source_dir: shader_source_dir.into(),
      presets_path: None,
      resolution_path: None,
      shader_output_dir: None,
      shell: None,
      parallelism: None,
    }
  }

  pub fn presets_path(&self) -> PathBuf {
    self
      .presets_path
      .clone()
      .unwrap_or_else(|| self.build_dir.join(PRESETS_FILE))
  }

  pub fn resolution_path(&self) -> PathBuf {
    self
      .resolution_path
      .clone()
      .unwrap_or_else(|| self.build_dir.join(RESOLUTION_FILE))
  }

  pub fn shader_output_dir(&self) -> PathBuf {
    self
      .shader_output_dir
      .clone()
      .unwrap_or_else(|| self.build_dir.join(SHADER_RUNTIME_DIR))
  }
}

/// Errors raised by the orchestrated run.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Env(#[from] EnvError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Preset(#[from] PresetError),

  #[error(transparent)]
  Shader(#[from] ShaderError),
}

/// Summary of one pipeline run.
#[derive(Debug)]
pub struct PrepareSummary {
  pub build_type: BuildType,
  pub env_script: PathBuf,
  pub presets_patched: usize,
  pub shaders_compiled: usize,
}

/// Run the full preparation pipeline.
pub async fn prepare(options: &PrepareOptions) -> Result<PrepareSummary, PipelineError> {
  let config = BuildConfig::resolve(options.build_type);
  info!(
    build_type = %config.build_type,
    definitions = config.definitions.len(),
    dependencies = config.dependencies.len(),
    "resolved build configuration"
  );

  let shell = options.shell.unwrap_or_else(Shell::detect);
  let env_script = env::write_script(&config, &options.build_dir, shell)?;

  let resolution = Resolution::load(&options.resolution_path())?;
  let patch = PresetPatch::compute(&config, &resolution)?;
  let presets_patched = preset::patch_file(&options.presets_path(), &patch)?;

  let compiler = resolution.shader_compiler()?;
  let mut shader_compiler = ShaderCompiler::new(
    compiler,
    options.shader_source_dir.clone(),
    options.shader_output_dir(),
  );
  if let Some(parallelism) = options.parallelism {
    shader_compiler = shader_compiler.with_parallelism(parallelism);
  }

  let report = shader_compiler.compile_all().await?;
  if !report.is_success() {
    for failure in &report.failed {
      error!(
        source = %failure.source_path.display(),
        status = ?failure.status,
        stderr = %failure.stderr,
        "shader failed to compile"
      );
    }
    return Err(
      ShaderError::CompilationFailed {
        failed: report.failed.len(),
        total: report.total(),
      }
      .into(),
    );
  }

  Ok(PrepareSummary {
    build_type: options.build_type,
    env_script,
    presets_patched,
    shaders_compiled: report.compiled.len(),
  })
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
  use super::*;
  use crate::env::INSTANCE_LAYERS_VAR;
  use crate::preset::{LAYER_PATH_VAR, PresetDocument};
  use crate::resolve::ResolvedPackage;
  use std::fs;
  use std::os::unix::fs::PermissionsExt;
  use std::path::Path;

  const PRESETS: &str = r#"
    {
      "version": 4,
      "configurePresets": [{ "name": "conan-debug", "generator": "Ninja" }],
      "buildPresets": [{ "name": "conan-debug", "configurePreset": "conan-debug" }]
    }
  "#;

  fn write_build_dir(root: &Path) -> PathBuf {
    let build_dir = root.join("build");
    fs::create_dir_all(&build_dir).unwrap();
    fs::write(build_dir.join(PRESETS_FILE), PRESETS).unwrap();

    // Stand-in glslc next to the resolver output, resolved via `shaderc`.
    let tools = build_dir.join("tools");
    fs::create_dir_all(&tools).unwrap();
    let glslc = tools.join("glslc");
    fs::write(&glslc, "#!/bin/sh\ncp \"$1\" \"$3\"\n").unwrap();
    fs::set_permissions(&glslc, fs::Permissions::from_mode(0o755)).unwrap();

    let mut resolution = Resolution::default();
    for (name, bin_dir) in [
      ("cmake", PathBuf::from("/opt/pkgs/cmake/bin")),
      ("shaderc", tools.clone()),
      ("vulkan-validationlayers", PathBuf::from("/opt/sdk/layers")),
    ] {
      resolution.packages.insert(
        name.to_string(),
        ResolvedPackage {
          version: "1.0".to_string(),
          bin_dirs: vec![bin_dir],
          ..Default::default()
        },
      );
    }
    fs::write(
      build_dir.join(RESOLUTION_FILE),
      serde_json::to_string_pretty(&resolution).unwrap(),
    )
    .unwrap();

    build_dir
  }

  #[tokio::test]
  async fn debug_prepare_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let build_dir = write_build_dir(dir.path());

    let shaders = dir.path().join("shaders");
    fs::create_dir_all(shaders.join("scene")).unwrap();
    fs::write(shaders.join("scene/tri.vert"), "#version 450\n").unwrap();
    fs::write(shaders.join("quad.frag"), "#version 450\n").unwrap();

    let mut options = PrepareOptions::new(BuildType::Debug, &build_dir, &shaders);
    options.shell = Some(Shell::Sh);

    let summary = prepare(&options).await.unwrap();
    assert_eq!(summary.presets_patched, 2);
    assert_eq!(summary.shaders_compiled, 2);

    // Environment script carries the layer list.
    let script = fs::read_to_string(summary.env_script).unwrap();
    assert!(script.contains(INSTANCE_LAYERS_VAR));

    // Every preset picked up the layer directory from the resolver.
    let document: PresetDocument =
      serde_json::from_str(&fs::read_to_string(build_dir.join(PRESETS_FILE)).unwrap()).unwrap();
    for preset in [&document.configure_presets[0], &document.build_presets[0]] {
      let env = preset.environment.as_ref().unwrap();
      assert_eq!(env.get(LAYER_PATH_VAR).unwrap(), "/opt/sdk/layers");
    }

    assert!(build_dir.join("shaders/tri.vert.spv").is_file());
    assert!(build_dir.join("shaders/quad.frag.spv").is_file());
  }

  #[tokio::test]
  async fn missing_preset_document_fails_before_shader_compilation() {
    let dir = tempfile::tempdir().unwrap();
    let build_dir = write_build_dir(dir.path());
    fs::remove_file(build_dir.join(PRESETS_FILE)).unwrap();

    let shaders = dir.path().join("shaders");
    fs::create_dir_all(&shaders).unwrap();

    let mut options = PrepareOptions::new(BuildType::Debug, &build_dir, &shaders);
    options.shell = Some(Shell::Sh);

    let err = prepare(&options).await.unwrap_err();
    assert!(matches!(err, PipelineError::Preset(PresetError::NotFound(_))));
  }
}

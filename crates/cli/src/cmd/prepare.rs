//! Implementation of the `vkprep prepare` command.
//!
//! Runs the full preparation pipeline for one build type:
//! - Resolves the build configuration
//! - Writes the runtime environment script
//! - Patches the generated preset document with resolved paths
//! - Compiles the shader source tree

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use vkprep_lib::config::BuildType;
use vkprep_lib::pipeline::{PrepareOptions, prepare};
use vkprep_platform::Shell;

use crate::output::print_success;

#[allow(clippy::too_many_arguments)]
pub fn cmd_prepare(
  build_type: BuildType,
  build_dir: PathBuf,
  shader_dir: PathBuf,
  presets: Option<PathBuf>,
  resolution: Option<PathBuf>,
  output_dir: Option<PathBuf>,
  shell: Option<&str>,
  jobs: Option<usize>,
) -> Result<()> {
  let mut options = PrepareOptions::new(build_type, build_dir, shader_dir);
  options.presets_path = presets;
  options.resolution_path = resolution;
  options.shader_output_dir = output_dir;
  options.parallelism = jobs;
  if let Some(name) = shell {
    options.shell = Some(Shell::from_name(name)?);
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let summary = rt.block_on(prepare(&options)).context("Prepare failed")?;

  info!(script = %summary.env_script.display(), "environment script saved");

  println!();
  print_success(&format!("Prepare complete ({} build)", summary.build_type));
  println!("  Environment script: {}", summary.env_script.display());
  println!("  Presets patched: {}", summary.presets_patched);
  println!("  Shaders compiled: {}", summary.shaders_compiled);

  Ok(())
}

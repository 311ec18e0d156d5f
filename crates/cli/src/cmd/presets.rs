//! Implementation of the `vkprep presets` command.
//!
//! Patches the preset document produced by the build-system generator:
//! every configure preset gets the resolved cmake binary, and Debug builds
//! additionally get the instrumentation variables merged into every
//! preset's environment.

use std::path::{Path, PathBuf};

use anyhow::Result;

use vkprep_lib::config::{BuildConfig, BuildType};
use vkprep_lib::preset::{PRESETS_FILE, PresetPatch, patch_file};
use vkprep_lib::resolve::{RESOLUTION_FILE, Resolution};

use crate::output::print_success;

pub fn cmd_presets(
  build_type: BuildType,
  build_dir: &Path,
  presets: Option<PathBuf>,
  resolution: Option<PathBuf>,
) -> Result<()> {
  let presets_path = presets.unwrap_or_else(|| build_dir.join(PRESETS_FILE));
  let resolution_path = resolution.unwrap_or_else(|| build_dir.join(RESOLUTION_FILE));

  let config = BuildConfig::resolve(build_type);
  let resolution = Resolution::load(&resolution_path)?;
  let patch = PresetPatch::compute(&config, &resolution)?;
  let count = patch_file(&presets_path, &patch)?;

  print_success(&format!("Patched {} preset(s) in {}", count, presets_path.display()));

  Ok(())
}

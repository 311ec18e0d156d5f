//! Loading, patching, and saving the preset document.
//!
//! The patcher never creates the document; a missing file means the
//! build-system generator has not run yet and is reported as such. Saving
//! replaces the document atomically (write to temp, then rename) so a crash
//! mid-write cannot leave a truncated artifact behind.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::env::INSTANCE_LAYERS_VAR;
use crate::resolve::{Resolution, ResolveError};

use super::types::PresetDocument;

/// Variable pointing at the directory containing instrumentation layer
/// binaries.
pub const LAYER_PATH_VAR: &str = "VK_LAYER_PATH";

/// Default file name of the generator's preset document, relative to the
/// build directory.
pub const PRESETS_FILE: &str = "CMakePresets.json";

/// Errors raised while patching the preset document.
#[derive(Debug, Error)]
pub enum PresetError {
  /// The document does not exist. The build-system generator must run first.
  #[error("preset document not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read preset document {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The document exists but is not well-formed.
  #[error("malformed preset document {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize preset document: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write preset document {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// The computed values merged into the preset document.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetPatch {
  cmake_executable: String,
  environment: BTreeMap<String, String>,
}

impl PresetPatch {
  /// Compute the patch for a build from resolved dependency paths.
  ///
  /// For Debug builds this looks up the instrumentation layer directory, so
  /// it fails when the validation-layer package was not resolved.
  pub fn compute(config: &BuildConfig, resolution: &Resolution) -> Result<Self, ResolveError> {
    let cmake_executable = resolution.cmake_executable()?.display().to_string();

    let mut environment = BTreeMap::new();
    let layers = config.instance_layers();
    if !layers.is_empty() {
      environment.insert(INSTANCE_LAYERS_VAR.to_string(), layers.join(";"));
      environment.insert(
        LAYER_PATH_VAR.to_string(),
        resolution.layer_dir()?.display().to_string(),
      );
    }

    Ok(Self {
      cmake_executable,
      environment,
    })
  }
}

/// Load the preset document from disk.
pub fn load_document(path: &Path) -> Result<PresetDocument, PresetError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(PresetError::NotFound(path.to_path_buf()));
    }
    Err(e) => {
      return Err(PresetError::Read {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  serde_json::from_str(&content).map_err(|e| PresetError::Parse {
    path: path.to_path_buf(),
    source: e,
  })
}

/// Save the preset document, replacing the previous content atomically.
pub fn save_document(path: &Path, document: &PresetDocument) -> Result<(), PresetError> {
  let content = serde_json::to_string_pretty(document).map_err(PresetError::Serialize)?;

  let temp_path = path.with_extension("json.tmp");
  fs::write(&temp_path, &content).map_err(|e| PresetError::Write {
    path: temp_path.clone(),
    source: e,
  })?;
  fs::rename(&temp_path, path).map_err(|e| PresetError::Write {
    path: path.to_path_buf(),
    source: e,
  })?;

  Ok(())
}

/// Merge the patch into the document.
///
/// `cmakeExecutable` is set on every configure preset; the environment
/// entries are merged into every preset of both lists. Applying the same
/// patch twice yields the same document.
pub fn apply_patch(document: &mut PresetDocument, patch: &PresetPatch) {
  for preset in &mut document.configure_presets {
    preset.cmake_executable = Some(patch.cmake_executable.clone());
    debug!(preset = %preset.name, "set cmake executable");
  }

  for preset in document.all_presets_mut() {
    for (name, value) in &patch.environment {
      preset.set_env(name, value.clone());
    }
  }
}

/// Load, patch, and save the preset document at `path`.
///
/// Returns the number of presets touched.
pub fn patch_file(path: &Path, patch: &PresetPatch) -> Result<usize, PresetError> {
  let mut document = load_document(path)?;
  apply_patch(&mut document, patch);
  save_document(path, &document)?;

  let count = document.preset_count();
  info!(path = %path.display(), presets = count, "patched preset document");
  Ok(count)
}

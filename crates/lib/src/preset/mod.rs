//! The generated CMake preset document and its patching.
//!
//! The native build-system generator emits the preset document; this module
//! treats it strictly as an artifact to patch. The model is typed for the
//! fields the patcher touches and schema-tolerant for everything else.

mod patch;
mod types;

pub use patch::{LAYER_PATH_VAR, PRESETS_FILE, PresetError, PresetPatch, apply_patch, load_document, patch_file, save_document};
pub use types::{Preset, PresetDocument};

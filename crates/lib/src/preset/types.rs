//! Typed model of the preset document.
//!
//! Only `name`, `environment`, and `cmakeExecutable` are modeled explicitly;
//! every unrecognized field lands in the flattened `extra` bag so the
//! document round-trips without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The preset document as emitted by the build-system generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetDocument {
  #[serde(rename = "configurePresets", default, skip_serializing_if = "Vec::is_empty")]
  pub configure_presets: Vec<Preset>,

  #[serde(rename = "buildPresets", default, skip_serializing_if = "Vec::is_empty")]
  pub build_presets: Vec<Preset>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl PresetDocument {
  /// All presets of both lists, configure presets first.
  pub fn all_presets_mut(&mut self) -> impl Iterator<Item = &mut Preset> {
    self.configure_presets.iter_mut().chain(self.build_presets.iter_mut())
  }

  pub fn preset_count(&self) -> usize {
    self.configure_presets.len() + self.build_presets.len()
  }
}

/// One entry of `configurePresets` or `buildPresets`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub environment: Option<Map<String, Value>>,

  #[serde(rename = "cmakeExecutable", default, skip_serializing_if = "Option::is_none")]
  pub cmake_executable: Option<String>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Preset {
  /// Add or overwrite an environment entry, creating the map when absent.
  ///
  /// Pre-existing unrelated keys are preserved; re-inserting the same key
  /// overwrites (last write wins).
  pub fn set_env(&mut self, name: &str, value: impl Into<String>) {
    self
      .environment
      .get_or_insert_with(Map::new)
      .insert(name.to_string(), Value::String(value.into()));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"
    {
      "version": 4,
      "vendor": { "generated-by": "resolver 2.0" },
      "configurePresets": [
        {
          "name": "default",
          "generator": "Ninja",
          "binaryDir": "build",
          "environment": { "CC": "clang" }
        }
      ],
      "buildPresets": [
        { "name": "default-build", "configurePreset": "default" }
      ]
    }
  "#;

  #[test]
  fn unknown_fields_round_trip() {
    let doc: PresetDocument = serde_json::from_str(SAMPLE).unwrap();

    assert_eq!(doc.extra.get("version"), Some(&Value::from(4)));
    assert_eq!(doc.configure_presets[0].extra.get("generator"), Some(&Value::from("Ninja")));

    let rendered = serde_json::to_string(&doc).unwrap();
    let reparsed: PresetDocument = serde_json::from_str(&rendered).unwrap();
    assert_eq!(doc, reparsed);
  }

  #[test]
  fn set_env_creates_map_when_absent() {
    let doc: PresetDocument = serde_json::from_str(SAMPLE).unwrap();
    let mut preset = doc.build_presets[0].clone();
    assert!(preset.environment.is_none());

    preset.set_env("VK_LAYER_PATH", "/opt/sdk/layers");
    let env = preset.environment.unwrap();
    assert_eq!(env.get("VK_LAYER_PATH"), Some(&Value::from("/opt/sdk/layers")));
  }

  #[test]
  fn set_env_preserves_unrelated_keys() {
    let doc: PresetDocument = serde_json::from_str(SAMPLE).unwrap();
    let mut preset = doc.configure_presets[0].clone();

    preset.set_env("VK_LAYER_PATH", "/opt/sdk/layers");
    let env = preset.environment.unwrap();
    assert_eq!(env.get("CC"), Some(&Value::from("clang")));
    assert_eq!(env.len(), 2);
  }
}

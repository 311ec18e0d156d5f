//! Runtime environment synthesis and script emission.
//!
//! Builds the map of variables the application needs *at run time* (as
//! opposed to build time) and serializes it to a script that, once sourced,
//! exports exactly those variables. The only conditional entry is the
//! instrumentation-layer list: present if and only if the build is Debug.
//! A Release build produces a script with zero assignments, not an empty
//! assignment.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use vkprep_platform::Shell;

use crate::config::BuildConfig;

/// Variable naming the instrumentation layers to load.
pub const INSTANCE_LAYERS_VAR: &str = "VK_INSTANCE_LAYERS";

/// Base name of the emitted script, before the shell extension.
pub const SCRIPT_BASENAME: &str = "runenv";

/// Ordered map of environment variables. Inserts are last-write-wins.
pub type EnvironmentMap = BTreeMap<String, String>;

/// Errors raised while emitting the environment script.
#[derive(Debug, Error)]
pub enum EnvError {
  #[error("failed to write environment script {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Compute the runtime environment for a build.
///
/// Debug builds get the semicolon-joined instrumentation layer list; Release
/// builds get an empty map.
pub fn runtime_environment(config: &BuildConfig) -> EnvironmentMap {
  let mut env = EnvironmentMap::new();

  let layers = config.instance_layers();
  if !layers.is_empty() {
    env.insert(INSTANCE_LAYERS_VAR.to_string(), layers.join(";"));
  }

  env
}

/// File name of the environment script for a shell, e.g. `runenv.sh`.
pub fn script_name(shell: Shell) -> String {
  format!("{}.{}", SCRIPT_BASENAME, shell.script_extension())
}

/// Render the environment map as a shell script.
pub fn render_script(shell: Shell, env: &EnvironmentMap) -> String {
  let mut lines = vec![
    shell.header().to_string(),
    shell.comment("Generated by vkprep. Source this script before running the application."),
  ];

  for (name, value) in env {
    lines.push(shell.export_var(name, value));
  }

  lines.push(String::new());
  lines.join("\n")
}

/// Write the environment script for a build into a directory.
///
/// Overwrites any previous script; re-running with the same configuration
/// produces identical content. Returns the script path.
pub fn write_script(config: &BuildConfig, dir: &Path, shell: Shell) -> Result<PathBuf, EnvError> {
  let env = runtime_environment(config);
  let path = dir.join(script_name(shell));
  let content = render_script(shell, &env);

  fs::create_dir_all(dir).map_err(|e| EnvError::Write {
    path: path.clone(),
    source: e,
  })?;
  fs::write(&path, content).map_err(|e| EnvError::Write {
    path: path.clone(),
    source: e,
  })?;

  info!(
    path = %path.display(),
    variables = env.len(),
    "wrote runtime environment script"
  );

  Ok(path)
}

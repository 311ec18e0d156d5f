//! Implementation of the `vkprep env` command.

use std::path::Path;

use anyhow::Result;

use vkprep_lib::config::{BuildConfig, BuildType};
use vkprep_lib::env::{render_script, runtime_environment, write_script};
use vkprep_platform::Shell;

use crate::output::print_success;

/// Write (or print) the runtime environment script for a build type.
pub fn cmd_env(build_type: BuildType, build_dir: &Path, shell: Option<&str>, print: bool) -> Result<()> {
  let shell = match shell {
    Some(name) => Shell::from_name(name)?,
    None => Shell::detect(),
  };

  let config = BuildConfig::resolve(build_type);

  if print {
    let env = runtime_environment(&config);
    print!("{}", render_script(shell, &env));
    return Ok(());
  }

  let path = write_script(&config, build_dir, shell)?;
  print_success(&format!("Wrote {}", path.display()));

  Ok(())
}

//! Implementation of the `vkprep info` command.
//!
//! Shows the resolved configuration for a build type: the preprocessor
//! definitions and the package requirements handed to the resolver.

use anyhow::Result;

use vkprep_lib::config::{BuildConfig, BuildType};

use crate::output::{print_info, print_json};

pub fn cmd_info(build_type: BuildType, json: bool) -> Result<()> {
  let config = BuildConfig::resolve(build_type);

  if json {
    return print_json(&config);
  }

  print_info(&format!("Build type: {}", config.build_type));

  println!();
  println!("Definitions:");
  for (name, value) in config.definitions.iter() {
    println!("  -D{}={}", name, value);
  }

  println!();
  println!("Requirements:");
  for dep in &config.dependencies {
    println!("  {}/{} ({})", dep.name, dep.version_req, dep.kind);
  }

  Ok(())
}

//! Implementation of the `vkprep shaders` command.
//!
//! Compiles every shader source under the source tree. Compiler diagnostics
//! are surfaced verbatim; any failed file makes the command fail after the
//! whole batch has been attempted.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use vkprep_lib::config::SHADER_RUNTIME_DIR;
use vkprep_lib::resolve::{RESOLUTION_FILE, Resolution};
use vkprep_lib::shader::ShaderCompiler;

use crate::output::{format_duration, print_error, print_success};

pub fn cmd_shaders(
  build_dir: &Path,
  source_dir: PathBuf,
  output_dir: Option<PathBuf>,
  compiler: Option<PathBuf>,
  jobs: Option<usize>,
) -> Result<()> {
  let compiler = match compiler {
    Some(compiler) => compiler,
    None => Resolution::load(&build_dir.join(RESOLUTION_FILE))?.shader_compiler()?,
  };
  let output_dir = output_dir.unwrap_or_else(|| build_dir.join(SHADER_RUNTIME_DIR));

  let mut shader_compiler = ShaderCompiler::new(compiler, source_dir, output_dir);
  if let Some(jobs) = jobs {
    shader_compiler = shader_compiler.with_parallelism(jobs);
  }

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(shader_compiler.compile_all())?;

  for failure in &report.failed {
    print_error(&format!(
      "{} failed (exit code {})",
      failure.source_path.display(),
      failure.status.map_or_else(|| "none".to_string(), |c| c.to_string()),
    ));
    if !failure.stderr.is_empty() {
      eprint!("{}", failure.stderr);
    }
    if !failure.stdout.is_empty() {
      print!("{}", failure.stdout);
    }
  }

  if !report.is_success() {
    anyhow::bail!(
      "{} of {} shader(s) failed to compile",
      report.failed.len(),
      report.total()
    );
  }

  print_success(&format!(
    "Compiled {} shader(s) in {}",
    report.compiled.len(),
    format_duration(started.elapsed())
  ));

  Ok(())
}

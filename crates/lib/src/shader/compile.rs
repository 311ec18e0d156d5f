//! The shader compilation driver.
//!
//! Discovery is recursive and deterministic (walk order is sorted by file
//! name). Compilation runs one external process per source through a
//! bounded worker pool; ordering between files carries no meaning, only the
//! aggregate result does. Stale artifacts from removed sources are never
//! pruned here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::types::{CompileFailure, CompileReport, OUTPUT_SUFFIX, SHADER_EXTENSIONS, ShaderArtifact, ShaderError};

/// Drives the external shader compiler over a source tree.
#[derive(Debug, Clone)]
pub struct ShaderCompiler {
  compiler: PathBuf,
  source_root: PathBuf,
  output_root: PathBuf,
  parallelism: usize,
}

fn default_parallelism() -> usize {
  std::thread::available_parallelism().map(usize::from).unwrap_or(1)
}

impl ShaderCompiler {
  pub fn new(compiler: PathBuf, source_root: PathBuf, output_root: PathBuf) -> Self {
    Self {
      compiler,
      source_root,
      output_root,
      parallelism: default_parallelism(),
    }
  }

  pub fn with_parallelism(mut self, parallelism: usize) -> Self {
    self.parallelism = parallelism.max(1);
    self
  }

  /// Derive the output artifact path for a source file.
  ///
  /// The full source file name (extension included) gets the compiled
  /// suffix appended and lands directly in the output root, e.g.
  /// `scene/tri.vert` -> `<output-root>/tri.vert.spv`.
  pub fn derive_output_path(&self, source: &Path) -> PathBuf {
    let file_name = source.file_name().unwrap_or_default().to_string_lossy();
    self.output_root.join(format!("{}.{}", file_name, OUTPUT_SUFFIX))
  }

  fn is_shader_source(path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| SHADER_EXTENSIONS.contains(&ext))
  }

  /// Discover every shader source under the source root.
  ///
  /// Because output derivation flattens directories, two same-named sources
  /// in different subdirectories are rejected here rather than silently
  /// overwriting one another.
  pub fn discover(&self) -> Result<Vec<ShaderArtifact>, ShaderError> {
    if !self.source_root.is_dir() {
      return Err(ShaderError::SourceRootMissing(self.source_root.clone()));
    }

    let mut artifacts = Vec::new();
    let mut outputs: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(&self.source_root).sort_by_file_name() {
      let entry = entry?;
      if !entry.file_type().is_file() || !Self::is_shader_source(entry.path()) {
        continue;
      }

      let source_path = entry.path().to_path_buf();
      let output_path = self.derive_output_path(&source_path);

      if let Some(first) = outputs.get(&output_path) {
        return Err(ShaderError::OutputCollision {
          first: first.clone(),
          second: source_path,
          output: output_path,
        });
      }
      outputs.insert(output_path.clone(), source_path.clone());

      artifacts.push(ShaderArtifact {
        source_path,
        output_path,
      });
    }

    debug!(
      source_root = %self.source_root.display(),
      count = artifacts.len(),
      "discovered shader sources"
    );

    Ok(artifacts)
  }

  /// Compile every discovered shader source.
  ///
  /// The output directory is created (idempotently) before any compiler
  /// invocation starts. Every source is attempted; per-file failures are
  /// collected into the report rather than aborting the batch.
  pub async fn compile_all(&self) -> Result<CompileReport, ShaderError> {
    let artifacts = self.discover()?;
    if artifacts.is_empty() {
      warn!(source_root = %self.source_root.display(), "no shader sources found");
      return Ok(CompileReport::default());
    }

    std::fs::create_dir_all(&self.output_root).map_err(|e| ShaderError::CreateDir {
      path: self.output_root.clone(),
      source: e,
    })?;

    let semaphore = Arc::new(Semaphore::new(self.parallelism));
    let mut join_set = JoinSet::new();

    for artifact in artifacts {
      let compiler = self.compiler.clone();
      let semaphore = semaphore.clone();

      join_set.spawn(async move {
        let _permit = semaphore.acquire().await.unwrap();
        compile_one(&compiler, artifact).await
      });
    }

    let mut report = CompileReport::default();
    while let Some(join_result) = join_set.join_next().await {
      match join_result {
        Ok(Ok(Ok(artifact))) => {
          info!(output = %artifact.output_path.display(), "compiled shader");
          report.compiled.push(artifact);
        }
        Ok(Ok(Err(failure))) => {
          error!(
            source = %failure.source_path.display(),
            status = ?failure.status,
            "shader compilation failed"
          );
          report.failed.push(failure);
        }
        Ok(Err(e)) => return Err(e),
        Err(e) => {
          error!(error = %e, "shader compile task panicked");
        }
      }
    }

    report.compiled.sort_by(|a, b| a.source_path.cmp(&b.source_path));
    report.failed.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    Ok(report)
  }
}

/// Run one compiler invocation: `<compiler> <source> -o <output>`.
///
/// Arguments are passed as a vector, never through a shell.
async fn compile_one(
  compiler: &Path,
  artifact: ShaderArtifact,
) -> Result<Result<ShaderArtifact, CompileFailure>, ShaderError> {
  debug!(
    source = %artifact.source_path.display(),
    output = %artifact.output_path.display(),
    "invoking shader compiler"
  );

  let output = tokio::process::Command::new(compiler)
    .arg(&artifact.source_path)
    .arg("-o")
    .arg(&artifact.output_path)
    .output()
    .await
    .map_err(|e| ShaderError::Spawn {
      compiler: compiler.to_path_buf(),
      source: e,
    })?;

  if output.status.success() {
    Ok(Ok(artifact))
  } else {
    Ok(Err(CompileFailure {
      source_path: artifact.source_path,
      status: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }))
  }
}

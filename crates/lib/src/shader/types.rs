//! Types for shader discovery and compilation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Extensions identifying vertex and fragment shader sources.
pub const SHADER_EXTENSIONS: &[&str] = &["vert", "frag"];

/// Suffix appended to the source file name for the compiled artifact.
pub const OUTPUT_SUFFIX: &str = "spv";

/// A discovered shader source and its derived output artifact.
///
/// The output path keeps the source's full file name (extension included)
/// and relocates it, flat, into the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderArtifact {
  pub source_path: PathBuf,
  pub output_path: PathBuf,
}

/// Diagnostics of one failed compiler invocation.
#[derive(Debug, Clone)]
pub struct CompileFailure {
  pub source_path: PathBuf,
  /// Exit code of the compiler, if it ran to completion.
  pub status: Option<i32>,
  /// Compiler output, verbatim.
  pub stdout: String,
  pub stderr: String,
}

/// Aggregate result of a compilation run.
///
/// Every discovered source is attempted; artifacts written before or after a
/// failing file are kept.
#[derive(Debug, Default)]
pub struct CompileReport {
  pub compiled: Vec<ShaderArtifact>,
  pub failed: Vec<CompileFailure>,
}

impl CompileReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }

  pub fn total(&self) -> usize {
    self.compiled.len() + self.failed.len()
  }
}

/// Errors raised while driving the shader compiler.
#[derive(Debug, Error)]
pub enum ShaderError {
  #[error("shader source directory not found: {0}")]
  SourceRootMissing(PathBuf),

  #[error("failed to walk shader source tree: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("failed to create shader output directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Two sources would flatten onto the same output artifact.
  #[error("shader sources {first} and {second} both map to output {output}")]
  OutputCollision {
    first: PathBuf,
    second: PathBuf,
    output: PathBuf,
  },

  #[error("failed to invoke shader compiler {compiler}: {source}")]
  Spawn {
    compiler: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{failed} of {total} shader(s) failed to compile")]
  CompilationFailed { failed: usize, total: usize },
}

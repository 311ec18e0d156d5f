//! Shader discovery and external compiler driving.
//!
//! Walks the shader source tree, derives one output artifact per source, and
//! invokes the external compiler once per file with a bounded worker pool.

mod compile;
mod types;

pub use compile::ShaderCompiler;
pub use types::{CompileFailure, CompileReport, OUTPUT_SUFFIX, SHADER_EXTENSIONS, ShaderArtifact, ShaderError};

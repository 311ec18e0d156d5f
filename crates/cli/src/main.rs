use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vkprep_lib::config::BuildType;

mod cmd;
mod output;

/// vkprep - build preparation pipeline for the lantern application
#[derive(Parser)]
#[command(name = "vkprep")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the full preparation pipeline
  Prepare {
    /// Build type to prepare for
    #[arg(short, long, default_value = "release")]
    build_type: BuildType,

    /// Directory holding the generator and resolver artifacts
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Root of the shader source tree
    #[arg(long, default_value = "shaders")]
    shader_dir: PathBuf,

    /// Preset document path (default: <build-dir>/CMakePresets.json)
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Resolver output path (default: <build-dir>/resolved.json)
    #[arg(long)]
    resolution: Option<PathBuf>,

    /// Compiled shader destination (default: <build-dir>/shaders)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Shell to generate the environment script for (auto-detected if not specified)
    #[arg(long)]
    shell: Option<String>,

    /// Shader compile worker count (default: available parallelism)
    #[arg(short, long)]
    jobs: Option<usize>,
  },

  /// Write the runtime environment script
  Env {
    /// Build type to emit the environment for
    #[arg(short, long, default_value = "release")]
    build_type: BuildType,

    /// Directory the script is written into
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Shell to generate the script for (auto-detected if not specified)
    #[arg(long)]
    shell: Option<String>,

    /// Print the script content instead of writing it
    #[arg(long)]
    print: bool,
  },

  /// Patch the generated preset document with computed values
  Presets {
    /// Build type the patch is computed for
    #[arg(short, long, default_value = "release")]
    build_type: BuildType,

    /// Directory holding the generator and resolver artifacts
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Preset document path (default: <build-dir>/CMakePresets.json)
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Resolver output path (default: <build-dir>/resolved.json)
    #[arg(long)]
    resolution: Option<PathBuf>,
  },

  /// Compile the shader source tree
  Shaders {
    /// Directory holding the resolver artifacts
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Root of the shader source tree
    #[arg(long, default_value = "shaders")]
    source_dir: PathBuf,

    /// Compiled shader destination (default: <build-dir>/shaders)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Shader compiler binary (default: resolved glslc)
    #[arg(long)]
    compiler: Option<PathBuf>,

    /// Worker count (default: available parallelism)
    #[arg(short, long)]
    jobs: Option<usize>,
  },

  /// Show the resolved build configuration
  Info {
    /// Build type to resolve
    #[arg(short, long, default_value = "release")]
    build_type: BuildType,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Initialize logging
  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();

  match cli.command {
    Commands::Prepare {
      build_type,
      build_dir,
      shader_dir,
      presets,
      resolution,
      output_dir,
      shell,
      jobs,
    } => cmd::cmd_prepare(
      build_type,
      build_dir,
      shader_dir,
      presets,
      resolution,
      output_dir,
      shell.as_deref(),
      jobs,
    ),
    Commands::Env {
      build_type,
      build_dir,
      shell,
      print,
    } => cmd::cmd_env(build_type, &build_dir, shell.as_deref(), print),
    Commands::Presets {
      build_type,
      build_dir,
      presets,
      resolution,
    } => cmd::cmd_presets(build_type, &build_dir, presets, resolution),
    Commands::Shaders {
      build_dir,
      source_dir,
      output_dir,
      compiler,
      jobs,
    } => cmd::cmd_shaders(&build_dir, source_dir, output_dir, compiler, jobs),
    Commands::Info { build_type, json } => cmd::cmd_info(build_type, json),
  }
}

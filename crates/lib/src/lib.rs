//! vkprep-lib: Core logic for the lantern build preparation pipeline
//!
//! This crate provides the building blocks of the pipeline:
//! - `config`: build-type-conditional definitions and package requirements
//! - `resolve`: resolved dependency paths from the external package resolver
//! - `env`: runtime environment synthesis and script emission
//! - `preset`: the generated CMake preset document and its patching
//! - `shader`: shader discovery and external compiler driving
//! - `pipeline`: sequential orchestration of the above

pub mod config;
pub mod env;
pub mod pipeline;
pub mod preset;
pub mod resolve;
pub mod shader;

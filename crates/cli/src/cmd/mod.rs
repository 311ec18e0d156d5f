mod env;
mod info;
mod prepare;
mod presets;
mod shaders;

pub use env::cmd_env;
pub use info::cmd_info;
pub use prepare::cmd_prepare;
pub use presets::cmd_presets;
pub use shaders::cmd_shaders;

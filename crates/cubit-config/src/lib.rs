//! Configuration for cubit.
//!
//! Settings persist to disk as `config.ron`. Every section falls back to
//! defaults when missing, CLI flags override loaded values, and a reload
//! reports whether the file actually changed.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, OverlayConfig, SidePreset, SyncConfig, WorldConfig,
    default_config_dir,
};
pub use error::ConfigError;

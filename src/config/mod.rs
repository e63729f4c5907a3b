#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, OutputFormat};
pub use toml_config::{LogFormat, ReportConfig};

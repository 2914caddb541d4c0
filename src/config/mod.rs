pub mod app_config;
#[cfg(feature = "cli")]
pub mod cli;

pub use app_config::{AppConfig, BrowserConfig, ConverterConfig, PaperSize};
#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ChromiumRenderer, HttpFetcher, WkhtmltopdfRenderer};
pub use config::AppConfig;
pub use core::pipeline::CauseListPipeline;
pub use domain::model::{FetchResult, RenderOutcome, RenderPath, RequestContext};
pub use utils::error::{CauseListError, Result};

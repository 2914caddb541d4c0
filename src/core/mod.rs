pub mod output;
pub mod pipeline;

pub use crate::domain::model::{FetchResult, RenderOutcome, RenderPath, RequestContext};
pub use crate::domain::ports::{HtmlRenderer, PageFetcher, UrlRenderer};
pub use crate::utils::error::Result;

use crate::domain::model::FetchResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Best-effort warm-up request. Must never fail the run.
    async fn prime(&self);
    async fn fetch(&self, url: &str) -> Result<FetchResult>;
}

/// Renders already-downloaded HTML to a PDF file.
#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    async fn render_html(&self, html: &str, out_path: &Path) -> Result<()>;
}

/// Loads a URL itself and renders whatever ends up on the page.
#[async_trait]
pub trait UrlRenderer: Send + Sync {
    async fn render_url(&self, url: &str, out_path: &Path) -> Result<()>;
}

use crate::core::output::ensure_parent_dir;
use crate::core::{
    HtmlRenderer, PageFetcher, RenderOutcome, RenderPath, RequestContext, Result, UrlRenderer,
};

/// Fetch, then render with the primary converter, falling back to the
/// headless browser once.
///
/// * non-200 fetch: fallback only; its error ends the run.
/// * 200 fetch: primary, and on failure the fallback with the original URL.
/// * fetch error: returned as-is, nothing is rendered.
pub struct CauseListPipeline<F, P, B>
where
    F: PageFetcher,
    P: HtmlRenderer,
    B: UrlRenderer,
{
    fetcher: F,
    primary: P,
    fallback: B,
    skip_primary: bool,
}

impl<F, P, B> CauseListPipeline<F, P, B>
where
    F: PageFetcher,
    P: HtmlRenderer,
    B: UrlRenderer,
{
    pub fn new(fetcher: F, primary: P, fallback: B) -> Self {
        Self {
            fetcher,
            primary,
            fallback,
            skip_primary: false,
        }
    }

    /// Render straight from the URL with the headless browser, without fetching first.
    pub fn with_skip_primary(mut self, skip_primary: bool) -> Self {
        self.skip_primary = skip_primary;
        self
    }

    pub async fn run(&self, ctx: &RequestContext) -> Result<RenderOutcome> {
        if self.skip_primary {
            tracing::info!("Primary renderer disabled; using headless browser");
            return self.render_fallback(ctx).await;
        }

        tracing::info!("Fetching page...");
        self.fetcher.prime().await;
        let fetched = self.fetcher.fetch(&ctx.url).await?;

        if let Err(status_err) = fetched.error_for_status(&ctx.url) {
            tracing::warn!("{}; will try headless browser fallback", status_err);
            return self.render_fallback(ctx).await.inspect_err(|e| {
                tracing::error!("Headless browser fallback failed: {}", e);
            });
        }

        match self.render_primary(&fetched.body, ctx).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!("wkhtmltopdf failed: {}; trying headless browser...", e);
                self.render_fallback(ctx).await
            }
        }
    }

    async fn render_primary(&self, html: &str, ctx: &RequestContext) -> Result<RenderOutcome> {
        ensure_parent_dir(&ctx.out_path)?;
        self.primary.render_html(html, &ctx.out_path).await?;
        tracing::info!("Saved PDF to: {}", ctx.out_path.display());
        Ok(RenderOutcome {
            path: ctx.out_path.clone(),
            via: RenderPath::Primary,
        })
    }

    async fn render_fallback(&self, ctx: &RequestContext) -> Result<RenderOutcome> {
        ensure_parent_dir(&ctx.out_path)?;
        self.fallback.render_url(&ctx.url, &ctx.out_path).await?;
        tracing::info!("Saved PDF via headless browser to: {}", ctx.out_path.display());
        Ok(RenderOutcome {
            path: ctx.out_path.clone(),
            via: RenderPath::Fallback,
        })
    }
}

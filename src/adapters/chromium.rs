//! Fallback renderer: loads the page in headless Chromium and prints it to PDF.

use crate::config::BrowserConfig;
use crate::domain::ports::UrlRenderer;
use crate::utils::error::{CauseListError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::network::{LoaderId, SetUserAgentOverrideParams};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, FrameId, NavigateParams, PrintToPdfParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Find a Chrome/Chromium binary. `None` leaves detection to chromiumoxide.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    // 1. --chrome / config
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Configured browser {} does not exist", path.display());
    }

    // 2. CHROME env
    if let Ok(p) = std::env::var("CHROME") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common install locations
    let common: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"]
    } else {
        &[]
    };
    common.iter().map(PathBuf::from).find(|p| p.exists())
}

pub struct ChromiumRenderer {
    config: BrowserConfig,
}

impl ChromiumRenderer {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn print_params(&self) -> PrintToPdfParams {
        let (width, height) = self.config.paper.inches();
        PrintToPdfParams {
            paper_width: Some(width),
            paper_height: Some(height),
            print_background: Some(self.config.print_background),
            ..Default::default()
        }
    }

    async fn render_in(&self, session: &BrowserSession, url: &str, out_path: &Path) -> Result<()> {
        let page = session
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CauseListError::browser_render(format!("failed to open page: {e}")))?;

        let result = self.print_page(&page, url, out_path).await;
        let _ = page.close().await;
        result
    }

    async fn print_page(&self, page: &Page, url: &str, out_path: &Path) -> Result<()> {
        page.set_user_agent(SetUserAgentOverrideParams::new(
            self.config.user_agent.clone(),
        ))
        .await
        .map_err(|e| CauseListError::browser_render(format!("failed to set user agent: {e}")))?;

        let timeout_ms = self.config.navigation_timeout_ms;
        match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            navigate_until_network_idle(page, url),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(CauseListError::browser_render(format!(
                    "navigation to {url} timed out after {timeout_ms}ms"
                )))
            }
        }

        // Give late scripts a moment to finish drawing the list.
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let pdf = page
            .pdf(self.print_params())
            .await
            .map_err(|e| CauseListError::browser_render(format!("print to PDF failed: {e}")))?;
        tracing::debug!("Headless browser produced {} bytes", pdf.len());

        tokio::fs::write(out_path, &pdf).await?;
        Ok(())
    }
}

/// Navigate and wait for the main frame's `networkIdle` lifecycle event.
async fn navigate_until_network_idle(page: &Page, url: &str) -> Result<()> {
    let nav_err = |e: chromiumoxide::error::CdpError| {
        CauseListError::browser_render(format!("navigation to {url} failed: {e}"))
    };

    // Subscribe first so an idle that fires right after the load is not missed.
    let mut lifecycle = page
        .event_listener::<EventLifecycleEvent>()
        .await
        .map_err(nav_err)?;

    let navigated = page
        .execute(NavigateParams::new(url))
        .await
        .map_err(nav_err)?
        .result;
    if let Some(error_text) = navigated.error_text {
        return Err(CauseListError::browser_render(format!(
            "navigation to {url} failed: {error_text}"
        )));
    }

    while let Some(event) = lifecycle.next().await {
        if is_network_idle(
            &event.name,
            &event.frame_id,
            &event.loader_id,
            &navigated.frame_id,
            navigated.loader_id.as_ref(),
        ) {
            return Ok(());
        }
    }
    Err(CauseListError::browser_render(format!(
        "page closed while loading {url}"
    )))
}

/// Same-document navigations have no loader id, so any idle on the frame counts.
fn is_network_idle(
    name: &str,
    frame_id: &FrameId,
    loader_id: &LoaderId,
    target_frame: &FrameId,
    target_loader: Option<&LoaderId>,
) -> bool {
    name == "networkIdle"
        && frame_id == target_frame
        && target_loader.map_or(true, |expected| expected == loader_id)
}

#[async_trait]
impl UrlRenderer for ChromiumRenderer {
    async fn render_url(&self, url: &str, out_path: &Path) -> Result<()> {
        let session = BrowserSession::launch(&self.config).await?;
        let result = self.render_in(&session, url, out_path).await;
        session.close().await;
        result
    }
}

/// A running headless browser plus the task pumping its CDP events.
/// `close` is the normal release path; `Drop` covers unwinding.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = LaunchConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        if let Some(path) = find_chromium(config.executable.as_deref()) {
            tracing::debug!("Using browser at {}", path.display());
            builder = builder.chrome_executable(path);
        }

        let launch_config = builder
            .build()
            .map_err(|message| CauseListError::BrowserUnavailable { message })?;

        let (browser, mut handler) =
            Browser::launch(launch_config)
                .await
                .map_err(|e| CauseListError::BrowserUnavailable {
                    message: format!("failed to launch Chromium: {e}"),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self { browser, handler })
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process.
        self.handler.abort();
    }
}

use std::fmt;
use std::path::PathBuf;

use crate::utils::error::{CauseListError, Result};

/// The page being saved and where it goes. Request headers live in
/// `AppConfig` and are baked into the fetcher's client.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub url: String,
    pub out_path: PathBuf,
}

impl RequestContext {
    pub fn new(url: impl Into<String>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            out_path: out_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: u16,
    pub body: String,
}

impl FetchResult {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Anything but a plain 200 counts as a failed fetch, including other 2xx codes.
    pub fn error_for_status(&self, url: &str) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(CauseListError::HttpStatusError {
                status: self.status,
                url: url.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    Primary,
    Fallback,
}

impl fmt::Display for RenderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderPath::Primary => write!(f, "wkhtmltopdf"),
            RenderPath::Fallback => write!(f, "headless browser"),
        }
    }
}

/// A PDF that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub via: RenderPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_path_names_the_renderer() {
        assert_eq!(RenderPath::Primary.to_string(), "wkhtmltopdf");
        assert_eq!(RenderPath::Fallback.to_string(), "headless browser");
    }

    #[test]
    fn test_only_200_is_ok() {
        let ok = FetchResult {
            status: 200,
            body: "<html></html>".to_string(),
        };
        assert!(ok.is_ok());
        assert!(ok.error_for_status("https://example.com").is_ok());

        let no_content = FetchResult {
            status: 204,
            body: String::new(),
        };
        assert!(!no_content.is_ok());

        let unavailable = FetchResult {
            status: 503,
            body: String::new(),
        };
        let err = unavailable.error_for_status("https://example.com").unwrap_err();
        assert!(matches!(
            err,
            CauseListError::HttpStatusError { status: 503, .. }
        ));
    }
}

use crate::utils::error::{CauseListError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CAUSE_LIST_URL: &str =
    "https://services.ecourts.gov.in/ecourtindia_v6/?p=caselist/index/";

pub const DEFAULT_SITE_ROOT: &str = "https://services.ecourts.gov.in/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Knobs for every stage of a run. Everything has a default, so a TOML file
/// only needs the keys it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Hit once before the real request so the server can hand out cookies.
    pub site_root: String,
    pub headers: BTreeMap<String, String>,
    pub prime_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub converter: ConverterConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Set by `--wkhtmltopdf`; tried before the candidates.
    pub executable: Option<PathBuf>,
    /// Name looked up on PATH when no candidate exists.
    pub binary: String,
    /// Checked in order before PATH lookup.
    pub candidates: Vec<PathBuf>,
    pub javascript_delay_ms: u64,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub user_agent: String,
    pub executable: Option<PathBuf>,
    pub navigation_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub paper: PaperSize,
    pub print_background: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    Letter,
    Legal,
}

impl PaperSize {
    /// Width and height in inches, the unit the DevTools print call expects.
    pub fn inches(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (8.27, 11.69),
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        );
        headers.insert("Accept-Language".to_string(), "en-US,en;q=0.9".to_string());
        headers.insert("Referer".to_string(), DEFAULT_SITE_ROOT.to_string());

        Self {
            site_root: DEFAULT_SITE_ROOT.to_string(),
            headers,
            prime_timeout_secs: 10,
            fetch_timeout_secs: 20,
            converter: ConverterConfig::default(),
            browser: BrowserConfig::default(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            executable: None,
            binary: "wkhtmltopdf".to_string(),
            candidates: vec![
                PathBuf::from(r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe"),
                PathBuf::from(r"C:\Program Files (x86)\wkhtmltopdf\bin\wkhtmltopdf.exe"),
            ],
            javascript_delay_ms: 2000,
            extra_args: Vec::new(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            executable: None,
            navigation_timeout_ms: 30_000,
            settle_delay_ms: 1_500,
            paper: PaperSize::A4,
            print_background: false,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CauseListError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn prime_timeout(&self) -> Duration {
        Duration::from_secs(self.prime_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("site_root", &self.site_root)?;
        validate_positive_number("prime_timeout_secs", self.prime_timeout_secs, 1)?;
        validate_positive_number("fetch_timeout_secs", self.fetch_timeout_secs, 1)?;
        validate_non_empty_string("converter.binary", &self.converter.binary)?;
        validate_non_empty_string("browser.user_agent", &self.browser.user_agent)?;
        validate_positive_number(
            "browser.navigation_timeout_ms",
            self.browser.navigation_timeout_ms,
            1,
        )?;
        if let Some(executable) = &self.converter.executable {
            validate_path("converter.executable", executable)?;
        }
        if let Some(executable) = &self.browser.executable {
            validate_path("browser.executable", executable)?;
        }
        for name in self.headers.keys() {
            validate_non_empty_string("headers", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_expectations() {
        let config = AppConfig::default();
        assert_eq!(config.site_root, "https://services.ecourts.gov.in/");
        assert_eq!(config.prime_timeout(), Duration::from_secs(10));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
        assert_eq!(
            config.headers.get("Referer").map(String::as_str),
            Some("https://services.ecourts.gov.in/")
        );
        assert!(config.headers["User-Agent"].contains("Chrome/116.0.0.0"));
        assert_eq!(config.converter.javascript_delay_ms, 2000);
        assert_eq!(config.converter.candidates.len(), 2);
        assert_eq!(config.browser.navigation_timeout_ms, 30_000);
        assert_eq!(config.browser.settle_delay_ms, 1_500);
        assert_eq!(config.browser.paper, PaperSize::A4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
site_root = "http://localhost:8080/"
fetch_timeout_secs = 5

[headers]
"User-Agent" = "test-agent"

[browser]
paper = "letter"
"#,
        )
        .unwrap();

        assert_eq!(config.site_root, "http://localhost:8080/");
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.prime_timeout_secs, 10);
        // A [headers] table replaces the whole default set.
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.browser.paper, PaperSize::Letter);
        assert_eq!(config.browser.settle_delay_ms, 1_500);
        assert_eq!(config.converter.binary, "wkhtmltopdf");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("fetch_timeout_secs = \"soon\"").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = AppConfig {
            fetch_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            site_root: "ftp://services.ecourts.gov.in/".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_a4_dimensions() {
        assert_eq!(PaperSize::A4.inches(), (8.27, 11.69));
    }
}

use crate::config::app_config::{AppConfig, DEFAULT_CAUSE_LIST_URL};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cause-list-pdf")]
#[command(about = "Download an eCourts cause list as PDF")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_CAUSE_LIST_URL, help = "Cause list URL")]
    pub url: String,

    #[arg(long, help = "Output PDF path [default: data/cause_list_<date>.pdf]")]
    pub out: Option<PathBuf>,

    #[arg(long, help = "TOML file overriding headers, timeouts and renderer settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Explicit wkhtmltopdf binary, tried before the built-in candidates")]
    pub wkhtmltopdf: Option<PathBuf>,

    #[arg(long, help = "Explicit Chrome/Chromium binary for the fallback renderer")]
    pub chrome: Option<PathBuf>,

    #[arg(long, help = "Skip wkhtmltopdf and render with the headless browser")]
    pub skip_primary: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the config file (if any) and layers the command-line overrides on top.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(binary) = &self.wkhtmltopdf {
            config.converter.executable = Some(binary.clone());
        }
        if let Some(chrome) = &self.chrome {
            config.browser.executable = Some(chrome.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("url", &self.url)?;
        if let Some(out) = &self.out {
            validate_path("out", out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cli = CliConfig::parse_from(["cause-list-pdf"]);
        assert_eq!(cli.url, DEFAULT_CAUSE_LIST_URL);
        assert!(cli.out.is_none());
        assert!(!cli.skip_primary);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_overrides_layer_on_config() {
        let cli = CliConfig::parse_from([
            "cause-list-pdf",
            "--url",
            "http://localhost:9000/list",
            "--out",
            "/tmp/list.pdf",
            "--wkhtmltopdf",
            "/opt/wk/bin/wkhtmltopdf",
            "--chrome",
            "/usr/bin/chromium",
        ]);
        assert!(cli.validate().is_ok());

        let config = cli.app_config().unwrap();
        assert_eq!(
            config.converter.executable,
            Some(PathBuf::from("/opt/wk/bin/wkhtmltopdf"))
        );
        assert_eq!(config.converter.candidates.len(), 2);
        assert_eq!(
            config.browser.executable,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
    }

    #[test]
    fn test_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prime_timeout_secs = 3").unwrap();

        let cli = CliConfig::parse_from([
            "cause-list-pdf",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        let config = cli.app_config().unwrap();
        assert_eq!(config.prime_timeout_secs, 3);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let cli = CliConfig::parse_from(["cause-list-pdf", "--url", "file:///etc/passwd"]);
        assert!(cli.validate().is_err());
    }
}

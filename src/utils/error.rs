use thiserror::Error;

#[derive(Error, Debug)]
pub enum CauseListError {
    #[error("HTTP request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("wkhtmltopdf not found (looked for {searched})")]
    ConverterNotFound { searched: String },

    #[error("wkhtmltopdf conversion failed: {message}")]
    ConversionError { message: String },

    #[error("Headless browser unavailable: {message}")]
    BrowserUnavailable { message: String },

    #[error("Headless browser rendering failed: {message}")]
    BrowserRenderError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl CauseListError {
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::ConversionError {
            message: message.into(),
        }
    }

    pub fn browser_render(message: impl Into<String>) -> Self {
        Self::BrowserRenderError {
            message: message.into(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. }
        )
    }

    /// Process exit code for this failure. Usage problems get 2, everything
    /// that happens after the run started gets 1.
    pub fn exit_code(&self) -> i32 {
        if self.is_config_error() {
            2
        } else {
            1
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FetchError(e) if e.is_timeout() => {
                "The cause list server did not answer in time".to_string()
            }
            Self::FetchError(e) if e.is_connect() => {
                "Could not connect to the cause list server".to_string()
            }
            Self::FetchError(_) => "Downloading the cause list page failed".to_string(),
            Self::HttpStatusError { status, .. } => {
                format!("The cause list server answered with HTTP {}", status)
            }
            Self::ConverterNotFound { .. } => {
                "wkhtmltopdf is not installed; install it or pass --wkhtmltopdf".to_string()
            }
            Self::ConversionError { .. } => "wkhtmltopdf could not convert the page".to_string(),
            Self::BrowserUnavailable { .. } => {
                "No headless Chrome/Chromium found; install one or pass --chrome".to_string()
            }
            Self::BrowserRenderError { .. } => {
                "The headless browser could not render the page to PDF".to_string()
            }
            Self::IoError(e) => format!("File system error: {}", e),
            Self::ConfigError { message } => format!("Bad configuration: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Bad value for {}: {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CauseListError>;

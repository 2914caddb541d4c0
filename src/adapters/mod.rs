// Adapters layer: concrete implementations of the domain ports.

pub mod chromium;
pub mod http;
pub mod wkhtmltopdf;

pub use chromium::ChromiumRenderer;
pub use http::HttpFetcher;
pub use wkhtmltopdf::WkhtmltopdfRenderer;

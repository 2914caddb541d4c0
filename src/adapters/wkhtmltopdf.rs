//! Primary renderer: pipes the fetched HTML through `wkhtmltopdf`.

use crate::config::ConverterConfig;
use crate::domain::ports::HtmlRenderer;
use crate::utils::error::{CauseListError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub struct WkhtmltopdfRenderer {
    config: ConverterConfig,
}

impl WkhtmltopdfRenderer {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Explicit binary, then the first existing candidate, then a PATH lookup
    /// of the configured binary name.
    pub fn locate_binary(&self) -> Result<PathBuf> {
        if let Some(explicit) = &self.config.executable {
            if explicit.is_file() {
                tracing::debug!("Using wkhtmltopdf at {}", explicit.display());
                return Ok(explicit.clone());
            }
            tracing::warn!("Configured wkhtmltopdf {} does not exist", explicit.display());
        }

        if let Some(found) = self.config.candidates.iter().find(|p| p.is_file()) {
            tracing::debug!("Using wkhtmltopdf at {}", found.display());
            return Ok(found.clone());
        }

        which::which(&self.config.binary).map_err(|_| {
            let mut searched: Vec<String> = self
                .config
                .candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            searched.push(format!("{} on PATH", self.config.binary));
            CauseListError::ConverterNotFound {
                searched: searched.join(", "),
            }
        })
    }

    pub fn build_args(&self, out_path: &Path) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--enable-local-file-access".to_string(),
            "--no-stop-slow-scripts".to_string(),
            "--javascript-delay".to_string(),
            self.config.javascript_delay_ms.to_string(),
            "--load-error-handling".to_string(),
            "ignore".to_string(),
        ];
        args.extend(self.config.extra_args.iter().cloned());
        // HTML on stdin, PDF to the output path.
        args.push("-".to_string());
        args.push(out_path.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl HtmlRenderer for WkhtmltopdfRenderer {
    async fn render_html(&self, html: &str, out_path: &Path) -> Result<()> {
        let binary = self.locate_binary()?;
        let args = self.build_args(out_path);

        // A PDF left over from an earlier run must not pass the output check.
        match tokio::fs::remove_file(out_path).await {
            Ok(()) => tracing::debug!("Removed stale {}", out_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!("Running {} {}", binary.display(), args.join(" "));

        let mut child = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CauseListError::conversion(format!("could not start {}: {}", binary.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|e| CauseListError::conversion(format!("writing HTML to stdin: {}", e)))?;
            // Closing stdin tells wkhtmltopdf the document is complete.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CauseListError::conversion(format!("waiting for wkhtmltopdf: {}", e)))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        check_conversion(output.status.code(), &stderr, out_path).await
    }
}

async fn check_conversion(exit_code: Option<i32>, stderr: &str, out_path: &Path) -> Result<()> {
    if stderr.contains("cannot connect to X server") {
        return Err(CauseListError::conversion(format!(
            "wkhtmltopdf needs an X server: {}",
            stderr.trim()
        )));
    }
    if stderr.contains("Error") {
        return Err(CauseListError::conversion(stderr.trim().to_string()));
    }
    match exit_code {
        Some(0) => {}
        Some(code) => {
            return Err(CauseListError::conversion(format!(
                "exit code {}: {}",
                code,
                stderr.trim()
            )))
        }
        None => return Err(CauseListError::conversion("terminated by signal")),
    }

    match tokio::fs::metadata(out_path).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(CauseListError::conversion(format!(
            "no output written to {}",
            out_path.display()
        ))),
    }
}

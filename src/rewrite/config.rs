use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;

/// Where and how to reach the rewriting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Full URL the rewrite request is POSTed to
    pub endpoint: Url,
    /// Whole-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl RewriteConfig {
    /// Parse `endpoint` into an http(s) URL; surrounding whitespace is ignored
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        let raw = endpoint.as_ref();
        let endpoint = Url::parse(raw.trim())
            .with_context(|| format!("Invalid rewrite endpoint {raw:?}"))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!("Rewrite endpoint must be an http(s) URL: {:?}", raw);
        }
        if endpoint.host_str().map_or(true, str::is_empty) {
            anyhow::bail!("Rewrite endpoint has no host: {:?}", raw);
        }

        Ok(Self {
            endpoint,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout == Some(Duration::ZERO) {
            anyhow::bail!("Rewrite timeout must be greater than zero");
        }
        Ok(())
    }
}

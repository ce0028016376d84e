// WHY: HTTP rewriting service client; one POST per rewrite, no retries
// Response payloads are decoded into a typed schema before anything reaches the caller

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{RewriteConfig, RewriteError, RewriteRequest, Rewriter};

/// Request body; the directive travels as `newPrefix`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    original_sentence: &'a str,
    new_prefix: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    rewritten_sentence: String,
}

/// [`Rewriter`] backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpRewriter {
    config: RewriteConfig,
    client: Client,
}

impl HttpRewriter {
    pub fn new(config: RewriteConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }
}

#[async_trait]
impl Rewriter for HttpRewriter {
    async fn request_rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError> {
        let body = WireRequest {
            original_sentence: &request.original_sentence,
            new_prefix: &request.directive,
        };

        info!(endpoint = %self.config.endpoint, "Requesting sentence rewrite");

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            warn!(%status, "Rewrite service returned an error status");
            return Err(RewriteError::Network(format!(
                "Rewrite service error {}: {}",
                status, payload
            )));
        }

        let rewritten = decode_response(&payload)?;
        debug!(chars = rewritten.chars().count(), "Received rewritten sentence");
        Ok(rewritten)
    }
}

/// Decode a response body, separating unparseable payloads from schema mismatches
pub(crate) fn decode_response(payload: &str) -> Result<String, RewriteError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| RewriteError::Network(format!("Unparseable response body: {e}")))?;

    if !value.is_object() {
        return Err(RewriteError::MalformedResponse(format!(
            "Expected a JSON object, got {value}"
        )));
    }

    let response: WireResponse = serde_json::from_value(value)
        .map_err(|e| RewriteError::MalformedResponse(e.to_string()))?;

    Ok(response.rewritten_sentence)
}

// WHY: Rewrite orchestration seam; the session depends on the trait, the CLI on the HTTP client

use async_trait::async_trait;

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpRewriter;
pub use config::RewriteConfig;
pub use error::RewriteError;

/// A sentence to rewrite and the directive saying how it should begin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub original_sentence: String,
    pub directive: String,
}

impl RewriteRequest {
    pub fn new(original_sentence: impl Into<String>, directive: impl Into<String>) -> Self {
        Self {
            original_sentence: original_sentence.into(),
            directive: directive.into(),
        }
    }
}

/// External rewriting service
///
/// Implementations issue exactly one round trip per call, never retry, and
/// return the replacement sentence verbatim.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn request_rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError>;
}

#[async_trait]
impl<R: Rewriter + ?Sized> Rewriter for std::sync::Arc<R> {
    async fn request_rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError> {
        (**self).request_rewrite(request).await
    }
}

// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use recast::{segment, span_of_sentence_at_cursor, RewriteError, RewriteRequest, Rewriter};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Sentences of `text` under the default rules
pub fn sentences_of(text: &str) -> Vec<String> {
    segment(text)
        .iter()
        .map(|span| span.slice(text).expect("span fits text").to_string())
        .collect()
}

/// Text of the sentence selected for `cursor`
pub fn selected_text(text: &str, cursor: usize) -> Option<&str> {
    span_of_sentence_at_cursor(text, cursor).map(|span| span.slice(text).expect("span fits text"))
}

/// Rewriter answering every request with a fixed result and recording the requests
pub struct RecordingRewriter {
    reply: Result<String, RewriteError>,
    pub requests: Mutex<Vec<RewriteRequest>>,
}

impl RecordingRewriter {
    pub fn replying(reply: Result<String, RewriteError>) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

#[async_trait]
impl Rewriter for RecordingRewriter {
    async fn request_rewrite(&self, request: &RewriteRequest) -> Result<String, RewriteError> {
        self.requests.lock().expect("requests lock").push(request.clone());
        self.reply.clone()
    }
}

/// Rewriter that blocks until released, for observing the in-flight state
pub struct GatedRewriter {
    pub started: Notify,
    pub release: Notify,
    reply: String,
}

impl GatedRewriter {
    pub fn new(reply: &str) -> Self {
        Self {
            started: Notify::new(),
            release: Notify::new(),
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl Rewriter for GatedRewriter {
    async fn request_rewrite(&self, _request: &RewriteRequest) -> Result<String, RewriteError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

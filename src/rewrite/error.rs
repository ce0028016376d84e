use thiserror::Error;

/// Failures surfaced by a rewrite round trip; the text buffer is never touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The request could not be delivered, or no readable JSON came back
    #[error("Rewrite service unreachable: {0}")]
    Network(String),

    /// The response was JSON but lacked a string `rewrittenSentence`
    #[error("Malformed rewrite response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for RewriteError {
    fn from(error: reqwest::Error) -> Self {
        RewriteError::Network(error.to_string())
    }
}

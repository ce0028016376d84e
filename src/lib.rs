pub mod resolver;
pub mod rewrite;
pub mod segmenter;
pub mod session;
pub mod span;

// Re-export main types for convenient access
pub use span::{char_len, splice, TextSpan};

pub use segmenter::{
    default_segmenter, segment, RuleSegmenter, SegmentationRules, Segmenter,
};

pub use resolver::{resolve_span_at_cursor, span_of_sentence_at_cursor, SentenceSelector};

pub use rewrite::{HttpRewriter, RewriteConfig, RewriteError, RewriteRequest, Rewriter};

pub use session::{
    Abort, Completion, DiscardReason, Dispatched, EditorSession, EditorSnapshot, RewriteTicket,
    SessionState, SharedSession, Signal,
};

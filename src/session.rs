// WHY: Host-side state machine around selection and rewriting
// The session owns only its state; the host threads buffer text, cursor and selection in per call

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::resolver::SentenceSelector;
use crate::rewrite::{RewriteError, RewriteRequest, Rewriter};
use crate::segmenter::{self, RuleSegmenter, Segmenter};
use crate::span::{char_len, splice, TextSpan};

/// What the host surface currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSnapshot<'a> {
    pub text: &'a str,
    pub cursor: usize,
    /// Current on-screen selection, if any
    pub selection: Option<TextSpan>,
}

impl<'a> EditorSnapshot<'a> {
    pub fn new(text: &'a str, cursor: usize) -> Self {
        Self {
            text,
            cursor,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: TextSpan) -> Self {
        self.selection = Some(selection);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    SentenceSelected {
        span: TextSpan,
    },
    AwaitingDirective {
        span: TextSpan,
        original_sentence: String,
        text_fingerprint: u64,
    },
    RewriteInFlight {
        ticket_id: u64,
    },
}

/// Discrete input signals from the host surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    SelectSentence,
    /// Initiate a rewrite of the selected sentence and supply its directive at once
    RewriteSentence { directive: Option<String> },
}

/// Reasons a signal was not acted upon; none of these touch the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// The text holds no sentence
    NoSentenceFound,
    /// The selection is not the span the resolver computes for the cursor
    SelectionMismatch,
    /// No directive, or only whitespace
    EmptyDirective,
    /// A rewrite is already in flight; the signal was ignored
    RewriteInFlight,
    /// The session was closed
    SessionClosed,
}

/// Outcome of a handled signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Selected(TextSpan),
    RewriteStarted(RewriteTicket),
}

/// Handle for one in-flight rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteTicket {
    session_id: u64,
    id: u64,
    span: TextSpan,
    request: RewriteRequest,
    text_fingerprint: u64,
}

impl RewriteTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Span of the sentence being rewritten in the text the rewrite started from
    pub fn span(&self) -> TextSpan {
        self.span
    }

    pub fn request(&self) -> &RewriteRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    SessionClosed,
    /// The ticket is not the rewrite currently in flight
    StaleTicket,
    /// The buffer changed while the request was in flight
    BufferChanged,
}

/// Result of finishing a rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// New buffer text, and the span the replacement occupies in it
    Applied { text: String, span: TextSpan },
    /// The rewrite failed; the buffer must stay as it was
    Failed(RewriteError),
    /// The result no longer applies and was dropped
    Discarded(DiscardReason),
}

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

fn fingerprint(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Selection and rewrite state for one editing surface
#[derive(Debug)]
pub struct EditorSession<S = &'static RuleSegmenter> {
    selector: SentenceSelector<S>,
    state: SessionState,
    /// Process-unique; tickets only complete on the session that issued them
    id: u64,
    next_ticket_id: u64,
    closed: bool,
}

impl EditorSession {
    /// Session using the default segmentation rules
    pub fn new() -> Self {
        Self::with_segmenter(segmenter::default_segmenter())
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Segmenter> EditorSession<S> {
    pub fn with_segmenter(segmenter: S) -> Self {
        Self {
            selector: SentenceSelector::new(segmenter),
            state: SessionState::Idle,
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            next_ticket_id: 1,
            closed: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_accepting(&self) -> Result<(), Abort> {
        if self.closed {
            return Err(Abort::SessionClosed);
        }
        if matches!(self.state, SessionState::RewriteInFlight { .. }) {
            debug!("Ignoring signal while a rewrite is in flight");
            return Err(Abort::RewriteInFlight);
        }
        Ok(())
    }

    fn abort(&mut self, reason: Abort) -> Abort {
        debug!(?reason, "Returning session to idle");
        self.state = SessionState::Idle;
        reason
    }

    /// Idle -> SentenceSelected: resolve the span at the cursor for the host to select
    pub fn select_sentence(&mut self, snapshot: EditorSnapshot<'_>) -> Result<TextSpan, Abort> {
        self.check_accepting()?;

        match self.selector.span_at_cursor(snapshot.text, snapshot.cursor) {
            Some(span) => {
                debug!(cursor = snapshot.cursor, ?span, "Sentence selected");
                self.state = SessionState::SentenceSelected { span };
                Ok(span)
            }
            None => Err(self.abort(Abort::NoSentenceFound)),
        }
    }

    /// SentenceSelected -> AwaitingDirective, after checking the selection is still intact
    pub fn initiate_rewrite(&mut self, snapshot: EditorSnapshot<'_>) -> Result<TextSpan, Abort> {
        self.check_accepting()?;

        let selected = match &self.state {
            SessionState::SentenceSelected { span } | SessionState::AwaitingDirective { span, .. } => *span,
            _ => return Err(self.abort(Abort::SelectionMismatch)),
        };

        let Some(expected) = self.selector.span_at_cursor(snapshot.text, snapshot.cursor) else {
            return Err(self.abort(Abort::NoSentenceFound));
        };

        // WHY: A manually altered selection means the user no longer targets the sentence
        if snapshot.selection != Some(expected) || selected != expected {
            return Err(self.abort(Abort::SelectionMismatch));
        }

        let Some(original_sentence) = expected.slice(snapshot.text) else {
            return Err(self.abort(Abort::SelectionMismatch));
        };

        self.state = SessionState::AwaitingDirective {
            span: expected,
            original_sentence: original_sentence.to_string(),
            text_fingerprint: fingerprint(snapshot.text),
        };
        Ok(expected)
    }

    /// AwaitingDirective -> RewriteInFlight once a non-empty directive arrives
    pub fn supply_directive(&mut self, directive: Option<&str>) -> Result<RewriteTicket, Abort> {
        self.check_accepting()?;

        let SessionState::AwaitingDirective {
            span,
            original_sentence,
            text_fingerprint,
        } = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return Err(self.abort(Abort::SelectionMismatch));
        };

        let directive = match directive {
            Some(directive) if !directive.trim().is_empty() => directive,
            _ => return Err(self.abort(Abort::EmptyDirective)),
        };

        let id = self.next_ticket_id;
        self.next_ticket_id += 1;
        self.state = SessionState::RewriteInFlight { ticket_id: id };

        info!(ticket = id, ?span, "Rewrite in flight");
        Ok(RewriteTicket {
            session_id: self.id,
            id,
            span,
            request: RewriteRequest::new(original_sentence, directive),
            text_fingerprint,
        })
    }

    /// RewriteInFlight -> Idle, producing the substituted text on success
    ///
    /// `current_text` is the buffer as it is now; if it differs from the text the
    /// rewrite started from, the result is discarded.
    pub fn complete_rewrite(
        &mut self,
        ticket: &RewriteTicket,
        result: Result<String, RewriteError>,
        current_text: &str,
    ) -> Completion {
        if self.closed {
            debug!(ticket = ticket.id, "Discarding rewrite for closed session");
            return Completion::Discarded(DiscardReason::SessionClosed);
        }
        if ticket.session_id != self.id
            || self.state != (SessionState::RewriteInFlight { ticket_id: ticket.id })
        {
            debug!(ticket = ticket.id, "Discarding stale rewrite ticket");
            return Completion::Discarded(DiscardReason::StaleTicket);
        }
        self.state = SessionState::Idle;

        let replacement = match result {
            Ok(replacement) => replacement,
            Err(error) => {
                warn!(ticket = ticket.id, %error, "Rewrite failed; buffer left unchanged");
                return Completion::Failed(error);
            }
        };

        if fingerprint(current_text) != ticket.text_fingerprint {
            warn!(ticket = ticket.id, "Buffer changed during rewrite; discarding result");
            return Completion::Discarded(DiscardReason::BufferChanged);
        }

        match splice(current_text, ticket.span, &replacement) {
            Some(text) => {
                let span = TextSpan::new(ticket.span.start, ticket.span.start + char_len(&replacement));
                info!(ticket = ticket.id, ?span, "Rewrite applied");
                Completion::Applied { text, span }
            }
            None => Completion::Discarded(DiscardReason::BufferChanged),
        }
    }

    /// Handle one host signal
    pub fn dispatch(&mut self, signal: Signal, snapshot: EditorSnapshot<'_>) -> Result<Dispatched, Abort> {
        match signal {
            Signal::SelectSentence => self.select_sentence(snapshot).map(Dispatched::Selected),
            Signal::RewriteSentence { directive } => {
                self.initiate_rewrite(snapshot)?;
                self.supply_directive(directive.as_deref())
                    .map(Dispatched::RewriteStarted)
            }
        }
    }

    /// Run a whole rewrite round trip for the sentence selected in `snapshot`
    ///
    /// `current_text` is called once the service answers and must return the
    /// buffer as it is then, so edits made during the request are detected.
    pub async fn rewrite_sentence<R, F>(
        &mut self,
        rewriter: &R,
        snapshot: EditorSnapshot<'_>,
        directive: Option<&str>,
        current_text: F,
    ) -> Result<Completion, Abort>
    where
        R: Rewriter + ?Sized,
        F: FnOnce() -> String,
    {
        self.initiate_rewrite(snapshot)?;
        let ticket = self.supply_directive(directive)?;
        let result = rewriter.request_rewrite(ticket.request()).await;
        Ok(self.complete_rewrite(&ticket, result, &current_text()))
    }

    /// Tear the session down; results arriving afterwards are discarded
    pub fn close(&mut self) {
        if !self.closed {
            info!("Closing editor session");
        }
        self.closed = true;
        self.state = SessionState::Idle;
    }
}

/// Session shared between tasks of one editing surface
///
/// The lock is held only for state transitions, never across the network round
/// trip, so a second rewrite signal sees [`Abort::RewriteInFlight`].
#[derive(Debug)]
pub struct SharedSession<S = &'static RuleSegmenter> {
    inner: Arc<Mutex<EditorSession<S>>>,
}

impl<S> Clone for SharedSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Segmenter> SharedSession<S> {
    pub fn new(session: EditorSession<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state().clone()
    }

    pub async fn dispatch(&self, signal: Signal, snapshot: EditorSnapshot<'_>) -> Result<Dispatched, Abort> {
        self.inner.lock().await.dispatch(signal, snapshot)
    }

    pub async fn complete_rewrite(
        &self,
        ticket: &RewriteTicket,
        result: Result<String, RewriteError>,
        current_text: &str,
    ) -> Completion {
        self.inner.lock().await.complete_rewrite(ticket, result, current_text)
    }

    /// Run a rewrite round trip without holding the lock across the request
    ///
    /// `current_text` reads the buffer after the response arrives.
    pub async fn rewrite_sentence<R, F>(
        &self,
        rewriter: &R,
        snapshot: EditorSnapshot<'_>,
        directive: Option<&str>,
        current_text: F,
    ) -> Result<Completion, Abort>
    where
        R: Rewriter + ?Sized,
        F: FnOnce() -> String,
    {
        let ticket = {
            let mut session = self.inner.lock().await;
            session.initiate_rewrite(snapshot)?;
            session.supply_directive(directive)?
        };

        let result = rewriter.request_rewrite(ticket.request()).await;

        let current_text = current_text();
        Ok(self.complete_rewrite(&ticket, result, &current_text).await)
    }

    pub async fn close(&self) {
        self.inner.lock().await.close();
    }
}

//! Request-id guard for asynchronous result sets.
//!
//! Every logical fetch mints a new [`RequestId`] before it starts. A
//! response is only applied when its id is still the live one, so a slow
//! answer to a superseded request can never overwrite newer state. The
//! `Empty` display state is only entered from an authoritative, current,
//! zero-length ready response; while resolving or loading, whatever was
//! shown before stays on screen.

use serde::{Deserialize, Serialize};

/// Opaque monotonic token for one logical fetch
pub type RequestId = u64;

/// Per-instance request id source
#[derive(Debug, Default, Clone)]
pub struct RequestCounter {
    current: RequestId,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id. It becomes the only live id.
    pub fn next(&mut self) -> RequestId {
        self.current += 1;
        self.current
    }

    pub fn current(&self) -> RequestId {
        self.current
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id == self.current
    }
}

/// What the UI should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    Idle,
    Resolving,
    Loading,
    Ready,
    Empty,
    Error,
}

/// Phase a new request starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Input still being resolved (e.g. a URL to a startup)
    Resolve,
    Load,
}

/// Response delivered for a request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Upstream is still working; not authoritative
    Pending,
    /// Authoritative result
    Ready(T),
    Failed(String),
}

/// Whether a response was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    Stale,
}

/// Anything that can be judged empty
pub trait ResultSet {
    fn is_empty_set(&self) -> bool;
}

impl<T> ResultSet for Vec<T> {
    fn is_empty_set(&self) -> bool {
        self.is_empty()
    }
}

/// Display-state controller guarding a result set of type `T`
#[derive(Debug, Clone)]
pub struct ResultsController<T> {
    counter: RequestCounter,
    state: DisplayState,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Default for ResultsController<T> {
    fn default() -> Self {
        Self {
            counter: RequestCounter::new(),
            state: DisplayState::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T: ResultSet> ResultsController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Last accepted result; may be stale while busy
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_request(&self) -> RequestId {
        self.counter.current()
    }

    /// Start a request, keeping the previous result visible
    pub fn begin(&mut self, kind: FetchKind) -> RequestId {
        let id = self.counter.next();
        self.state = match kind {
            FetchKind::Resolve => DisplayState::Resolving,
            FetchKind::Load => DisplayState::Loading,
        };
        self.error = None;
        id
    }

    /// Start a request from a clean slate
    pub fn begin_fresh(&mut self, kind: FetchKind) -> RequestId {
        self.data = None;
        self.begin(kind)
    }

    /// Apply a response. Responses for superseded ids are dropped untouched.
    pub fn apply(&mut self, request_id: RequestId, outcome: Outcome<T>) -> Applied {
        if !self.counter.is_current(request_id) {
            tracing::debug!(
                "Discarding stale response for request {} (live: {})",
                request_id,
                self.counter.current()
            );
            return Applied::Stale;
        }

        match outcome {
            Outcome::Pending => {
                if self.state != DisplayState::Resolving {
                    self.state = DisplayState::Loading;
                }
            }
            Outcome::Ready(data) => {
                self.state = if data.is_empty_set() {
                    DisplayState::Empty
                } else {
                    DisplayState::Ready
                };
                self.data = Some(data);
                self.error = None;
            }
            Outcome::Failed(message) => {
                self.state = DisplayState::Error;
                self.error = Some(message);
            }
        }

        Applied::Accepted
    }

    /// Move a resolving request on to loading
    pub fn mark_loading(&mut self, request_id: RequestId) -> Applied {
        if !self.counter.is_current(request_id) {
            return Applied::Stale;
        }
        if self.state == DisplayState::Resolving {
            self.state = DisplayState::Loading;
        }
        Applied::Accepted
    }

    /// Back to idle. Outstanding requests become stale.
    pub fn reset(&mut self) {
        self.counter.next();
        self.state = DisplayState::Idle;
        self.data = None;
        self.error = None;
    }
}

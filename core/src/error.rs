//! Error types for the Toggl client.
//!
//! # Design
//! `Error` is a flat taxonomy. A non-success HTTP status becomes an
//! [`ApiError`] carrying the status, the body text verbatim and the response
//! headers, so callers can ask it whether the failure is temporary (and how
//! long to wait) or a timeout. Transport failures are passed through
//! untouched in `Error::Transport`, and cancellation of the caller's
//! [`Context`](crate::Context) is always `Error::Cancelled`.
//!
//! The legacy adapters reject missing arguments with a [`Sentinel`] before
//! any I/O happens. Sentinels are plain values; compare with `==`.

use std::error::Error as StdError;
use std::fmt;

use http::HeaderMap;

use crate::http::HEADER_RETRY_AFTER;

/// Boxed error returned by a [`Transport`](crate::Transport).
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a [`Context`](crate::Context) stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cancellation {
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cancellation::Cancelled => f.write_str("context cancelled"),
            Cancellation::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

/// Pre-flight rejections raised by the legacy adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    ContextMissing,
    TimeEntryNotFound,
    UserNotFound,
    ProjectNotFound,
    ClientNotFound,
    TagNotFound,
    WorkspaceNotFound,
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Sentinel::ContextMissing => "the context is missing",
            Sentinel::TimeEntryNotFound => "the time entry is not found",
            Sentinel::UserNotFound => "the user is not found",
            Sentinel::ProjectNotFound => "the project is not found",
            Sentinel::ClientNotFound => "the client is not found",
            Sentinel::TagNotFound => "the tag is not found",
            Sentinel::WorkspaceNotFound => "the workspace is not found",
        };
        f.write_str(text)
    }
}

impl StdError for Sentinel {}

/// A response whose status is outside `{200, 201, 204}`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    /// Response body as text, byte for byte (invalid UTF-8 is replaced).
    pub message: String,
    pub headers: HeaderMap,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            status,
            message: message.into(),
            headers,
        }
    }

    /// Raw `Retry-After` header value, if the server sent one.
    pub fn retry_after(&self) -> Option<&str> {
        self.headers
            .get(HEADER_RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "HTTP {}", self.status)
        } else {
            write!(f, "HTTP {}: {}", self.status, self.message)
        }
    }
}

impl StdError for ApiError {}

/// Errors returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller's context was cancelled or hit its deadline.
    #[error("request aborted: {0}")]
    Cancelled(Cancellation),

    /// Base URL unparseable or credentials unusable.
    #[error("bad config: {0}")]
    BadConfig(String),

    /// A query field could not be rendered as a single scalar.
    #[error("bad query: {0}")]
    BadQuery(String),

    /// The transport failed to deliver a response.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A success body was not valid JSON for the expected shape.
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: Vec<u8>,
    },

    #[error(transparent)]
    Sentinel(#[from] Sentinel),
}

impl Error {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Error::Sentinel(sentinel) => Some(*sentinel),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }

    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        self.api().map(|err| err.status)
    }
}

impl PartialEq<Sentinel> for Error {
    fn eq(&self, other: &Sentinel) -> bool {
        self.sentinel() == Some(*other)
    }
}

/// Errors that can tell whether retrying later may succeed.
pub trait Temporary {
    /// `(true, retry_after)` for rate limiting and service unavailability.
    /// `retry_after` is the raw `Retry-After` header or empty.
    fn temporary(&self) -> (bool, String);
}

/// Errors that can tell whether the server gave up waiting.
pub trait Timeout {
    fn timeout(&self) -> bool;
}

impl Temporary for ApiError {
    fn temporary(&self) -> (bool, String) {
        match self.status {
            429 | 503 => (true, self.retry_after().unwrap_or_default().to_string()),
            _ => (false, String::new()),
        }
    }
}

impl Timeout for ApiError {
    fn timeout(&self) -> bool {
        matches!(self.status, 408 | 504)
    }
}

impl Temporary for Error {
    fn temporary(&self) -> (bool, String) {
        match self {
            Error::Api(err) => err.temporary(),
            Error::Transport(inner) => is_temporary(inner.as_ref()),
            _ => (false, String::new()),
        }
    }
}

impl Timeout for Error {
    fn timeout(&self) -> bool {
        match self {
            Error::Api(err) => err.timeout(),
            Error::Transport(inner) => is_timeout(inner.as_ref()),
            _ => false,
        }
    }
}

/// [`Temporary::temporary`] for any error, following its `source()` chain.
/// Errors without the capability yield `(false, "")`.
pub fn is_temporary(err: &(dyn StdError + 'static)) -> (bool, String) {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.temporary();
        }
        if let Some(err) = err.downcast_ref::<ApiError>() {
            return err.temporary();
        }
        current = err.source();
    }
    (false, String::new())
}

/// [`Timeout::timeout`] for any error, following its `source()` chain.
pub fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.timeout();
        }
        if let Some(err) = err.downcast_ref::<ApiError>() {
            return err.timeout();
        }
        current = err.source();
    }
    false
}

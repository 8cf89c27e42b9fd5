//! Async client core for the Toggl Track APIs.
//!
//! # Overview
//! One request engine serves four API families: the current core API
//! (`/api/v9`), the legacy core API (`/api/v8`), reports
//! (`/reports/api/v3`) and webhooks (`/webhooks/api/v1`). Each family is a
//! thin namespace of adapters borrowed from [`TogglClient`].
//!
//! # Design
//! - `TogglClient` is stateless; it holds only an immutable [`Config`].
//! - Every call is split into `build_request` (produces an [`HttpRequest`]),
//!   `execute` (hands it to a [`Transport`]) and `parse_response` (consumes
//!   an [`HttpResponse`]). Hosts that do their own I/O can skip `execute`.
//! - Every call takes a [`Context`] and stops with `Error::Cancelled` as
//!   soon as it is cancelled or its deadline passes.
//! - Types use `Option` for every field so "unset" and "zero" stay distinct
//!   on the wire.
//! - The library logs through `tracing` and never installs a subscriber.

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{Reports, Webhooks, V8, V9};
pub use client::TogglClient;
pub use codec::Timestamp;
pub use config::{
    with_api_token, with_base_url, with_basic_auth, with_transport, ClientOption, Config,
    ConfigBuilder, Credentials, DEFAULT_BASE_URL,
};
pub use context::Context;
pub use error::{
    is_temporary, is_timeout, ApiError, BoxError, Cancellation, Error, Result, Sentinel, Temporary,
    Timeout,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{default_transport, ReqwestTransport, Transport};

//! Resource adapters, one namespace per API family.
//!
//! Each adapter maps a method to a path, an optional body and an optional
//! query, and leaves everything else to [`TogglClient`]. Namespaces borrow
//! the client, so they are free to create per call:
//!
//! ```no_run
//! # async fn run() -> toggl_core::Result<()> {
//! use toggl_core::{with_api_token, Context, TogglClient};
//!
//! let client = TogglClient::from_options([with_api_token("token")])?;
//! let workspace = client.v9().get_workspace(&Context::background(), 1234567).await?;
//! # Ok(())
//! # }
//! ```

pub mod reports;
pub mod v8;
pub mod v9;
pub mod webhooks;

pub use reports::Reports;
pub use v8::V8;
pub use v9::V9;
pub use webhooks::Webhooks;

use crate::client::TogglClient;

impl TogglClient {
    /// Current core API, `/api/v9`.
    pub fn v9(&self) -> V9<'_> {
        V9::new(self)
    }

    /// Legacy core API, `/api/v8`.
    pub fn v8(&self) -> V8<'_> {
        V8::new(self)
    }

    /// Reports API, `/reports/api/v3/workspace/{workspace_id}`.
    pub fn reports(&self) -> Reports<'_> {
        Reports::new(self)
    }

    /// Webhooks API, `/webhooks/api/v1`.
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }
}

/// Identifiers joined by commas for batch endpoints.
pub(crate) fn join_ids<I>(ids: I) -> String
where
    I: IntoIterator<Item = i64>,
{
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

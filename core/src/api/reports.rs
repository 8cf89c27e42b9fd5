//! Reports API (`/reports/api/v3/workspace/{workspace_id}`).
//!
//! All report queries are POSTs whose filters travel in the body.

use crate::client::TogglClient;
use crate::context::Context;
use crate::error::Result;
use crate::types::reports::{
    SearchTimeEntriesRequestBody, SearchedTimeEntry, SummaryReport, SummaryTimeEntriesRequestBody,
    WeeklyRow, WeeklyTimeEntriesRequestBody,
};

const PREFIX: &str = "reports/api/v3/workspace";

#[derive(Debug, Clone, Copy)]
pub struct Reports<'a> {
    client: &'a TogglClient,
}

impl<'a> Reports<'a> {
    pub(crate) fn new(client: &'a TogglClient) -> Self {
        Self { client }
    }

    /// Detailed report rows. `null` yields an empty list.
    pub async fn search_time_entries(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &SearchTimeEntriesRequestBody,
    ) -> Result<Vec<SearchedTimeEntry>> {
        let path = format!("{PREFIX}/{workspace_id}/search/time_entries");
        let rows = self.client.post(ctx, &path, Some(body)).await?;
        Ok(rows.unwrap_or_default())
    }

    pub async fn summary_time_entries(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &SummaryTimeEntriesRequestBody,
    ) -> Result<Option<SummaryReport>> {
        let path = format!("{PREFIX}/{workspace_id}/summary/time_entries");
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn weekly_time_entries(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &WeeklyTimeEntriesRequestBody,
    ) -> Result<Vec<WeeklyRow>> {
        let path = format!("{PREFIX}/{workspace_id}/weekly/time_entries");
        let rows = self.client.post(ctx, &path, Some(body)).await?;
        Ok(rows.unwrap_or_default())
    }
}

//! Legacy core API (`/api/v8`).
//!
//! Every operation takes its context and payload as `Option`s and refuses a
//! missing one with a [`Sentinel`] before anything is sent. Responses come
//! wrapped in `{"data": ...}`; the adapters unwrap them.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::join_ids;
use crate::client::TogglClient;
use crate::context::Context;
use crate::error::{Result, Sentinel};
use crate::types::legacy::{
    DataEnvelope, Project, ProjectEnvelope, TimeEntry, TimeEntryEnvelope, User, UserEnvelope,
};

const PREFIX: &str = "api/v8";

#[derive(Debug, Clone, Copy)]
pub struct V8<'a> {
    client: &'a TogglClient,
}

fn require_ctx(ctx: Option<&Context>) -> Result<&Context> {
    ctx.ok_or_else(|| Sentinel::ContextMissing.into())
}

fn require<T>(value: Option<T>, missing: Sentinel) -> Result<T> {
    value.ok_or_else(|| missing.into())
}

impl<'a> V8<'a> {
    pub(crate) fn new(client: &'a TogglClient) -> Self {
        Self { client }
    }

    async fn get_data<T>(&self, ctx: &Context, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let envelope = self.client.get::<DataEnvelope<T>>(ctx, path).await?;
        Ok(envelope.and_then(|envelope| envelope.data))
    }

    async fn post_data<T, B>(&self, ctx: &Context, path: &str, body: &B) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let envelope = self.client.post::<DataEnvelope<T>, B>(ctx, path, Some(body)).await?;
        Ok(envelope.and_then(|envelope| envelope.data))
    }

    async fn put_data<T, B>(&self, ctx: &Context, path: &str, body: &B) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let envelope = self.client.put::<DataEnvelope<T>, B>(ctx, path, Some(body)).await?;
        Ok(envelope.and_then(|envelope| envelope.data))
    }

    pub async fn get_time_entry(&self, ctx: Option<&Context>, time_entry_id: i64) -> Result<Option<TimeEntry>> {
        let ctx = require_ctx(ctx)?;
        self.get_data(ctx, &format!("{PREFIX}/time_entries/{time_entry_id}"))
            .await
    }

    pub async fn create_time_entry(
        &self,
        ctx: Option<&Context>,
        time_entry: Option<&TimeEntry>,
    ) -> Result<Option<TimeEntry>> {
        let ctx = require_ctx(ctx)?;
        let time_entry = require(time_entry, Sentinel::TimeEntryNotFound)?;
        self.post_data(ctx, &format!("{PREFIX}/time_entries"), &TimeEntryEnvelope { time_entry })
            .await
    }

    /// Replaces the entry identified by `time_entry.id`.
    pub async fn update_time_entry(
        &self,
        ctx: Option<&Context>,
        time_entry: Option<&TimeEntry>,
    ) -> Result<Option<TimeEntry>> {
        let ctx = require_ctx(ctx)?;
        let time_entry = require(time_entry, Sentinel::TimeEntryNotFound)?;
        let id = require(time_entry.id, Sentinel::TimeEntryNotFound)?;
        let path = format!("{PREFIX}/time_entries/{id}");
        self.put_data(ctx, &path, &TimeEntryEnvelope { time_entry }).await
    }

    pub async fn delete_time_entry(&self, ctx: Option<&Context>, time_entry: Option<&TimeEntry>) -> Result<()> {
        let ctx = require_ctx(ctx)?;
        let time_entry = require(time_entry, Sentinel::TimeEntryNotFound)?;
        let id = require(time_entry.id, Sentinel::TimeEntryNotFound)?;
        self.client
            .delete(ctx, &format!("{PREFIX}/time_entries/{id}"))
            .await
    }

    pub async fn get_me(&self, ctx: Option<&Context>) -> Result<Option<User>> {
        let ctx = require_ctx(ctx)?;
        self.get_data(ctx, &format!("{PREFIX}/me")).await
    }

    pub async fn update_me(&self, ctx: Option<&Context>, user: Option<&User>) -> Result<Option<User>> {
        let ctx = require_ctx(ctx)?;
        let user = require(user, Sentinel::UserNotFound)?;
        self.put_data(ctx, &format!("{PREFIX}/me"), &UserEnvelope { user })
            .await
    }

    pub async fn get_project(&self, ctx: Option<&Context>, project_id: i64) -> Result<Option<Project>> {
        let ctx = require_ctx(ctx)?;
        self.get_data(ctx, &format!("{PREFIX}/projects/{project_id}"))
            .await
    }

    pub async fn create_project(&self, ctx: Option<&Context>, project: Option<&Project>) -> Result<Option<Project>> {
        let ctx = require_ctx(ctx)?;
        let project = require(project, Sentinel::ProjectNotFound)?;
        self.post_data(ctx, &format!("{PREFIX}/projects"), &ProjectEnvelope { project })
            .await
    }

    /// Deletes several projects in one call. An empty slice, or a project
    /// without an id, is refused with `ProjectNotFound`.
    pub async fn delete_projects(&self, ctx: Option<&Context>, projects: &[Project]) -> Result<()> {
        let ctx = require_ctx(ctx)?;
        if projects.is_empty() {
            return Err(Sentinel::ProjectNotFound.into());
        }
        let ids = projects
            .iter()
            .map(|project| require(project.id, Sentinel::ProjectNotFound))
            .collect::<Result<Vec<_>>>()?;
        self.client
            .delete(ctx, &format!("{PREFIX}/projects/{}", join_ids(ids)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::testing::recording_client;

    fn project(id: i64) -> Project {
        Project {
            id: Some(id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_context_is_refused_before_io() {
        let (client, recorder) = recording_client();
        let err = client.v8().get_me(None).await.unwrap_err();
        assert!(err == Sentinel::ContextMissing);
        let err = client.v8().get_time_entry(None, 1).await.unwrap_err();
        assert!(err == Sentinel::ContextMissing);
        assert!(recorder.requests().is_empty());
    }

    #[tokio::test]
    async fn missing_payload_is_resource_sentinel() {
        let (client, recorder) = recording_client();
        let ctx = Context::background();
        let v8 = client.v8();
        assert!(v8.create_time_entry(Some(&ctx), None).await.unwrap_err() == Sentinel::TimeEntryNotFound);
        assert!(v8.update_me(Some(&ctx), None).await.unwrap_err() == Sentinel::UserNotFound);
        assert!(v8.create_project(Some(&ctx), None).await.unwrap_err() == Sentinel::ProjectNotFound);
        let unsaved = TimeEntry::default();
        assert!(v8.delete_time_entry(Some(&ctx), Some(&unsaved)).await.unwrap_err() == Sentinel::TimeEntryNotFound);
        assert!(recorder.requests().is_empty());
    }

    #[tokio::test]
    async fn context_is_checked_before_payload() {
        let (client, _) = recording_client();
        let err = client.v8().create_time_entry(None, None).await.unwrap_err();
        assert!(err == Sentinel::ContextMissing);
    }

    #[tokio::test]
    async fn batch_delete_joins_ids() {
        let (client, recorder) = recording_client();
        let ctx = Context::background();
        let projects = [project(123456789), project(234567891), project(345678912)];
        client.v8().delete_projects(Some(&ctx), &projects).await.unwrap();
        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url.path(), "/api/v8/projects/123456789,234567891,345678912");
    }

    #[tokio::test]
    async fn batch_delete_refuses_empty_and_unsaved() {
        let (client, recorder) = recording_client();
        let ctx = Context::background();
        let err = client.v8().delete_projects(Some(&ctx), &[]).await.unwrap_err();
        assert!(err == Sentinel::ProjectNotFound);
        let err = client
            .v8()
            .delete_projects(Some(&ctx), &[project(1), Project::default()])
            .await
            .unwrap_err();
        assert!(err == Sentinel::ProjectNotFound);
        assert!(recorder.requests().is_empty());
    }

    #[tokio::test]
    async fn responses_are_unwrapped_from_data() {
        let (client, recorder) = recording_client();
        recorder.push(HttpResponse::new(
            200,
            r#"{"data":{"id":436694100,"wid":777,"description":"Meeting with possible clients"}}"#,
        ));
        let ctx = Context::background();
        let entry = TimeEntry {
            id: Some(436694100),
            description: Some("Meeting with possible clients".to_string()),
            ..Default::default()
        };
        let updated = client
            .v8()
            .update_time_entry(Some(&ctx), Some(&entry))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.wid, Some(777));

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url.path(), "/api/v8/time_entries/436694100");
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"time_entry":{"id":436694100,"description":"Meeting with possible clients"}}"#)
        );
    }

    #[tokio::test]
    async fn missing_data_is_none() {
        let (client, recorder) = recording_client();
        recorder.push(HttpResponse::new(200, r#"{"data":null}"#));
        let ctx = Context::background();
        assert!(client.v8().get_project(Some(&ctx), 5).await.unwrap().is_none());
    }
}

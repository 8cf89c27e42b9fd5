//! Current core API (`/api/v9`).

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::TogglClient;
use crate::context::Context;
use crate::error::Result;
use crate::types::{
    Client, CreateClientRequestBody, CreateGroupRequestBody, CreateOrganizationRequestBody,
    CreateProjectRequestBody, CreateProjectUserRequestBody, CreateTagRequestBody,
    CreateTimeEntryRequestBody, Group, ListClientsQuery, ListOrganizationUsersQuery,
    ListProjectUsersQuery, ListProjectsQuery, ListTimeEntriesQuery, Me, Organization,
    OrganizationUser, Project, ProjectUser, Tag, TimeEntry, UpdateClientRequestBody,
    UpdateGroupRequestBody, UpdateMeRequestBody, UpdateOrganizationRequestBody,
    UpdateProjectRequestBody, UpdateProjectUserRequestBody, UpdateTagRequestBody,
    UpdateTimeEntryRequestBody, UpdateWorkspaceRequestBody, UpdateWorkspaceUserRequestBody,
    Workspace, WorkspaceUser,
};

const PREFIX: &str = "api/v9";

#[derive(Debug, Clone, Copy)]
pub struct V9<'a> {
    client: &'a TogglClient,
}

fn path(rest: impl Display) -> String {
    format!("{PREFIX}/{rest}")
}

impl<'a> V9<'a> {
    pub(crate) fn new(client: &'a TogglClient) -> Self {
        Self { client }
    }

    async fn list<T, Q>(&self, ctx: &Context, path: &str, query: Option<&Q>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let items = self.client.get_with_query::<Vec<T>, Q>(ctx, path, query).await?;
        Ok(items.unwrap_or_default())
    }

    // --- me ---

    pub async fn get_me(&self, ctx: &Context) -> Result<Option<Me>> {
        self.client.get(ctx, &path("me")).await
    }

    pub async fn update_me(&self, ctx: &Context, body: &UpdateMeRequestBody) -> Result<Option<Me>> {
        self.client.put(ctx, &path("me"), Some(body)).await
    }

    pub async fn list_my_workspaces(&self, ctx: &Context) -> Result<Vec<Workspace>> {
        self.list::<_, ()>(ctx, &path("me/workspaces"), None).await
    }

    pub async fn list_my_organizations(&self, ctx: &Context) -> Result<Vec<Organization>> {
        self.list::<_, ()>(ctx, &path("me/organizations"), None).await
    }

    // --- workspaces ---

    pub async fn get_workspace(&self, ctx: &Context, workspace_id: i64) -> Result<Option<Workspace>> {
        let path = path(format_args!("workspaces/{workspace_id}"));
        self.client.get(ctx, &path).await
    }

    pub async fn list_workspaces(&self, ctx: &Context) -> Result<Vec<Workspace>> {
        self.list::<_, ()>(ctx, &path("workspaces"), None).await
    }

    pub async fn update_workspace(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &UpdateWorkspaceRequestBody,
    ) -> Result<Option<Workspace>> {
        let path = path(format_args!("workspaces/{workspace_id}"));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn list_workspace_users(&self, ctx: &Context, workspace_id: i64) -> Result<Vec<WorkspaceUser>> {
        let path = path(format_args!("workspaces/{workspace_id}/workspace_users"));
        self.list::<_, ()>(ctx, &path, None).await
    }

    pub async fn update_workspace_user(
        &self,
        ctx: &Context,
        workspace_id: i64,
        workspace_user_id: i64,
        body: &UpdateWorkspaceUserRequestBody,
    ) -> Result<Option<WorkspaceUser>> {
        let path = path(format_args!(
            "workspaces/{workspace_id}/workspace_users/{workspace_user_id}"
        ));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_workspace_user(&self, ctx: &Context, workspace_id: i64, workspace_user_id: i64) -> Result<()> {
        let path = path(format_args!(
            "workspaces/{workspace_id}/workspace_users/{workspace_user_id}"
        ));
        self.client.delete(ctx, &path).await
    }

    // --- time entries ---

    pub async fn list_time_entries(
        &self,
        ctx: &Context,
        query: Option<&ListTimeEntriesQuery>,
    ) -> Result<Vec<TimeEntry>> {
        self.list(ctx, &path("me/time_entries"), query).await
    }

    /// The running time entry, or `None` when nothing is running.
    pub async fn get_current_time_entry(&self, ctx: &Context) -> Result<Option<TimeEntry>> {
        self.client.get(ctx, &path("me/time_entries/current")).await
    }

    pub async fn get_time_entry(&self, ctx: &Context, time_entry_id: i64) -> Result<Option<TimeEntry>> {
        let path = path(format_args!("me/time_entries/{time_entry_id}"));
        self.client.get(ctx, &path).await
    }

    pub async fn create_time_entry(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &CreateTimeEntryRequestBody,
    ) -> Result<Option<TimeEntry>> {
        let path = path(format_args!("workspaces/{workspace_id}/time_entries"));
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_time_entry(
        &self,
        ctx: &Context,
        workspace_id: i64,
        time_entry_id: i64,
        body: &UpdateTimeEntryRequestBody,
    ) -> Result<Option<TimeEntry>> {
        let path = path(format_args!(
            "workspaces/{workspace_id}/time_entries/{time_entry_id}"
        ));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_time_entry(&self, ctx: &Context, workspace_id: i64, time_entry_id: i64) -> Result<()> {
        let path = path(format_args!(
            "workspaces/{workspace_id}/time_entries/{time_entry_id}"
        ));
        self.client.delete(ctx, &path).await
    }

    // --- projects ---

    pub async fn list_projects(
        &self,
        ctx: &Context,
        workspace_id: i64,
        query: Option<&ListProjectsQuery>,
    ) -> Result<Vec<Project>> {
        let path = path(format_args!("workspaces/{workspace_id}/projects"));
        self.list(ctx, &path, query).await
    }

    pub async fn get_project(&self, ctx: &Context, workspace_id: i64, project_id: i64) -> Result<Option<Project>> {
        let path = path(format_args!("workspaces/{workspace_id}/projects/{project_id}"));
        self.client.get(ctx, &path).await
    }

    pub async fn create_project(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &CreateProjectRequestBody,
    ) -> Result<Option<Project>> {
        let path = path(format_args!("workspaces/{workspace_id}/projects"));
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_project(
        &self,
        ctx: &Context,
        workspace_id: i64,
        project_id: i64,
        body: &UpdateProjectRequestBody,
    ) -> Result<Option<Project>> {
        let path = path(format_args!("workspaces/{workspace_id}/projects/{project_id}"));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_project(&self, ctx: &Context, workspace_id: i64, project_id: i64) -> Result<()> {
        let path = path(format_args!("workspaces/{workspace_id}/projects/{project_id}"));
        self.client.delete(ctx, &path).await
    }

    // --- clients ---

    pub async fn list_clients(
        &self,
        ctx: &Context,
        workspace_id: i64,
        query: Option<&ListClientsQuery>,
    ) -> Result<Vec<Client>> {
        let path = path(format_args!("workspaces/{workspace_id}/clients"));
        self.list(ctx, &path, query).await
    }

    pub async fn get_client(&self, ctx: &Context, workspace_id: i64, client_id: i64) -> Result<Option<Client>> {
        let path = path(format_args!("workspaces/{workspace_id}/clients/{client_id}"));
        self.client.get(ctx, &path).await
    }

    pub async fn create_client(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &CreateClientRequestBody,
    ) -> Result<Option<Client>> {
        let path = path(format_args!("workspaces/{workspace_id}/clients"));
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_client(
        &self,
        ctx: &Context,
        workspace_id: i64,
        client_id: i64,
        body: &UpdateClientRequestBody,
    ) -> Result<Option<Client>> {
        let path = path(format_args!("workspaces/{workspace_id}/clients/{client_id}"));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_client(&self, ctx: &Context, workspace_id: i64, client_id: i64) -> Result<()> {
        let path = path(format_args!("workspaces/{workspace_id}/clients/{client_id}"));
        self.client.delete(ctx, &path).await
    }

    // --- tags ---

    pub async fn list_tags(&self, ctx: &Context, workspace_id: i64) -> Result<Vec<Tag>> {
        let path = path(format_args!("workspaces/{workspace_id}/tags"));
        self.list::<_, ()>(ctx, &path, None).await
    }

    pub async fn create_tag(&self, ctx: &Context, workspace_id: i64, body: &CreateTagRequestBody) -> Result<Option<Tag>> {
        let path = path(format_args!("workspaces/{workspace_id}/tags"));
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_tag(
        &self,
        ctx: &Context,
        workspace_id: i64,
        tag_id: i64,
        body: &UpdateTagRequestBody,
    ) -> Result<Option<Tag>> {
        let path = path(format_args!("workspaces/{workspace_id}/tags/{tag_id}"));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_tag(&self, ctx: &Context, workspace_id: i64, tag_id: i64) -> Result<()> {
        let path = path(format_args!("workspaces/{workspace_id}/tags/{tag_id}"));
        self.client.delete(ctx, &path).await
    }

    // --- organizations ---

    pub async fn get_organization(&self, ctx: &Context, organization_id: i64) -> Result<Option<Organization>> {
        let path = path(format_args!("organizations/{organization_id}"));
        self.client.get(ctx, &path).await
    }

    pub async fn create_organization(
        &self,
        ctx: &Context,
        body: &CreateOrganizationRequestBody,
    ) -> Result<Option<Organization>> {
        self.client.post(ctx, &path("organizations"), Some(body)).await
    }

    pub async fn update_organization(
        &self,
        ctx: &Context,
        organization_id: i64,
        body: &UpdateOrganizationRequestBody,
    ) -> Result<Option<Organization>> {
        let path = path(format_args!("organizations/{organization_id}"));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn list_organization_users(
        &self,
        ctx: &Context,
        organization_id: i64,
        query: Option<&ListOrganizationUsersQuery>,
    ) -> Result<Vec<OrganizationUser>> {
        let path = path(format_args!("organizations/{organization_id}/users"));
        self.list(ctx, &path, query).await
    }

    // --- groups ---

    pub async fn list_groups(&self, ctx: &Context, organization_id: i64) -> Result<Vec<Group>> {
        let path = path(format_args!("organizations/{organization_id}/groups"));
        self.list::<_, ()>(ctx, &path, None).await
    }

    pub async fn create_group(
        &self,
        ctx: &Context,
        organization_id: i64,
        body: &CreateGroupRequestBody,
    ) -> Result<Option<Group>> {
        let path = path(format_args!("organizations/{organization_id}/groups"));
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_group(
        &self,
        ctx: &Context,
        organization_id: i64,
        group_id: i64,
        body: &UpdateGroupRequestBody,
    ) -> Result<Option<Group>> {
        let path = path(format_args!("organizations/{organization_id}/groups/{group_id}"));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_group(&self, ctx: &Context, organization_id: i64, group_id: i64) -> Result<()> {
        let path = path(format_args!("organizations/{organization_id}/groups/{group_id}"));
        self.client.delete(ctx, &path).await
    }

    // --- project users ---

    pub async fn list_project_users(
        &self,
        ctx: &Context,
        workspace_id: i64,
        query: Option<&ListProjectUsersQuery>,
    ) -> Result<Vec<ProjectUser>> {
        let path = path(format_args!("workspaces/{workspace_id}/project_users"));
        self.list(ctx, &path, query).await
    }

    pub async fn create_project_user(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &CreateProjectUserRequestBody,
    ) -> Result<Option<ProjectUser>> {
        let path = path(format_args!("workspaces/{workspace_id}/project_users"));
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_project_user(
        &self,
        ctx: &Context,
        workspace_id: i64,
        project_user_id: i64,
        body: &UpdateProjectUserRequestBody,
    ) -> Result<Option<ProjectUser>> {
        let path = path(format_args!(
            "workspaces/{workspace_id}/project_users/{project_user_id}"
        ));
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_project_user(&self, ctx: &Context, workspace_id: i64, project_user_id: i64) -> Result<()> {
        let path = path(format_args!(
            "workspaces/{workspace_id}/project_users/{project_user_id}"
        ));
        self.client.delete(ctx, &path).await
    }
}

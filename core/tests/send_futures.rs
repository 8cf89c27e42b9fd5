//! Every adapter future must be `Send` so calls can be spawned onto a
//! multi-threaded runtime. The futures are built and dropped, never polled.

use std::sync::Arc;

use async_trait::async_trait;
use toggl_core::types::legacy;
use toggl_core::types::reports::{
    SearchTimeEntriesRequestBody, SummaryTimeEntriesRequestBody, WeeklyTimeEntriesRequestBody,
};
use toggl_core::types::webhooks::CreateSubscriptionRequestBody;
use toggl_core::types::{
    CreateClientRequestBody, CreateGroupRequestBody, CreateOrganizationRequestBody, CreateProjectRequestBody,
    CreateProjectUserRequestBody, CreateTagRequestBody, CreateTimeEntryRequestBody, ListClientsQuery,
    ListOrganizationUsersQuery, ListProjectUsersQuery, ListProjectsQuery, ListTimeEntriesQuery,
    UpdateClientRequestBody, UpdateMeRequestBody, UpdateOrganizationRequestBody, UpdateProjectUserRequestBody,
    UpdateTagRequestBody, UpdateTimeEntryRequestBody, UpdateWorkspaceRequestBody,
    UpdateWorkspaceUserRequestBody,
};
use toggl_core::{with_api_token, with_transport, BoxError, Context, HttpRequest, HttpResponse, TogglClient, Transport};

#[derive(Debug)]
struct Unused;

#[async_trait]
impl Transport for Unused {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, BoxError> {
        Ok(HttpResponse::new(200, "{}"))
    }
}

fn assert_send<T: Send>(_: &T) {}

macro_rules! assert_all_send {
    ($($call:expr),+ $(,)?) => {
        $( assert_send(&$call); )+
    };
}

#[test]
fn adapter_futures_are_send() {
    let client = TogglClient::from_options([with_api_token("token"), with_transport(Arc::new(Unused))]).unwrap();
    let ctx = Context::background();
    let v9 = client.v9();
    let v8 = client.v8();
    let reports = client.reports();
    let webhooks = client.webhooks();

    let entry = legacy::TimeEntry::default();
    let user = legacy::User::default();
    let project = legacy::Project::default();
    let projects = vec![legacy::Project::default()];
    let subscription = CreateSubscriptionRequestBody::default();

    assert_all_send![
        // v9
        v9.get_me(&ctx),
        v9.update_me(&ctx, &UpdateMeRequestBody::default()),
        v9.list_my_workspaces(&ctx),
        v9.list_my_organizations(&ctx),
        v9.get_workspace(&ctx, 1),
        v9.list_workspaces(&ctx),
        v9.update_workspace(&ctx, 1, &UpdateWorkspaceRequestBody::default()),
        v9.list_workspace_users(&ctx, 1),
        v9.update_workspace_user(&ctx, 1, 2, &UpdateWorkspaceUserRequestBody::default()),
        v9.delete_workspace_user(&ctx, 1, 2),
        v9.list_time_entries(&ctx, Some(&ListTimeEntriesQuery::default())),
        v9.get_current_time_entry(&ctx),
        v9.get_time_entry(&ctx, 1),
        v9.create_time_entry(&ctx, 1, &CreateTimeEntryRequestBody::default()),
        v9.update_time_entry(&ctx, 1, 2, &UpdateTimeEntryRequestBody::default()),
        v9.delete_time_entry(&ctx, 1, 2),
        v9.list_projects(&ctx, 1, Some(&ListProjectsQuery::default())),
        v9.get_project(&ctx, 1, 2),
        v9.create_project(&ctx, 1, &CreateProjectRequestBody::default()),
        v9.update_project(&ctx, 1, 2, &CreateProjectRequestBody::default()),
        v9.delete_project(&ctx, 1, 2),
        v9.list_clients(&ctx, 1, Some(&ListClientsQuery::default())),
        v9.get_client(&ctx, 1, 2),
        v9.create_client(&ctx, 1, &CreateClientRequestBody::default()),
        v9.update_client(&ctx, 1, 2, &UpdateClientRequestBody::default()),
        v9.delete_client(&ctx, 1, 2),
        v9.list_tags(&ctx, 1),
        v9.create_tag(&ctx, 1, &CreateTagRequestBody::default()),
        v9.update_tag(&ctx, 1, 2, &UpdateTagRequestBody::default()),
        v9.delete_tag(&ctx, 1, 2),
        v9.get_organization(&ctx, 1),
        v9.create_organization(&ctx, &CreateOrganizationRequestBody::default()),
        v9.update_organization(&ctx, 1, &UpdateOrganizationRequestBody::default()),
        v9.list_organization_users(&ctx, 1, Some(&ListOrganizationUsersQuery::default())),
        v9.list_groups(&ctx, 1),
        v9.create_group(&ctx, 1, &CreateGroupRequestBody::default()),
        v9.update_group(&ctx, 1, 2, &CreateGroupRequestBody::default()),
        v9.delete_group(&ctx, 1, 2),
        v9.list_project_users(&ctx, 1, Some(&ListProjectUsersQuery::default())),
        v9.create_project_user(&ctx, 1, &CreateProjectUserRequestBody::default()),
        v9.update_project_user(&ctx, 1, 2, &UpdateProjectUserRequestBody::default()),
        v9.delete_project_user(&ctx, 1, 2),
        // v8
        v8.get_time_entry(Some(&ctx), 1),
        v8.create_time_entry(Some(&ctx), Some(&entry)),
        v8.update_time_entry(Some(&ctx), Some(&entry)),
        v8.delete_time_entry(Some(&ctx), Some(&entry)),
        v8.get_me(Some(&ctx)),
        v8.update_me(Some(&ctx), Some(&user)),
        v8.get_project(Some(&ctx), 1),
        v8.create_project(Some(&ctx), Some(&project)),
        v8.delete_projects(Some(&ctx), &projects),
        // reports
        reports.search_time_entries(&ctx, 1, &SearchTimeEntriesRequestBody::default()),
        reports.summary_time_entries(&ctx, 1, &SummaryTimeEntriesRequestBody::default()),
        reports.weekly_time_entries(&ctx, 1, &WeeklyTimeEntriesRequestBody::default()),
        // webhooks
        webhooks.list_subscriptions(&ctx, 1),
        webhooks.create_subscription(&ctx, 1, &subscription),
        webhooks.update_subscription(&ctx, 1, 2, &subscription),
        webhooks.delete_subscription(&ctx, 1, 2),
        webhooks.ping_subscription(&ctx, 1, 2),
        webhooks.validate_subscription(&ctx, 1, 2, "code"),
        webhooks.list_event_filters(&ctx),
    ];
}

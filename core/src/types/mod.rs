//! Request and response types for the Toggl APIs.
//!
//! Every field is an `Option`. `None` means "unset": it is left out of
//! request bodies and queries, and a `null` in a response decodes to it.
//! `Some(0)`, `Some(false)` and `Some("")` are sent as-is.

pub mod client;
pub mod legacy;
pub mod organization;
pub mod project;
pub mod reports;
pub mod tag;
pub mod time_entry;
pub mod user;
pub mod webhooks;
pub mod workspace;

pub use client::{Client, CreateClientRequestBody, ListClientsQuery, UpdateClientRequestBody};
pub use organization::{
    CreateGroupRequestBody, CreateOrganizationRequestBody, Group, GroupUser,
    ListOrganizationUsersQuery, Organization, OrganizationUser, UpdateGroupRequestBody,
    UpdateOrganizationRequestBody,
};
pub use project::{
    CreateProjectRequestBody, CreateProjectUserRequestBody, ListProjectUsersQuery,
    ListProjectsQuery, Project, ProjectUser, UpdateProjectRequestBody,
    UpdateProjectUserRequestBody,
};
pub use tag::{CreateTagRequestBody, Tag, UpdateTagRequestBody};
pub use time_entry::{
    CreateTimeEntryRequestBody, ListTimeEntriesQuery, TimeEntry, UpdateTimeEntryRequestBody,
};
pub use user::{Me, UpdateMeRequestBody};
pub use workspace::{
    UpdateWorkspaceRequestBody, UpdateWorkspaceUserRequestBody, Workspace, WorkspaceUser,
};

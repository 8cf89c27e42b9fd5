use serde::{Deserialize, Serialize};

use crate::codec::{rfc3339, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_admins_may_create_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_admins_see_billable_rates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_admins_see_team_dashboard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_billable_by_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkspaceRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admins: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_admins_may_create_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_admins_see_billable_rates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_admins_see_team_dashboard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_billable_by_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding_minutes: Option<i64>,
}

/// Membership of a user in a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkspaceUserRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labour_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

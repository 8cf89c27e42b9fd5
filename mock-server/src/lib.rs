//! In-memory fake of the Toggl Track HTTP APIs.
//!
//! Serves a small slice of `/api/v9`, `/api/v8`, `/reports/api/v3` and
//! `/webhooks/api/v1` from one shared store. Requests must carry HTTP basic
//! auth with the configured token and the literal password `api_token`;
//! anything else gets an empty `403`.
//!
//! Tests can queue [`Fault`]s on the state. Each authenticated request pops
//! one and answers with it instead of reaching the handler.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_TOKEN: &str = "mock-token";
pub const WORKSPACE_ID: i64 = 1234567;
pub const ORGANIZATION_ID: i64 = 7654321;
pub const USER_ID: i64 = 42;

const CREATED_AT: &str = "2024-01-01T00:00:00Z";

type HandlerResult<T> = Result<T, (StatusCode, String)>;

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

// --- stored shapes ---

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub fullname: String,
    pub timezone: String,
    pub default_workspace_id: i64,
    pub beginning_of_week: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub premium: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub workspace_id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    pub description: String,
    pub billable: bool,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    pub duration: i64,
    pub tags: Vec<String>,
    pub at: String,
}

impl TimeEntry {
    fn running(&self) -> bool {
        self.duration < 0
    }

    /// The `/api/v8` rendering, which abbreviates ids.
    fn legacy(&self) -> Value {
        json!({
            "id": self.id,
            "wid": self.workspace_id,
            "pid": self.project_id,
            "uid": self.user_id,
            "description": self.description,
            "billable": self.billable,
            "start": self.start,
            "stop": self.stop,
            "duration": self.duration,
            "tags": self.tags,
            "at": self.at,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub active: bool,
    pub billable: bool,
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub at: String,
}

impl Project {
    fn legacy(&self) -> Value {
        json!({
            "id": self.id,
            "wid": self.workspace_id,
            "name": self.name,
            "active": self.active,
            "billable": self.billable,
            "is_private": self.is_private,
            "color": self.color,
            "at": self.at,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventFilter {
    pub entity: String,
    pub action: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: i64,
    pub workspace_id: i64,
    pub user_id: i64,
    pub description: String,
    pub url_callback: String,
    pub enabled: bool,
    pub event_filters: Vec<EventFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<String>,
    pub created_at: String,
}

// --- request payloads ---

#[derive(Debug, Default, Deserialize)]
pub struct TimeEntryInput {
    pub description: Option<String>,
    pub project_id: Option<i64>,
    pub billable: Option<bool>,
    pub start: Option<String>,
    pub stop: Option<String>,
    pub duration: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// `/api/v8` time entry payload, which uses `pid` for the project.
#[derive(Debug, Default, Deserialize)]
pub struct LegacyTimeEntryInput {
    pub wid: Option<i64>,
    pub pid: Option<i64>,
    pub description: Option<String>,
    pub billable: Option<bool>,
    pub start: Option<String>,
    pub stop: Option<String>,
    pub duration: Option<i64>,
    pub tags: Option<Vec<String>>,
}

impl From<LegacyTimeEntryInput> for TimeEntryInput {
    fn from(input: LegacyTimeEntryInput) -> Self {
        Self {
            description: input.description,
            project_id: input.pid,
            billable: input.billable,
            start: input.start,
            stop: input.stop,
            duration: input.duration,
            tags: input.tags,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub billable: Option<bool>,
    pub is_private: Option<bool>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TagInput {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserInput {
    pub email: Option<String>,
    pub fullname: Option<String>,
    pub timezone: Option<String>,
    pub beginning_of_week: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionInput {
    pub description: Option<String>,
    pub url_callback: Option<String>,
    pub enabled: Option<bool>,
    pub event_filters: Option<Vec<EventFilter>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchInput {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(alias = "time_entry", alias = "project", alias = "user")]
    inner: T,
}

// --- state ---

/// A canned response served in place of the next request.
#[derive(Clone, Debug)]
pub struct Fault {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<String>,
    pub delay: Option<Duration>,
}

impl Fault {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            retry_after: None,
            delay: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        if let Some(value) = self.retry_after.and_then(|v| HeaderValue::from_str(&v).ok()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

#[derive(Debug)]
pub struct Db {
    next_id: i64,
    pub me: User,
    pub workspaces: BTreeMap<i64, Workspace>,
    pub time_entries: BTreeMap<i64, TimeEntry>,
    pub projects: BTreeMap<i64, Project>,
    pub tags: BTreeMap<i64, Tag>,
    pub subscriptions: BTreeMap<i64, Subscription>,
}

impl Default for Db {
    fn default() -> Self {
        let workspace = Workspace {
            id: WORKSPACE_ID,
            organization_id: ORGANIZATION_ID,
            name: "Workspace1".to_string(),
            premium: false,
        };
        Self {
            next_id: 1000,
            me: User {
                id: USER_ID,
                email: "user@example.com".to_string(),
                fullname: "Mock User".to_string(),
                timezone: "UTC".to_string(),
                default_workspace_id: WORKSPACE_ID,
                beginning_of_week: 1,
            },
            workspaces: BTreeMap::from([(WORKSPACE_ID, workspace)]),
            time_entries: BTreeMap::new(),
            projects: BTreeMap::new(),
            tags: BTreeMap::new(),
            subscriptions: BTreeMap::new(),
        }
    }
}

impl Db {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn workspace(&self, workspace_id: i64) -> HandlerResult<&Workspace> {
        self.workspaces
            .get(&workspace_id)
            .ok_or_else(|| not_found("workspace"))
    }

    fn insert_time_entry(&mut self, workspace_id: i64, input: TimeEntryInput) -> TimeEntry {
        let id = self.next_id();
        let entry = TimeEntry {
            id,
            workspace_id,
            user_id: self.me.id,
            project_id: input.project_id,
            description: input.description.unwrap_or_default(),
            billable: input.billable.unwrap_or(false),
            start: input.start.unwrap_or_else(|| CREATED_AT.to_string()),
            duration: input.duration.unwrap_or(if input.stop.is_some() { 0 } else { -1 }),
            stop: input.stop,
            tags: input.tags.unwrap_or_default(),
            at: CREATED_AT.to_string(),
        };
        self.time_entries.insert(id, entry.clone());
        entry
    }

    fn update_time_entry(&mut self, id: i64, input: TimeEntryInput) -> HandlerResult<TimeEntry> {
        let entry = self
            .time_entries
            .get_mut(&id)
            .ok_or_else(|| not_found("time entry"))?;
        if let Some(description) = input.description {
            entry.description = description;
        }
        if let Some(project_id) = input.project_id {
            entry.project_id = Some(project_id);
        }
        if let Some(billable) = input.billable {
            entry.billable = billable;
        }
        if let Some(start) = input.start {
            entry.start = start;
        }
        if let Some(stop) = input.stop {
            entry.stop = Some(stop);
        }
        if let Some(duration) = input.duration {
            entry.duration = duration;
        }
        if let Some(tags) = input.tags {
            entry.tags = tags;
        }
        Ok(entry.clone())
    }

    fn insert_project(&mut self, workspace_id: i64, input: ProjectInput) -> HandlerResult<Project> {
        let name = input
            .name
            .ok_or_else(|| (StatusCode::BAD_REQUEST, "project name must be set".to_string()))?;
        if self
            .projects
            .values()
            .any(|p| p.workspace_id == workspace_id && p.name == name)
        {
            return Err((StatusCode::BAD_REQUEST, "project name already exists".to_string()));
        }
        let id = self.next_id();
        let project = Project {
            id,
            workspace_id,
            name,
            active: input.active.unwrap_or(true),
            billable: input.billable.unwrap_or(false),
            is_private: input.is_private.unwrap_or(true),
            color: input.color,
            at: CREATED_AT.to_string(),
        };
        self.projects.insert(id, project.clone());
        Ok(project)
    }
}

#[derive(Debug)]
pub struct AppState {
    token: String,
    logins: Vec<String>,
    pub db: RwLock<Db>,
    faults: Mutex<VecDeque<Fault>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            logins: Vec::new(),
            db: RwLock::new(Db::default()),
            faults: Mutex::new(VecDeque::new()),
        }
    }

    /// Also accept `email:password` basic auth.
    pub fn with_login(mut self, email: &str, password: &str) -> Self {
        self.logins.push(format!("{email}:{password}"));
        self
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Queue a fault for the next authenticated request.
    pub fn inject(&self, fault: Fault) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.push_back(fault);
        }
    }

    fn next_fault(&self) -> Option<Fault> {
        self.faults.lock().ok()?.pop_front()
    }

    fn authorized(&self, header: Option<&HeaderValue>) -> bool {
        let Some(encoded) = header
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Basic "))
        else {
            return false;
        };
        let Some(decoded) = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
        else {
            return false;
        };
        decoded == format!("{}:api_token", self.token) || self.logins.contains(&decoded)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN)
    }
}

// --- router ---

pub fn app(state: SharedState) -> Router {
    let v9 = Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/workspaces", get(list_my_workspaces))
        .route("/me/time_entries", get(list_time_entries))
        .route("/me/time_entries/current", get(current_time_entry))
        .route("/me/time_entries/{id}", get(get_time_entry))
        .route("/workspaces/{wid}", get(get_workspace))
        .route("/workspaces/{wid}/time_entries", post(create_time_entry))
        .route(
            "/workspaces/{wid}/time_entries/{id}",
            put(update_time_entry).delete(delete_time_entry),
        )
        .route("/workspaces/{wid}/projects", get(list_projects).post(create_project))
        .route(
            "/workspaces/{wid}/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/workspaces/{wid}/tags", get(list_tags).post(create_tag))
        .route("/workspaces/{wid}/tags/{id}", put(update_tag).delete(delete_tag));

    let v8 = Router::new()
        .route("/me", get(legacy_get_me).put(legacy_update_me))
        .route("/time_entries", post(legacy_create_time_entry))
        .route(
            "/time_entries/{id}",
            get(legacy_get_time_entry)
                .put(legacy_update_time_entry)
                .delete(legacy_delete_time_entry),
        )
        .route("/projects", post(legacy_create_project))
        .route(
            "/projects/{ids}",
            get(legacy_get_project).delete(legacy_delete_projects),
        );

    let reports = Router::new().route("/{wid}/search/time_entries", post(search_time_entries));

    let webhooks = Router::new()
        .route(
            "/subscriptions/{wid}",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/subscriptions/{wid}/{sid}",
            put(update_subscription).delete(delete_subscription),
        )
        .route("/ping/{wid}/{sid}", post(ping_subscription))
        .route("/validate/{wid}/{sid}/{code}", get(validate_subscription))
        .route("/event_filters", get(list_event_filters));

    Router::new()
        .nest("/api/v9", v9)
        .nest("/api/v8", v8)
        .nest("/reports/api/v3/workspace", reports)
        .nest("/webhooks/api/v1", webhooks)
        .layer(middleware::from_fn_with_state(state.clone(), gatekeeper))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Rejects unauthenticated requests, then serves a queued fault if any.
async fn gatekeeper(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    if !state.authorized(request.headers().get(header::AUTHORIZATION)) {
        tracing::warn!(path = %request.uri().path(), "rejecting unauthenticated request");
        return StatusCode::FORBIDDEN.into_response();
    }
    if let Some(fault) = state.next_fault() {
        tracing::debug!(status = fault.status, path = %request.uri().path(), "serving injected fault");
        if let Some(delay) = fault.delay {
            tokio::time::sleep(delay).await;
        }
        return fault.into_response();
    }
    next.run(request).await
}

// --- /api/v9 ---

async fn get_me(State(state): State<SharedState>) -> Json<User> {
    Json(state.db.read().await.me.clone())
}

fn apply_user_input(user: &mut User, input: UserInput) {
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(fullname) = input.fullname {
        user.fullname = fullname;
    }
    if let Some(timezone) = input.timezone {
        user.timezone = timezone;
    }
    if let Some(beginning_of_week) = input.beginning_of_week {
        user.beginning_of_week = beginning_of_week;
    }
}

async fn update_me(State(state): State<SharedState>, Json(input): Json<UserInput>) -> Json<User> {
    let mut db = state.db.write().await;
    apply_user_input(&mut db.me, input);
    Json(db.me.clone())
}

async fn list_my_workspaces(State(state): State<SharedState>) -> Json<Vec<Workspace>> {
    Json(state.db.read().await.workspaces.values().cloned().collect())
}

async fn get_workspace(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
) -> HandlerResult<Json<Workspace>> {
    let db = state.db.read().await;
    db.workspace(wid).cloned().map(Json)
}

async fn list_time_entries(State(state): State<SharedState>) -> Json<Vec<TimeEntry>> {
    Json(state.db.read().await.time_entries.values().cloned().collect())
}

/// `null` when nothing is running.
async fn current_time_entry(State(state): State<SharedState>) -> Json<Option<TimeEntry>> {
    let db = state.db.read().await;
    Json(db.time_entries.values().find(|e| e.running()).cloned())
}

async fn get_time_entry(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> HandlerResult<Json<TimeEntry>> {
    let db = state.db.read().await;
    db.time_entries
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("time entry"))
}

async fn create_time_entry(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
    Json(input): Json<TimeEntryInput>,
) -> HandlerResult<Json<TimeEntry>> {
    let mut db = state.db.write().await;
    db.workspace(wid)?;
    Ok(Json(db.insert_time_entry(wid, input)))
}

async fn update_time_entry(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
    Json(input): Json<TimeEntryInput>,
) -> HandlerResult<Json<TimeEntry>> {
    let mut db = state.db.write().await;
    db.workspace(wid)?;
    db.update_time_entry(id, input).map(Json)
}

async fn delete_time_entry(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
) -> HandlerResult<StatusCode> {
    let mut db = state.db.write().await;
    db.workspace(wid)?;
    db.time_entries
        .remove(&id)
        .map(|_| StatusCode::OK)
        .ok_or_else(|| not_found("time entry"))
}

async fn list_projects(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
) -> HandlerResult<Json<Vec<Project>>> {
    let db = state.db.read().await;
    db.workspace(wid)?;
    Ok(Json(
        db.projects
            .values()
            .filter(|p| p.workspace_id == wid)
            .cloned()
            .collect(),
    ))
}

async fn get_project(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
) -> HandlerResult<Json<Project>> {
    let db = state.db.read().await;
    db.projects
        .get(&id)
        .filter(|p| p.workspace_id == wid)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("project"))
}

async fn create_project(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
    Json(input): Json<ProjectInput>,
) -> HandlerResult<Json<Project>> {
    let mut db = state.db.write().await;
    db.workspace(wid)?;
    db.insert_project(wid, input).map(Json)
}

async fn update_project(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
    Json(input): Json<ProjectInput>,
) -> HandlerResult<Json<Project>> {
    let mut db = state.db.write().await;
    let project = db
        .projects
        .get_mut(&id)
        .filter(|p| p.workspace_id == wid)
        .ok_or_else(|| not_found("project"))?;
    if let Some(name) = input.name {
        project.name = name;
    }
    if let Some(active) = input.active {
        project.active = active;
    }
    if let Some(billable) = input.billable {
        project.billable = billable;
    }
    if let Some(is_private) = input.is_private {
        project.is_private = is_private;
    }
    if input.color.is_some() {
        project.color = input.color;
    }
    Ok(Json(project.clone()))
}

async fn delete_project(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
) -> HandlerResult<StatusCode> {
    let mut db = state.db.write().await;
    if !db.projects.get(&id).is_some_and(|p| p.workspace_id == wid) {
        return Err(not_found("project"));
    }
    db.projects.remove(&id);
    Ok(StatusCode::OK)
}

async fn list_tags(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
) -> HandlerResult<Json<Vec<Tag>>> {
    let db = state.db.read().await;
    db.workspace(wid)?;
    Ok(Json(
        db.tags.values().filter(|t| t.workspace_id == wid).cloned().collect(),
    ))
}

async fn create_tag(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
    Json(input): Json<TagInput>,
) -> HandlerResult<Json<Tag>> {
    let mut db = state.db.write().await;
    db.workspace(wid)?;
    let id = db.next_id();
    let tag = Tag {
        id,
        workspace_id: wid,
        name: input.name,
        at: CREATED_AT.to_string(),
    };
    db.tags.insert(id, tag.clone());
    Ok(Json(tag))
}

async fn update_tag(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
    Json(input): Json<TagInput>,
) -> HandlerResult<Json<Tag>> {
    let mut db = state.db.write().await;
    let tag = db
        .tags
        .get_mut(&id)
        .filter(|t| t.workspace_id == wid)
        .ok_or_else(|| not_found("tag"))?;
    tag.name = input.name;
    Ok(Json(tag.clone()))
}

async fn delete_tag(
    State(state): State<SharedState>,
    Path((wid, id)): Path<(i64, i64)>,
) -> HandlerResult<StatusCode> {
    let mut db = state.db.write().await;
    if !db.tags.get(&id).is_some_and(|t| t.workspace_id == wid) {
        return Err(not_found("tag"));
    }
    db.tags.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- /api/v8 ---

fn data(value: impl Serialize) -> Json<Value> {
    Json(json!({ "data": value }))
}

async fn legacy_get_me(State(state): State<SharedState>) -> Json<Value> {
    let db = state.db.read().await;
    let me = &db.me;
    data(json!({
        "id": me.id,
        "email": me.email,
        "fullname": me.fullname,
        "timezone": me.timezone,
        "default_wid": me.default_workspace_id,
        "beginning_of_week": me.beginning_of_week,
    }))
}

async fn legacy_update_me(
    State(state): State<SharedState>,
    Json(input): Json<Envelope<UserInput>>,
) -> Json<Value> {
    {
        let mut db = state.db.write().await;
        apply_user_input(&mut db.me, input.inner);
    }
    legacy_get_me(State(state)).await
}

async fn legacy_get_time_entry(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> HandlerResult<Json<Value>> {
    let db = state.db.read().await;
    db.time_entries
        .get(&id)
        .map(|e| data(e.legacy()))
        .ok_or_else(|| not_found("time entry"))
}

async fn legacy_create_time_entry(
    State(state): State<SharedState>,
    Json(input): Json<Envelope<LegacyTimeEntryInput>>,
) -> HandlerResult<Json<Value>> {
    let mut db = state.db.write().await;
    let wid = input.inner.wid.unwrap_or(db.me.default_workspace_id);
    db.workspace(wid)?;
    let entry = db.insert_time_entry(wid, input.inner.into());
    Ok(data(entry.legacy()))
}

async fn legacy_update_time_entry(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(input): Json<Envelope<LegacyTimeEntryInput>>,
) -> HandlerResult<Json<Value>> {
    let mut db = state.db.write().await;
    let entry = db.update_time_entry(id, input.inner.into())?;
    Ok(data(entry.legacy()))
}

async fn legacy_delete_time_entry(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> HandlerResult<StatusCode> {
    let mut db = state.db.write().await;
    db.time_entries
        .remove(&id)
        .map(|_| StatusCode::OK)
        .ok_or_else(|| not_found("time entry"))
}

async fn legacy_create_project(
    State(state): State<SharedState>,
    Json(input): Json<Envelope<Value>>,
) -> HandlerResult<Json<Value>> {
    let wid = input.inner.get("wid").and_then(Value::as_i64);
    let input: ProjectInput = serde_json::from_value(input.inner)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let mut db = state.db.write().await;
    let wid = wid.unwrap_or(db.me.default_workspace_id);
    db.workspace(wid)?;
    let project = db.insert_project(wid, input)?;
    Ok(data(project.legacy()))
}

async fn legacy_get_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<Value>> {
    let id: i64 = id.parse().map_err(|_| not_found("project"))?;
    let db = state.db.read().await;
    db.projects
        .get(&id)
        .map(|p| data(p.legacy()))
        .ok_or_else(|| not_found("project"))
}

/// `DELETE /api/v8/projects/1,2,3` removes every listed project.
async fn legacy_delete_projects(
    State(state): State<SharedState>,
    Path(ids): Path<String>,
) -> HandlerResult<StatusCode> {
    let ids = ids
        .split(',')
        .map(str::parse::<i64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| (StatusCode::BAD_REQUEST, "malformed project ids".to_string()))?;
    let mut db = state.db.write().await;
    if ids.iter().any(|id| !db.projects.contains_key(id)) {
        return Err(not_found("project"));
    }
    for id in ids {
        db.projects.remove(&id);
    }
    Ok(StatusCode::OK)
}

// --- /reports/api/v3 ---

/// One row per matching entry; dates compare on the `YYYY-MM-DD` prefix.
async fn search_time_entries(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
    Json(input): Json<SearchInput>,
) -> HandlerResult<Json<Vec<Value>>> {
    let db = state.db.read().await;
    db.workspace(wid)?;
    let rows = db
        .time_entries
        .values()
        .filter(|e| e.workspace_id == wid)
        .filter(|e| {
            let day = e.start.get(..10).unwrap_or(e.start.as_str());
            input.start_date.as_deref().map_or(true, |from| day >= from)
                && input.end_date.as_deref().map_or(true, |to| day <= to)
                && input
                    .description
                    .as_deref()
                    .map_or(true, |d| e.description.contains(d))
        })
        .map(|e| {
            json!({
                "user_id": e.user_id,
                "project_id": e.project_id,
                "description": e.description,
                "billable": e.billable,
                "time_entries": [{
                    "id": e.id,
                    "seconds": e.duration.max(0),
                    "start": e.start,
                    "stop": e.stop,
                    "at": e.at,
                }],
            })
        })
        .collect();
    Ok(Json(rows))
}

// --- /webhooks/api/v1 ---

async fn list_subscriptions(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
) -> HandlerResult<Json<Vec<Subscription>>> {
    let db = state.db.read().await;
    db.workspace(wid)?;
    Ok(Json(
        db.subscriptions
            .values()
            .filter(|s| s.workspace_id == wid)
            .cloned()
            .collect(),
    ))
}

async fn create_subscription(
    State(state): State<SharedState>,
    Path(wid): Path<i64>,
    Json(input): Json<SubscriptionInput>,
) -> HandlerResult<Json<Subscription>> {
    let url_callback = input
        .url_callback
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "url_callback must be set".to_string()))?;
    let mut db = state.db.write().await;
    db.workspace(wid)?;
    let id = db.next_id();
    let subscription = Subscription {
        subscription_id: id,
        workspace_id: wid,
        user_id: db.me.id,
        description: input.description.unwrap_or_default(),
        url_callback,
        enabled: input.enabled.unwrap_or(false),
        event_filters: input.event_filters.unwrap_or_default(),
        validated_at: None,
        created_at: CREATED_AT.to_string(),
    };
    db.subscriptions.insert(id, subscription.clone());
    Ok(Json(subscription))
}

async fn update_subscription(
    State(state): State<SharedState>,
    Path((wid, sid)): Path<(i64, i64)>,
    Json(input): Json<SubscriptionInput>,
) -> HandlerResult<Json<Subscription>> {
    let mut db = state.db.write().await;
    let subscription = db
        .subscriptions
        .get_mut(&sid)
        .filter(|s| s.workspace_id == wid)
        .ok_or_else(|| not_found("subscription"))?;
    if let Some(description) = input.description {
        subscription.description = description;
    }
    if let Some(url_callback) = input.url_callback {
        subscription.url_callback = url_callback;
    }
    if let Some(enabled) = input.enabled {
        subscription.enabled = enabled;
    }
    if let Some(event_filters) = input.event_filters {
        subscription.event_filters = event_filters;
    }
    Ok(Json(subscription.clone()))
}

async fn delete_subscription(
    State(state): State<SharedState>,
    Path((wid, sid)): Path<(i64, i64)>,
) -> HandlerResult<StatusCode> {
    let mut db = state.db.write().await;
    if !db.subscriptions.get(&sid).is_some_and(|s| s.workspace_id == wid) {
        return Err(not_found("subscription"));
    }
    db.subscriptions.remove(&sid);
    Ok(StatusCode::OK)
}

async fn ping_subscription(
    State(state): State<SharedState>,
    Path((wid, sid)): Path<(i64, i64)>,
) -> HandlerResult<Json<Value>> {
    let db = state.db.read().await;
    db.subscriptions
        .get(&sid)
        .filter(|s| s.workspace_id == wid)
        .map(|_| Json(json!({ "status": "ok" })))
        .ok_or_else(|| not_found("subscription"))
}

async fn validate_subscription(
    State(state): State<SharedState>,
    Path((wid, sid, _code)): Path<(i64, i64, String)>,
) -> HandlerResult<StatusCode> {
    let mut db = state.db.write().await;
    let subscription = db
        .subscriptions
        .get_mut(&sid)
        .filter(|s| s.workspace_id == wid)
        .ok_or_else(|| not_found("subscription"))?;
    subscription.validated_at = Some(CREATED_AT.to_string());
    subscription.enabled = true;
    Ok(StatusCode::OK)
}

async fn list_event_filters() -> Json<BTreeMap<&'static str, Vec<&'static str>>> {
    let actions = || vec!["created", "updated", "deleted", "*"];
    Json(BTreeMap::from([
        ("client", actions()),
        ("project", actions()),
        ("tag", actions()),
        ("time_entry", actions()),
    ]))
}

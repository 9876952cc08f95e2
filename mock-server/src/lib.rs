//! In-memory stand-in for the Tool Tracker backend.
//!
//! Serves the full REST surface under `/api` with the same status codes,
//! envelopes and lifecycle rules as the real service, so the client can be
//! exercised end-to-end without a database.

pub mod error;
pub mod extract;
pub mod model;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub use error::ServerError;
pub use extract::{ApiJson, ApiQuery, ResourceId};
pub use model::{
    AuditLog, Event, EventList, EventType, Stats, Tool, ToolActionReply, ToolList, ToolStatus, User,
    UserList, UserRole, UserTools,
};
pub use store::{Store, SYSTEM_USER_ID};

use model::{ListParams, ToolActionRequest, ToolRequest, UserRequest};
use store::{parse_id, EventFilter, Page};

pub type Db = Arc<RwLock<Store>>;

/// Router over an empty store.
pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/tools", get(list_tools).post(create_tool))
        .route("/tools/{id}", get(get_tool).put(update_tool).delete(delete_tool))
        .route("/tools/{id}/checkout", post(checkout_tool))
        .route("/tools/{id}/checkin", post(checkin_tool))
        .route("/tools/{id}/lost", post(mark_tool_lost))
        .route("/tools/{id}/maintenance", post(send_tool_to_maintenance))
        .route("/tools/{id}/history", get(tool_history))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{id}/activity", get(user_activity))
        .route("/users/{id}/tools", get(user_tools))
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
        .route("/admin/stats", get(stats))
        .route("/admin/audit", get(audit));

    Router::new()
        .route("/ping", get(ping))
        .nest("/api", api)
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

fn optional<T: std::str::FromStr<Err = ServerError>>(value: Option<&str>) -> Result<Option<T>, ServerError> {
    value.filter(|v| !v.is_empty()).map(str::parse).transpose()
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

async fn list_tools(
    State(db): State<Db>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ToolList>, ServerError> {
    let status = optional(params.status.as_deref())?;
    let page = Page::new(params.limit, params.offset, 10, 100);
    let tools = db.read().await.list_tools(status, page);
    Ok(Json(ToolList { tools }))
}

async fn create_tool(
    State(db): State<Db>,
    ApiJson(input): ApiJson<ToolRequest>,
) -> Result<(StatusCode, Json<Tool>), ServerError> {
    let status = optional(input.status.as_deref())?;
    let tool = db.write().await.create_tool(&input.name, status)?;
    tracing::info!(tool_id = %tool.id, "tool created");
    Ok((StatusCode::CREATED, Json(tool)))
}

async fn get_tool(State(db): State<Db>, ResourceId(id): ResourceId) -> Result<Json<Tool>, ServerError> {
    db.read().await.get_tool(id).map(Json)
}

async fn update_tool(
    State(db): State<Db>,
    ResourceId(id): ResourceId,
    ApiJson(input): ApiJson<ToolRequest>,
) -> Result<Json<Tool>, ServerError> {
    let status = optional(input.status.as_deref())?;
    db.write().await.update_tool(id, &input.name, status).map(Json)
}

async fn delete_tool(State(db): State<Db>, ResourceId(id): ResourceId) -> Result<StatusCode, ServerError> {
    db.write().await.delete_tool(id)?;
    tracing::info!(tool_id = %id, "tool deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn checkout_tool(
    State(db): State<Db>,
    ResourceId(id): ResourceId,
    ApiJson(input): ApiJson<ToolActionRequest>,
) -> Result<Json<ToolActionReply>, ServerError> {
    let tool = db.write().await.checkout(id, &input.user_id, &input.notes)?;
    tracing::info!(tool_id = %id, user_id = %input.user_id, "tool checked out");
    Ok(reply("Tool checked out successfully", tool))
}

async fn checkin_tool(
    State(db): State<Db>,
    ResourceId(id): ResourceId,
    ApiJson(input): ApiJson<ToolActionRequest>,
) -> Result<Json<ToolActionReply>, ServerError> {
    let tool = db.write().await.checkin(id, &input.user_id, &input.notes)?;
    tracing::info!(tool_id = %id, user_id = %input.user_id, "tool checked in");
    Ok(reply("Tool checked in successfully", tool))
}

async fn mark_tool_lost(
    State(db): State<Db>,
    ResourceId(id): ResourceId,
    ApiJson(input): ApiJson<ToolActionRequest>,
) -> Result<Json<ToolActionReply>, ServerError> {
    let tool = db.write().await.mark_lost(id, &input.user_id, &input.notes)?;
    Ok(reply("Tool marked as lost", tool))
}

async fn send_tool_to_maintenance(
    State(db): State<Db>,
    ResourceId(id): ResourceId,
    ApiJson(input): ApiJson<ToolActionRequest>,
) -> Result<Json<ToolActionReply>, ServerError> {
    let tool = db
        .write()
        .await
        .send_to_maintenance(id, &input.user_id, &input.notes)?;
    Ok(reply("Tool sent to maintenance", tool))
}

fn reply(message: &str, tool: Tool) -> Json<ToolActionReply> {
    Json(ToolActionReply {
        message: message.to_string(),
        tool,
    })
}

async fn tool_history(State(db): State<Db>, ResourceId(id): ResourceId) -> Json<EventList> {
    Json(EventList {
        events: db.read().await.tool_history(id),
    })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(
    State(db): State<Db>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<UserList>, ServerError> {
    let role = optional(params.role.as_deref())?;
    let page = Page::new(params.limit, params.offset, 10, 100);
    let users = db.read().await.list_users(role, page);
    Ok(Json(UserList { users }))
}

async fn create_user(
    State(db): State<Db>,
    ApiJson(input): ApiJson<UserRequest>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let role = optional(input.role.as_deref())?;
    let user = db.write().await.create_user(&input.name, &input.email, role)?;
    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, ResourceId(id): ResourceId) -> Result<Json<User>, ServerError> {
    db.read().await.get_user(id).map(Json)
}

async fn update_user(
    State(db): State<Db>,
    ResourceId(id): ResourceId,
    ApiJson(input): ApiJson<UserRequest>,
) -> Result<Json<User>, ServerError> {
    let role = optional(input.role.as_deref())?
        .ok_or_else(|| ServerError::Validation("role is required".to_string()))?;
    db.write()
        .await
        .update_user(id, &input.name, &input.email, role)
        .map(Json)
}

async fn delete_user(State(db): State<Db>, ResourceId(id): ResourceId) -> Result<StatusCode, ServerError> {
    db.write().await.delete_user(id)?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn user_activity(State(db): State<Db>, ResourceId(id): ResourceId) -> Json<EventList> {
    Json(EventList {
        events: db.read().await.user_activity(id),
    })
}

async fn user_tools(State(db): State<Db>, ResourceId(id): ResourceId) -> Json<UserTools> {
    Json(UserTools {
        checked_out_tool_ids: db.read().await.user_tools(id),
    })
}

// ---------------------------------------------------------------------------
// Events and admin
// ---------------------------------------------------------------------------

async fn list_events(
    State(db): State<Db>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<EventList>, ServerError> {
    let filter = EventFilter {
        kind: optional(params.kind.as_deref())?,
        tool_id: params
            .tool_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| parse_id(v, "tool_id"))
            .transpose()?,
        user_id: params
            .user_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| parse_id(v, "user_id"))
            .transpose()?,
    };
    let page = Page::new(params.limit, params.offset, 50, 500);
    let events = db.read().await.list_events(&filter, page);
    Ok(Json(EventList { events }))
}

async fn get_event(State(db): State<Db>, ResourceId(id): ResourceId) -> Result<Json<Event>, ServerError> {
    db.read().await.get_event(id).map(Json)
}

async fn stats(State(db): State<Db>) -> Json<Stats> {
    Json(db.read().await.stats())
}

async fn audit(State(db): State<Db>) -> Json<AuditLog> {
    Json(db.read().await.audit())
}

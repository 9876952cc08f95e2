//! Wire types served by the mock backend.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    InOffice,
    CheckedOut,
    Maintenance,
    Lost,
}

impl FromStr for ToolStatus {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_OFFICE" => Ok(ToolStatus::InOffice),
            "CHECKED_OUT" => Ok(ToolStatus::CheckedOut),
            "MAINTENANCE" => Ok(ToolStatus::Maintenance),
            "LOST" => Ok(ToolStatus::Lost),
            other => Err(ServerError::Validation(format!("invalid status {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    Admin,
    Manager,
}

impl FromStr for UserRole {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(UserRole::Employee),
            "ADMIN" => Ok(UserRole::Admin),
            "MANAGER" => Ok(UserRole::Manager),
            _ => Err(ServerError::Validation(
                "invalid role. Valid values: EMPLOYEE, ADMIN, MANAGER".to_string(),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ToolCreated,
    ToolUpdated,
    ToolDeleted,
    ToolCheckedOut,
    ToolCheckedIn,
    ToolMaintenance,
    ToolLost,
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl FromStr for EventType {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| ServerError::Validation(format!("invalid event type {s}")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tool {
    pub id: Uuid,
    pub name: String,
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_out_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<Uuid>,
    pub notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Request bodies. Required fields default to empty so a missing field is a
// 400 validation error rather than a 422 extractor rejection.
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ToolRequest {
    #[serde(default)]
    pub name: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct ToolActionRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tool_id: Option<String>,
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserTools {
    pub checked_out_tool_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolActionReply {
    pub message: String,
    pub tool: Tool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ToolsByStatus {
    pub in_office: usize,
    pub checked_out: usize,
    pub maintenance: usize,
    pub lost: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UsersByRole {
    pub employees: usize,
    pub managers: usize,
    pub admins: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_tools: usize,
    pub total_users: usize,
    pub total_events: usize,
    pub tools_by_status: ToolsByStatus,
    pub users_by_role: UsersByRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLog {
    pub audit_log: Vec<Event>,
    pub total: usize,
}

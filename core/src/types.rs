//! Domain DTOs for the Tool Tracker API.
//!
//! # Design
//! Every entity field is optional: the backend may return partial records and
//! the client enforces no invariants of its own. Enumerations keep an
//! `Unknown` variant so a status added server-side deserializes instead of
//! failing the whole list.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Page size used by the list views.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Returned by `FromStr` on the wire enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: String,
}

/// Implements `as_str`, `ALL`, `Display` and `FromStr` from a single table of
/// wire names, so the strings live in one place next to the serde renames.
macro_rules! wire_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire,)+
                    $ty::Unknown => "UNKNOWN",
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                        expected: [$($wire),+].join(", "),
                    }),
                }
            }
        }
    };
}

/// Lifecycle status of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    InOffice,
    CheckedOut,
    Maintenance,
    Lost,
    #[serde(other)]
    Unknown,
}

wire_names!(ToolStatus, "tool status", {
    InOffice => "IN_OFFICE",
    CheckedOut => "CHECKED_OUT",
    Maintenance => "MAINTENANCE",
    Lost => "LOST",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    Admin,
    Manager,
    #[serde(other)]
    Unknown,
}

wire_names!(UserRole, "user role", {
    Employee => "EMPLOYEE",
    Admin => "ADMIN",
    Manager => "MANAGER",
});

/// Kind of lifecycle transition recorded by an `Event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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
    #[serde(other)]
    Unknown,
}

wire_names!(EventType, "event type", {
    ToolCreated => "TOOL_CREATED",
    ToolUpdated => "TOOL_UPDATED",
    ToolDeleted => "TOOL_DELETED",
    ToolCheckedOut => "TOOL_CHECKED_OUT",
    ToolCheckedIn => "TOOL_CHECKED_IN",
    ToolMaintenance => "TOOL_MAINTENANCE",
    ToolLost => "TOOL_LOST",
    UserCreated => "USER_CREATED",
    UserUpdated => "USER_UPDATED",
    UserDeleted => "USER_DELETED",
});

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A trackable physical asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<ToolStatus>,
    pub current_user_id: Option<String>,
    pub last_checked_out_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An immutable log record of a tool or user lifecycle transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<EventType>,
    pub actor_id: Option<String>,
    pub tool_id: Option<String>,
    pub user_id: Option<String>,
    pub notes: Option<String>,
    /// Opaque to the client; the backend currently sends a string.
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
}

/// The backend replaces the name; an omitted status keeps the current one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Body shared by checkout, checkin, mark-lost and send-to-maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolAction {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
}

impl ToolQuery {
    pub fn first_page() -> Self {
        Self {
            limit: Some(DEFAULT_PAGE_SIZE),
            offset: Some(0),
            status: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl UserQuery {
    pub fn first_page() -> Self {
        Self {
            limit: Some(DEFAULT_PAGE_SIZE),
            offset: Some(0),
            role: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl EventQuery {
    pub fn first_page() -> Self {
        Self {
            limit: Some(DEFAULT_PAGE_SIZE),
            offset: Some(0),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Reply to checkout, checkin, mark-lost and send-to-maintenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolActionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tool: Tool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsByStatus {
    pub in_office: u64,
    pub checked_out: u64,
    pub maintenance: u64,
    pub lost: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersByRole {
    pub employees: u64,
    pub managers: u64,
    pub admins: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_tools: u64,
    pub total_users: u64,
    pub total_events: u64,
    pub tools_by_status: ToolsByStatus,
    pub users_by_role: UsersByRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub audit_log: Vec<Event>,
    #[serde(default)]
    pub total: u64,
}

/// The backend encodes an empty slice as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_tolerates_missing_fields() {
        let tool: Tool = serde_json::from_str(r#"{"id":"t1"}"#).unwrap();
        assert_eq!(tool.id.as_deref(), Some("t1"));
        assert!(tool.name.is_none());
        assert!(tool.status.is_none());
        assert!(tool.created_at.is_none());
    }

    #[test]
    fn unrecognized_status_becomes_unknown() {
        let tool: Tool = serde_json::from_str(r#"{"status":"ON_LOAN"}"#).unwrap();
        assert_eq!(tool.status, Some(ToolStatus::Unknown));
    }

    #[test]
    fn tool_parses_backend_timestamps() {
        let tool: Tool = serde_json::from_str(
            r#"{"id":"t1","name":"Drill","status":"CHECKED_OUT",
                "current_user_id":"u1",
                "last_checked_out_at":"2024-03-05T10:15:30.123456Z",
                "created_at":"2024-03-01T08:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(tool.status, Some(ToolStatus::CheckedOut));
        assert_eq!(
            tool.created_at.unwrap().to_rfc3339(),
            "2024-03-01T06:00:00+00:00"
        );
        assert!(tool.last_checked_out_at.is_some());
    }

    #[test]
    fn event_reads_type_and_string_metadata() {
        let event: Event = serde_json::from_str(
            r#"{"id":"e1","type":"TOOL_LOST","tool_id":"t1","notes":"","metadata":"{\"k\":1}"}"#,
        )
        .unwrap();
        assert_eq!(event.kind, Some(EventType::ToolLost));
        assert_eq!(event.metadata, Some(serde_json::Value::String("{\"k\":1}".into())));
    }

    #[test]
    fn create_tool_omits_absent_status() {
        let body = serde_json::to_value(CreateTool {
            name: "Saw".to_string(),
            status: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"name": "Saw"}));
    }

    #[test]
    fn tool_action_serializes_notes_only_when_present() {
        let body = serde_json::to_value(ToolAction {
            user_id: "u1".to_string(),
            notes: Some("site B".to_string()),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"user_id": "u1", "notes": "site B"}));
    }

    #[test]
    fn enum_names_parse_and_display() {
        for status in ToolStatus::ALL {
            assert_eq!(status.as_str().parse::<ToolStatus>().unwrap(), *status);
        }
        assert_eq!(UserRole::Manager.to_string(), "MANAGER");
        assert_eq!("TOOL_CHECKED_IN".parse::<EventType>().unwrap(), EventType::ToolCheckedIn);
    }

    #[test]
    fn parsing_rejects_lowercase_names() {
        let err = "in_office".parse::<ToolStatus>().unwrap_err();
        assert!(err.to_string().contains("IN_OFFICE"));
        assert!("UNKNOWN".parse::<UserRole>().is_err());
    }

    #[test]
    fn audit_log_accepts_null_entries() {
        let log: AuditLog = serde_json::from_str(r#"{"audit_log":null,"total":0}"#).unwrap();
        assert!(log.audit_log.is_empty());
    }

    #[test]
    fn stats_default_missing_sections() {
        let stats: Stats = serde_json::from_str(r#"{"total_tools":3}"#).unwrap();
        assert_eq!(stats.total_tools, 3);
        assert_eq!(stats.tools_by_status, ToolsByStatus::default());
    }
}

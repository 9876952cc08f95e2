//! Stateless HTTP request builder and response parser for the Tool Tracker
//! API.
//!
//! # Design
//! `TrackerClient` holds only a `base_url`. Each endpoint has a `build_*`
//! method producing an `HttpRequest`; responses are grouped by shape, so one
//! `parse_*` method serves every endpoint returning that shape (for example
//! `parse_tool` for get, create and update). Any 2xx status is a success.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuditLog, CreateTool, CreateUser, Event, EventQuery, Stats, Tool, ToolAction,
    ToolActionResponse, ToolQuery, UpdateTool, UpdateUser, User, UserQuery,
};

/// Synchronous, stateless client for the Tool Tracker API.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    base_url: String,
}

impl TrackerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Tools
    // -----------------------------------------------------------------------

    pub fn build_list_tools(&self, query: &ToolQuery) -> Result<HttpRequest, ApiError> {
        Ok(self.get(self.url_with_query("/tools", query)?))
    }

    pub fn build_create_tool(&self, input: &CreateTool) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, "/tools".to_string(), input)
    }

    pub fn build_get_tool(&self, id: &str) -> HttpRequest {
        self.get(self.url(&format!("/tools/{id}")))
    }

    pub fn build_update_tool(&self, id: &str, input: &UpdateTool) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Put, format!("/tools/{id}"), input)
    }

    pub fn build_delete_tool(&self, id: &str) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Delete, self.url(&format!("/tools/{id}")))
    }

    pub fn build_checkout_tool(&self, id: &str, input: &ToolAction) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, format!("/tools/{id}/checkout"), input)
    }

    pub fn build_checkin_tool(&self, id: &str, input: &ToolAction) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, format!("/tools/{id}/checkin"), input)
    }

    pub fn build_mark_tool_lost(&self, id: &str, input: &ToolAction) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, format!("/tools/{id}/lost"), input)
    }

    pub fn build_send_tool_to_maintenance(
        &self,
        id: &str,
        input: &ToolAction,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, format!("/tools/{id}/maintenance"), input)
    }

    pub fn build_tool_history(&self, id: &str) -> HttpRequest {
        self.get(self.url(&format!("/tools/{id}/history")))
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn build_list_users(&self, query: &UserQuery) -> Result<HttpRequest, ApiError> {
        Ok(self.get(self.url_with_query("/users", query)?))
    }

    pub fn build_create_user(&self, input: &CreateUser) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, "/users".to_string(), input)
    }

    pub fn build_get_user(&self, id: &str) -> HttpRequest {
        self.get(self.url(&format!("/users/{id}")))
    }

    pub fn build_update_user(&self, id: &str, input: &UpdateUser) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Put, format!("/users/{id}"), input)
    }

    pub fn build_delete_user(&self, id: &str) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Delete, self.url(&format!("/users/{id}")))
    }

    pub fn build_user_activity(&self, id: &str) -> HttpRequest {
        self.get(self.url(&format!("/users/{id}/activity")))
    }

    pub fn build_user_tools(&self, id: &str) -> HttpRequest {
        self.get(self.url(&format!("/users/{id}/tools")))
    }

    // -----------------------------------------------------------------------
    // Events and admin
    // -----------------------------------------------------------------------

    pub fn build_list_events(&self, query: &EventQuery) -> Result<HttpRequest, ApiError> {
        Ok(self.get(self.url_with_query("/events", query)?))
    }

    pub fn build_get_event(&self, id: &str) -> HttpRequest {
        self.get(self.url(&format!("/events/{id}")))
    }

    pub fn build_stats(&self) -> HttpRequest {
        self.get(self.url("/admin/stats"))
    }

    pub fn build_audit_log(&self) -> HttpRequest {
        self.get(self.url("/admin/audit"))
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    /// Parse `GET /tools`.
    pub fn parse_tools(&self, response: HttpResponse) -> Result<Vec<Tool>, ApiError> {
        parse_collection(response)
    }

    /// Parse get, create and update of a single tool.
    pub fn parse_tool(&self, response: HttpResponse) -> Result<Tool, ApiError> {
        parse_json(response)
    }

    /// Parse checkout, checkin, mark-lost and send-to-maintenance.
    pub fn parse_tool_action(&self, response: HttpResponse) -> Result<ToolActionResponse, ApiError> {
        parse_json(response)
    }

    /// Parse `GET /users`.
    pub fn parse_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        parse_collection(response)
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(response)
    }

    /// Parse `GET /users/{id}/tools` into the ids of tools the user checked out.
    pub fn parse_user_tools(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        parse_collection(response)
    }

    /// Parse event lists: `GET /events`, tool history and user activity.
    pub fn parse_events(&self, response: HttpResponse) -> Result<Vec<Event>, ApiError> {
        parse_collection(response)
    }

    pub fn parse_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        parse_json(response)
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<Stats, ApiError> {
        parse_json(response)
    }

    pub fn parse_audit_log(&self, response: HttpResponse) -> Result<AuditLog, ApiError> {
        parse_json(response)
    }

    /// Parse any delete; the body is ignored.
    pub fn parse_deleted(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn url_with_query<Q: Serialize>(&self, path: &str, query: &Q) -> Result<String, ApiError> {
        let query =
            serde_urlencoded::to_string(query).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        if query.is_empty() {
            Ok(self.url(path))
        } else {
            Ok(format!("{}?{query}", self.url(path)))
        }
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, url)
    }

    fn send_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(method, self.url(&path), body))
    }
}

/// Error body sent by the backend on every failure.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let message = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => body.error,
        Err(_) => response.body.trim().to_string(),
    };
    Err(ApiError::HttpError {
        status: response.status,
        message,
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Collections arrive wrapped, e.g. `{"tools": [...]}`. Every array in the
/// envelope is flattened in the order the keys arrived; a `null` array
/// counts as empty.
fn parse_collection<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, ApiError> {
    let envelope: serde_json::Map<String, serde_json::Value> = parse_json(response)?;
    let mut items = Vec::new();
    for (_, value) in envelope {
        let batch: Option<Vec<T>> =
            serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        items.extend(batch.into_iter().flatten());
    }
    Ok(items)
}

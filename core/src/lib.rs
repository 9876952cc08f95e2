//! Client core for the Tool Tracker inventory service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and drives the list screens
//! that show tools, users and events.
//!
//! # Design
//! - `TrackerClient` is stateless; it holds only the base URL.
//! - Every endpoint has a `build_*` method; `parse_*` methods are grouped by
//!   response shape.
//! - `ListView` fetches once through any future and renders a `Screen`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod types;
pub mod view;

pub use client::TrackerClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{Badge, Card, Detail, Listable, Screen};
pub use types::{
    AuditLog, CreateTool, CreateUser, Event, EventQuery, EventType, Stats, Tool, ToolAction,
    ToolActionResponse, ToolQuery, ToolStatus, ToolsByStatus, UpdateTool, UpdateUser, User,
    UserQuery, UserRole, UsersByRole,
};
pub use view::{ListView, ViewState};

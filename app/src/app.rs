//! Runs one command against the backend and formats its output.
//!
//! List commands go through a `ListView`, so their failures render as the
//! error banner. Every other command returns its `ApiError` to the caller.

use std::sync::Arc;

use tool_tracker_core::{
    ApiError, CreateTool, CreateUser, EventQuery, HttpRequest, HttpResponse, Listable, ListView,
    Screen, Stats, ToolAction, ToolActionResponse, ToolQuery, TrackerClient, UpdateTool,
    UpdateUser, UserQuery,
};
use tracing::info;

use crate::cli::{ActionArgs, Command, Format};
use crate::transport::{self, Transport};

type Parse<T> = fn(&TrackerClient, HttpResponse) -> Result<Vec<T>, ApiError>;

pub struct App {
    client: TrackerClient,
    transport: Arc<dyn Transport>,
    format: Format,
}

impl App {
    pub fn new(client: TrackerClient, transport: Arc<dyn Transport>, format: Format) -> Self {
        Self {
            client,
            transport,
            format,
        }
    }

    pub async fn run(&self, command: Command) -> Result<String, ApiError> {
        let c = &self.client;
        let output = match command {
            Command::Tools { status, page } => {
                let query = ToolQuery {
                    limit: Some(page.limit),
                    offset: Some(page.offset),
                    status,
                };
                self.list(c.build_list_tools(&query), TrackerClient::parse_tools)
                    .await
            }
            Command::Users { role, page } => {
                let query = UserQuery {
                    limit: Some(page.limit),
                    offset: Some(page.offset),
                    role,
                };
                self.list(c.build_list_users(&query), TrackerClient::parse_users)
                    .await
            }
            Command::Events {
                kind,
                tool_id,
                user_id,
                page,
            } => {
                let query = EventQuery {
                    limit: Some(page.limit),
                    offset: Some(page.offset),
                    kind,
                    tool_id,
                    user_id,
                };
                self.list(c.build_list_events(&query), TrackerClient::parse_events)
                    .await
            }
            Command::History { id } => {
                self.list(Ok(c.build_tool_history(&id)), TrackerClient::parse_events)
                    .await
            }
            Command::Activity { id } => {
                self.list(Ok(c.build_user_activity(&id)), TrackerClient::parse_events)
                    .await
            }
            Command::Audit => {
                self.list(Ok(c.build_audit_log()), |c, response| {
                    c.parse_audit_log(response).map(|audit| audit.audit_log)
                })
                .await
            }

            Command::Tool { id } => {
                let tool = c.parse_tool(self.send(c.build_get_tool(&id)).await?)?;
                self.record(&tool)
            }
            Command::User { id } => {
                let user = c.parse_user(self.send(c.build_get_user(&id)).await?)?;
                self.record(&user)
            }
            Command::Event { id } => {
                let event = c.parse_event(self.send(c.build_get_event(&id)).await?)?;
                self.record(&event)
            }

            Command::CreateTool { name, status } => {
                let request = c.build_create_tool(&CreateTool { name, status })?;
                let tool = c.parse_tool(self.send(request).await?)?;
                info!(tool_id = ?tool.id, "tool created");
                self.record(&tool)
            }
            Command::UpdateTool { id, name, status } => {
                let request = c.build_update_tool(&id, &UpdateTool { name, status })?;
                let tool = c.parse_tool(self.send(request).await?)?;
                self.record(&tool)
            }
            Command::DeleteTool { id } => {
                c.parse_deleted(self.send(c.build_delete_tool(&id)).await?)?;
                info!(tool_id = %id, "tool deleted");
                format!("Deleted tool {id}\n")
            }
            Command::Checkout(args) => {
                let request = c.build_checkout_tool(&args.id, &action(&args))?;
                self.tool_action(request).await?
            }
            Command::Checkin(args) => {
                let request = c.build_checkin_tool(&args.id, &action(&args))?;
                self.tool_action(request).await?
            }
            Command::Lost(args) => {
                let request = c.build_mark_tool_lost(&args.id, &action(&args))?;
                self.tool_action(request).await?
            }
            Command::Maintenance(args) => {
                let request = c.build_send_tool_to_maintenance(&args.id, &action(&args))?;
                self.tool_action(request).await?
            }

            Command::CreateUser { name, email, role } => {
                let request = c.build_create_user(&CreateUser { name, email, role })?;
                let user = c.parse_user(self.send(request).await?)?;
                info!(user_id = ?user.id, "user created");
                self.record(&user)
            }
            Command::UpdateUser {
                id,
                name,
                email,
                role,
            } => {
                let request = c.build_update_user(&id, &UpdateUser { name, email, role })?;
                let user = c.parse_user(self.send(request).await?)?;
                self.record(&user)
            }
            Command::DeleteUser { id } => {
                c.parse_deleted(self.send(c.build_delete_user(&id)).await?)?;
                info!(user_id = %id, "user deleted");
                format!("Deleted user {id}\n")
            }
            Command::UserTools { id } => {
                let ids = c.parse_user_tools(self.send(c.build_user_tools(&id)).await?)?;
                if ids.is_empty() {
                    "No tools checked out.\n".to_string()
                } else {
                    ids.iter().map(|id| format!("{id}\n")).collect()
                }
            }
            Command::Stats => {
                let stats = c.parse_stats(self.send(c.build_stats()).await?)?;
                stats_report(&stats)
            }
        };
        Ok(output)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        transport::send(Arc::clone(&self.transport), request).await
    }

    /// Activate a fresh view with one fetch and render whatever it settled on.
    async fn list<T: Listable>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: Parse<T>,
    ) -> String {
        let mut view = ListView::new();
        view.activate(async {
            let response = self.send(request?).await?;
            parse(&self.client, response)
        })
        .await;
        self.format.screen(&view.render())
    }

    fn record<T: Listable>(&self, item: &T) -> String {
        self.format.screen(&Screen::Cards {
            heading: T::HEADING,
            cards: vec![item.card(0)],
        })
    }

    async fn tool_action(&self, request: HttpRequest) -> Result<String, ApiError> {
        let ToolActionResponse { message, tool } =
            self.client.parse_tool_action(self.send(request).await?)?;
        let mut output = message.map(|m| format!("{m}\n")).unwrap_or_default();
        output.push_str(&self.record(&tool));
        Ok(output)
    }
}

fn action(args: &ActionArgs) -> ToolAction {
    ToolAction {
        user_id: args.user_id.clone(),
        notes: args.notes.clone(),
    }
}

fn stats_report(stats: &Stats) -> String {
    let tools = &stats.tools_by_status;
    let users = &stats.users_by_role;
    format!(
        "Tools: {} (in office {}, checked out {}, maintenance {}, lost {})\n\
         Users: {} (employees {}, managers {}, admins {})\n\
         Events: {}\n",
        stats.total_tools,
        tools.in_office,
        tools.checked_out,
        tools.maintenance,
        tools.lost,
        stats.total_users,
        users.employees,
        users.managers,
        users.admins,
        stats.total_events,
    )
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use tool_tracker_core::types::DEFAULT_PAGE_SIZE;
use tool_tracker_core::{ClientConfig, EventType, Screen, ToolStatus, UserRole};

const AFTER_HELP: &str = "\
Environment:
  TOOL_TRACKER_API_URL   Backend base URL (default http://localhost:8080/api)
  RUST_LOG               Log filter, logs go to stderr (default tool_tracker=info)";

#[derive(Debug, Parser)]
#[command(name = "tool-tracker")]
#[command(about = "Browse and manage the Tool Tracker inventory")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Backend base URL; overrides TOOL_TRACKER_API_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// `--base-url` when non-blank, else the environment value, else the default.
    pub fn client_config(&self, from_env: Option<String>) -> ClientConfig {
        ClientConfig::resolve(self.base_url.clone(), from_env)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Html,
}

impl Format {
    pub fn screen(self, screen: &Screen) -> String {
        match self {
            Format::Text => screen.to_string(),
            Format::Html => screen.html().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ActionArgs {
    /// Tool id.
    pub id: String,
    /// Id of the user performing the action.
    #[arg(long = "user")]
    pub user_id: String,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List tools, newest first.
    Tools {
        #[arg(long)]
        status: Option<ToolStatus>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List users, newest first.
    Users {
        #[arg(long)]
        role: Option<UserRole>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List events, newest first.
    Events {
        #[arg(long = "type")]
        kind: Option<EventType>,
        #[arg(long)]
        tool_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Tool {
        id: String,
    },
    User {
        id: String,
    },
    Event {
        id: String,
    },
    CreateTool {
        name: String,
        #[arg(long)]
        status: Option<ToolStatus>,
    },
    /// Rename a tool; the status is kept unless given.
    UpdateTool {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        status: Option<ToolStatus>,
    },
    DeleteTool {
        id: String,
    },
    Checkout(ActionArgs),
    Checkin(ActionArgs),
    Lost(ActionArgs),
    Maintenance(ActionArgs),
    /// Events recorded for a tool.
    History {
        id: String,
    },
    CreateUser {
        name: String,
        email: String,
        #[arg(long)]
        role: Option<UserRole>,
    },
    UpdateUser {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: UserRole,
    },
    DeleteUser {
        id: String,
    },
    /// Events where the user is the subject or the actor.
    Activity {
        id: String,
    },
    /// Ids of the tools a user has checked out.
    UserTools {
        id: String,
    },
    Stats,
    /// The most recent events across the system.
    Audit,
}

//! Pure rendering of list screens.
//!
//! A `ListView` turns into a `Screen`: a spinner, an error banner, an empty
//! state, or one `Card` per entity. Screens print as plain text through
//! `Display` and as an HTML fragment through `Screen::html`, using the same
//! Tailwind classes as the browser UI.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::{Event, EventType, Tool, ToolStatus, User, UserRole};

const GRAY: &str = "bg-gray-100 text-gray-800";
const GREEN: &str = "bg-green-100 text-green-800";
const YELLOW: &str = "bg-yellow-100 text-yellow-800";
const ORANGE: &str = "bg-orange-100 text-orange-800";
const RED: &str = "bg-red-100 text-red-800";
const BLUE: &str = "bg-blue-100 text-blue-800";
const INDIGO: &str = "bg-indigo-100 text-indigo-800";
const PURPLE: &str = "bg-purple-100 text-purple-800";

/// Label and color classes shown in a card's corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
}

impl Badge {
    pub const UNKNOWN: Badge = Badge {
        label: "Unknown",
        color: GRAY,
    };

    const fn new(label: &'static str, color: &'static str) -> Self {
        Self { label, color }
    }
}

pub fn tool_status_badge(status: Option<ToolStatus>) -> Badge {
    match status {
        Some(ToolStatus::InOffice) => Badge::new("In Office", GREEN),
        Some(ToolStatus::CheckedOut) => Badge::new("Checked Out", YELLOW),
        Some(ToolStatus::Maintenance) => Badge::new("Maintenance", ORANGE),
        Some(ToolStatus::Lost) => Badge::new("Lost", RED),
        Some(ToolStatus::Unknown) | None => Badge::UNKNOWN,
    }
}

pub fn user_role_badge(role: Option<UserRole>) -> Badge {
    match role {
        Some(UserRole::Employee) => Badge::new("Employee", BLUE),
        Some(UserRole::Manager) => Badge::new("Manager", INDIGO),
        Some(UserRole::Admin) => Badge::new("Admin", PURPLE),
        Some(UserRole::Unknown) | None => Badge::UNKNOWN,
    }
}

pub fn event_type_badge(kind: Option<EventType>) -> Badge {
    match kind {
        Some(EventType::ToolCreated) => Badge::new("Tool Created", GREEN),
        Some(EventType::ToolUpdated) => Badge::new("Tool Updated", BLUE),
        Some(EventType::ToolDeleted) => Badge::new("Tool Deleted", RED),
        Some(EventType::ToolCheckedOut) => Badge::new("Checked Out", YELLOW),
        Some(EventType::ToolCheckedIn) => Badge::new("Checked In", GREEN),
        Some(EventType::ToolMaintenance) => Badge::new("Maintenance", ORANGE),
        Some(EventType::ToolLost) => Badge::new("Lost", RED),
        Some(EventType::UserCreated) => Badge::new("User Created", GREEN),
        Some(EventType::UserUpdated) => Badge::new("User Updated", BLUE),
        Some(EventType::UserDeleted) => Badge::new("User Deleted", RED),
        Some(EventType::Unknown) | None => Badge::UNKNOWN,
    }
}

/// One `Label: value` line on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// The entity id, or `#<position>` when the backend omitted it.
    pub key: String,
    pub title: String,
    pub badge: Badge,
    pub details: Vec<Detail>,
}

/// An entity that can be shown as a card in a list screen.
pub trait Listable {
    /// Heading above the cards.
    const HEADING: &'static str;
    /// Plural noun used in the loading label, e.g. "tools".
    const NOUN: &'static str;
    /// Shown when the fetched collection is empty.
    const EMPTY: &'static str;

    fn key(&self) -> Option<&str>;
    fn title(&self) -> String;
    fn badge(&self) -> Badge;
    /// Lines for the fields that are present; absent fields produce nothing.
    fn details(&self) -> Vec<Detail>;

    fn card(&self, position: usize) -> Card {
        Card {
            key: self
                .key()
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{position}")),
            title: self.title(),
            badge: self.badge(),
            details: self.details(),
        }
    }
}

fn date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

fn push_detail(details: &mut Vec<Detail>, label: &'static str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        details.push(Detail { label, value });
    }
}

impl Listable for Tool {
    const HEADING: &'static str = "Tool Inventory";
    const NOUN: &'static str = "tools";
    const EMPTY: &'static str = "No tools found. Try adding some tools first.";

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    fn badge(&self) -> Badge {
        tool_status_badge(self.status)
    }

    fn details(&self) -> Vec<Detail> {
        let mut details = Vec::new();
        push_detail(&mut details, "ID", self.id.clone());
        push_detail(&mut details, "Checked out to", self.current_user_id.clone());
        push_detail(&mut details, "Last checked out", self.last_checked_out_at.as_ref().map(date));
        push_detail(&mut details, "Created", self.created_at.as_ref().map(date));
        details
    }
}

impl Listable for User {
    const HEADING: &'static str = "Team Members";
    const NOUN: &'static str = "users";
    const EMPTY: &'static str = "No users found. Try adding some users first.";

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    fn badge(&self) -> Badge {
        user_role_badge(self.role)
    }

    fn details(&self) -> Vec<Detail> {
        let mut details = Vec::new();
        push_detail(&mut details, "ID", self.id.clone());
        push_detail(&mut details, "Email", self.email.clone());
        push_detail(&mut details, "Joined", self.created_at.as_ref().map(date));
        details
    }
}

impl Listable for Event {
    const HEADING: &'static str = "Activity Log";
    const NOUN: &'static str = "events";
    const EMPTY: &'static str = "No events recorded yet.";

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> String {
        match (&self.tool_id, &self.user_id) {
            (Some(tool), _) => format!("Tool {tool}"),
            (None, Some(user)) => format!("User {user}"),
            (None, None) => "Event".to_string(),
        }
    }

    fn badge(&self) -> Badge {
        event_type_badge(self.kind)
    }

    fn details(&self) -> Vec<Detail> {
        let mut details = Vec::new();
        push_detail(&mut details, "ID", self.id.clone());
        if self.tool_id.is_some() {
            push_detail(&mut details, "User", self.user_id.clone());
        }
        push_detail(&mut details, "Actor", self.actor_id.clone());
        push_detail(&mut details, "Notes", self.notes.clone());
        push_detail(
            &mut details,
            "Metadata",
            self.metadata.as_ref().map(|m| match m {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        );
        push_detail(&mut details, "Recorded", self.created_at.as_ref().map(date));
        details
    }
}

/// What a list view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading { label: String },
    Failed { message: String },
    Empty { heading: &'static str, message: &'static str },
    Cards { heading: &'static str, cards: Vec<Card> },
}

impl Screen {
    /// Cards on screen; empty for every state but `Cards`.
    pub fn cards(&self) -> &[Card] {
        match self {
            Screen::Cards { cards, .. } => cards,
            _ => &[],
        }
    }

    pub fn html(&self) -> Html<'_> {
        Html(self)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading { label } => writeln!(f, "{label}"),
            Screen::Failed { message } => writeln!(f, "Error: {message}"),
            Screen::Empty { heading, message } => {
                writeln!(f, "{heading}")?;
                writeln!(f)?;
                writeln!(f, "{message}")
            }
            Screen::Cards { heading, cards } => {
                writeln!(f, "{heading}")?;
                for card in cards {
                    writeln!(f)?;
                    writeln!(f, "{} [{}]", card.title, card.badge.label)?;
                    for detail in &card.details {
                        writeln!(f, "  {}: {}", detail.label, detail.value)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// HTML rendering of a `Screen`, see `Screen::html`.
pub struct Html<'a>(&'a Screen);

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Screen::Loading { label } => write!(
                f,
                r#"<div class="flex items-center justify-center p-8"><div class="animate-spin rounded-full h-8 w-8 border-b-2 border-blue-600"></div><span class="ml-2">{}</span></div>"#,
                Escaped(label)
            ),
            Screen::Failed { message } => write!(
                f,
                r#"<div class="bg-red-50 border border-red-200 rounded-md p-4 m-4"><div class="text-red-800"><strong>Error:</strong> {}</div></div>"#,
                Escaped(message)
            ),
            Screen::Empty { heading, message } => {
                write_heading(f, heading)?;
                write!(
                    f,
                    r#"<div class="text-center py-8 text-gray-500">{}</div></div>"#,
                    Escaped(message)
                )
            }
            Screen::Cards { heading, cards } => {
                write_heading(f, heading)?;
                f.write_str(r#"<div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">"#)?;
                for card in cards {
                    write_card(f, card)?;
                }
                f.write_str("</div></div>")
            }
        }
    }
}

fn write_heading(f: &mut fmt::Formatter<'_>, heading: &str) -> fmt::Result {
    write!(
        f,
        r#"<div class="p-6"><h2 class="text-2xl font-bold text-gray-900 mb-6">{}</h2>"#,
        Escaped(heading)
    )
}

fn write_card(f: &mut fmt::Formatter<'_>, card: &Card) -> fmt::Result {
    write!(
        f,
        r#"<div data-key="{}" class="bg-white rounded-lg shadow-md p-6 border border-gray-200">"#,
        Escaped(&card.key)
    )?;
    write!(
        f,
        r#"<div class="flex justify-between items-start mb-4"><h3 class="text-lg font-semibold text-gray-900">{}</h3><span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium {}">{}</span></div>"#,
        Escaped(&card.title),
        card.badge.color,
        card.badge.label
    )?;
    f.write_str(r#"<div class="space-y-2 text-sm text-gray-600">"#)?;
    for detail in &card.details {
        write!(
            f,
            "<div><strong>{}:</strong> {}</div>",
            detail.label,
            Escaped(&detail.value)
        )?;
    }
    f.write_str("</div></div>")
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => fmt::Write::write_char(f, c)?,
            }
        }
        Ok(())
    }
}

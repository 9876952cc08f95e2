//! In-memory state with the backend's lifecycle rules.
//!
//! Records are kept in insertion order and listed newest-first. Every
//! mutation appends an `Event`. Checkouts and checkins name the acting user
//! as the actor, lost and maintenance events carry none, and the rest are
//! attributed to `SYSTEM_USER_ID` since the mock has no authentication.

use chrono::Utc;
use uuid::Uuid;

use crate::error::ServerError;
use crate::model::{
    AuditLog, Event, EventType, Stats, Tool, ToolStatus, ToolsByStatus, User, UserRole, UsersByRole,
};

/// Actor recorded on create, update and delete events.
pub const SYSTEM_USER_ID: Uuid = Uuid::from_u128(1);

const AUDIT_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Non-positive limits fall back to `default`, large ones clamp to `max`,
    /// negative offsets become zero.
    pub fn new(limit: Option<i64>, offset: Option<i64>, default: usize, max: usize) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => (l as usize).min(max),
            _ => default,
        };
        let offset = offset.filter(|o| *o > 0).map_or(0, |o| o as usize);
        Self { limit, offset }
    }

    fn apply<'a, T: 'a>(self, newest_first: impl Iterator<Item = &'a T>) -> impl Iterator<Item = &'a T> {
        newest_first.skip(self.offset).take(self.limit)
    }
}

#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    pub kind: Option<EventType>,
    pub tool_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl EventFilter {
    fn matches(&self, event: &Event) -> bool {
        self.kind.is_none_or(|k| event.kind == k)
            && self.tool_id.is_none_or(|id| event.tool_id == Some(id))
            && self.user_id.is_none_or(|id| event.user_id == Some(id))
    }
}

#[derive(Debug, Default)]
pub struct Store {
    tools: Vec<Tool>,
    users: Vec<User>,
    events: Vec<Event>,
}

impl Store {
    /// A small inventory for manual runs of the server binary.
    pub fn with_demo_data() -> Self {
        let mut store = Store::default();
        if let Err(err) = store.seed() {
            tracing::warn!(error = %err, "demo data incomplete");
        }
        store
    }

    fn seed(&mut self) -> Result<(), ServerError> {
        let ada = self.create_user("Ada Lovelace", "ada@example.com", None)?;
        self.create_user("Grace Hopper", "grace@example.com", Some(UserRole::Manager))?;
        self.create_tool("Cordless Drill", None)?;
        let saw = self.create_tool("Circular Saw", None)?;
        let ladder = self.create_tool("Step Ladder", None)?;
        self.checkout(saw.id, &ada.id.to_string(), "Site B renovation")?;
        self.send_to_maintenance(ladder.id, &ada.id.to_string(), "Loose rung")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tools
    // -----------------------------------------------------------------------

    pub fn list_tools(&self, status: Option<ToolStatus>, page: Page) -> Vec<Tool> {
        page.apply(
            self.tools
                .iter()
                .rev()
                .filter(|t| status.is_none_or(|s| t.status == s)),
        )
        .cloned()
        .collect()
    }

    pub fn create_tool(&mut self, name: &str, status: Option<ToolStatus>) -> Result<Tool, ServerError> {
        let name = required(name, "name")?;
        let now = Utc::now();
        let tool = Tool {
            id: Uuid::new_v4(),
            name,
            status: status.unwrap_or(ToolStatus::InOffice),
            current_user_id: None,
            last_checked_out_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tools.push(tool.clone());
        self.log(EventType::ToolCreated, Some(tool.id), None, Some(SYSTEM_USER_ID), "Tool created");
        Ok(tool)
    }

    pub fn get_tool(&self, id: Uuid) -> Result<Tool, ServerError> {
        self.tools
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ServerError::NotFound)
    }

    /// Replace the name; an omitted status keeps the current one.
    pub fn update_tool(
        &mut self,
        id: Uuid,
        name: &str,
        status: Option<ToolStatus>,
    ) -> Result<Tool, ServerError> {
        let name = required(name, "name")?;
        let tool = self.tool_mut(id)?;
        tool.name = name;
        if let Some(status) = status {
            tool.status = status;
        }
        tool.updated_at = Utc::now();
        let tool = tool.clone();
        self.log(EventType::ToolUpdated, Some(id), None, Some(SYSTEM_USER_ID), "Tool updated");
        Ok(tool)
    }

    pub fn delete_tool(&mut self, id: Uuid) -> Result<(), ServerError> {
        let index = self
            .tools
            .iter()
            .position(|t| t.id == id)
            .ok_or(ServerError::NotFound)?;
        self.tools.remove(index);
        self.log(EventType::ToolDeleted, Some(id), None, Some(SYSTEM_USER_ID), "Tool deleted");
        Ok(())
    }

    /// Only a tool that is in the office can be checked out.
    pub fn checkout(&mut self, id: Uuid, user_id: &str, notes: &str) -> Result<Tool, ServerError> {
        let user_id = self.existing_user(user_id)?;
        let tool = self.tool_mut(id)?;
        if tool.status != ToolStatus::InOffice {
            return Err(ServerError::Validation(
                "tool is not available for checkout".to_string(),
            ));
        }
        let now = Utc::now();
        tool.status = ToolStatus::CheckedOut;
        tool.current_user_id = Some(user_id);
        tool.last_checked_out_at = Some(now);
        tool.updated_at = now;
        let tool = tool.clone();
        self.log(EventType::ToolCheckedOut, Some(id), Some(user_id), Some(user_id), notes);
        Ok(tool)
    }

    /// Only a checked-out tool can be checked in.
    pub fn checkin(&mut self, id: Uuid, user_id: &str, notes: &str) -> Result<Tool, ServerError> {
        let user_id = self.existing_user(user_id)?;
        let tool = self.tool_mut(id)?;
        if tool.status != ToolStatus::CheckedOut {
            return Err(ServerError::Validation("tool is not checked out".to_string()));
        }
        tool.status = ToolStatus::InOffice;
        tool.current_user_id = None;
        tool.updated_at = Utc::now();
        let tool = tool.clone();
        self.log(EventType::ToolCheckedIn, Some(id), Some(user_id), Some(user_id), notes);
        Ok(tool)
    }

    pub fn mark_lost(&mut self, id: Uuid, user_id: &str, notes: &str) -> Result<Tool, ServerError> {
        self.park(id, user_id, notes, ToolStatus::Lost, EventType::ToolLost)
    }

    pub fn send_to_maintenance(&mut self, id: Uuid, user_id: &str, notes: &str) -> Result<Tool, ServerError> {
        self.park(id, user_id, notes, ToolStatus::Maintenance, EventType::ToolMaintenance)
    }

    /// Move a tool out of circulation from any status, releasing its holder.
    fn park(
        &mut self,
        id: Uuid,
        user_id: &str,
        notes: &str,
        status: ToolStatus,
        kind: EventType,
    ) -> Result<Tool, ServerError> {
        let user_id = self.existing_user(user_id)?;
        let tool = self.tool_mut(id)?;
        tool.status = status;
        tool.current_user_id = None;
        tool.updated_at = Utc::now();
        let tool = tool.clone();
        self.log(kind, Some(id), Some(user_id), None, notes);
        Ok(tool)
    }

    pub fn tool_history(&self, id: Uuid) -> Vec<Event> {
        self.events
            .iter()
            .rev()
            .filter(|e| e.tool_id == Some(id))
            .cloned()
            .collect()
    }

    fn tool_mut(&mut self, id: Uuid) -> Result<&mut Tool, ServerError> {
        self.tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ServerError::NotFound)
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn list_users(&self, role: Option<UserRole>, page: Page) -> Vec<User> {
        page.apply(
            self.users
                .iter()
                .rev()
                .filter(|u| role.is_none_or(|r| u.role == r)),
        )
        .cloned()
        .collect()
    }

    pub fn create_user(&mut self, name: &str, email: &str, role: Option<UserRole>) -> Result<User, ServerError> {
        let name = required(name, "name")?;
        let email = valid_email(email)?;
        if self.users.iter().any(|u| u.email == email) {
            return Err(ServerError::Conflict(format!(
                "user with email '{email}' already exists"
            )));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            role: role.unwrap_or(UserRole::Employee),
            created_at: now,
            updated_at: now,
        };
        self.users.push(user.clone());
        self.log(EventType::UserCreated, None, Some(user.id), Some(SYSTEM_USER_ID), "User created");
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<User, ServerError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ServerError::NotFound)
    }

    pub fn update_user(&mut self, id: Uuid, name: &str, email: &str, role: UserRole) -> Result<User, ServerError> {
        let name = required(name, "name")?;
        let email = valid_email(email)?;
        if self.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(ServerError::Conflict(format!(
                "user with email '{email}' already exists"
            )));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ServerError::NotFound)?;
        user.name = name;
        user.email = email;
        user.role = role;
        user.updated_at = Utc::now();
        let user = user.clone();
        self.log(EventType::UserUpdated, None, Some(id), Some(SYSTEM_USER_ID), "User updated");
        Ok(user)
    }

    pub fn delete_user(&mut self, id: Uuid) -> Result<(), ServerError> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ServerError::NotFound)?;
        self.users.remove(index);
        self.log(EventType::UserDeleted, None, Some(id), Some(SYSTEM_USER_ID), "User deleted");
        Ok(())
    }

    /// Events naming the user as subject or actor.
    pub fn user_activity(&self, id: Uuid) -> Vec<Event> {
        self.events
            .iter()
            .rev()
            .filter(|e| e.user_id == Some(id) || e.actor_id == Some(id))
            .cloned()
            .collect()
    }

    /// Tools the user has checked out, newest checkout first.
    pub fn user_tools(&self, id: Uuid) -> Vec<Uuid> {
        self.events
            .iter()
            .rev()
            .filter(|e| e.kind == EventType::ToolCheckedOut && e.user_id == Some(id))
            .filter_map(|e| e.tool_id)
            .collect()
    }

    fn existing_user(&self, user_id: &str) -> Result<Uuid, ServerError> {
        let id = parse_id(user_id, "user_id")?;
        self.get_user(id).map(|u| u.id)
    }

    // -----------------------------------------------------------------------
    // Events and admin
    // -----------------------------------------------------------------------

    pub fn list_events(&self, filter: &EventFilter, page: Page) -> Vec<Event> {
        page.apply(self.events.iter().rev().filter(|e| filter.matches(e)))
            .cloned()
            .collect()
    }

    pub fn get_event(&self, id: Uuid) -> Result<Event, ServerError> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(ServerError::NotFound)
    }

    pub fn stats(&self) -> Stats {
        let mut tools_by_status = ToolsByStatus::default();
        for tool in &self.tools {
            match tool.status {
                ToolStatus::InOffice => tools_by_status.in_office += 1,
                ToolStatus::CheckedOut => tools_by_status.checked_out += 1,
                ToolStatus::Maintenance => tools_by_status.maintenance += 1,
                ToolStatus::Lost => tools_by_status.lost += 1,
            }
        }
        let mut users_by_role = UsersByRole::default();
        for user in &self.users {
            match user.role {
                UserRole::Employee => users_by_role.employees += 1,
                UserRole::Manager => users_by_role.managers += 1,
                UserRole::Admin => users_by_role.admins += 1,
            }
        }
        Stats {
            total_tools: self.tools.len(),
            total_users: self.users.len(),
            total_events: self.events.len(),
            tools_by_status,
            users_by_role,
        }
    }

    pub fn audit(&self) -> AuditLog {
        let audit_log: Vec<Event> = self.events.iter().rev().take(AUDIT_LIMIT).cloned().collect();
        AuditLog {
            total: audit_log.len(),
            audit_log,
        }
    }

    fn log(
        &mut self,
        kind: EventType,
        tool_id: Option<Uuid>,
        user_id: Option<Uuid>,
        actor_id: Option<Uuid>,
        notes: &str,
    ) {
        self.events.push(Event {
            id: Uuid::new_v4(),
            kind,
            tool_id,
            user_id,
            actor_id,
            notes: notes.to_string(),
            metadata: String::new(),
            created_at: Utc::now(),
        });
    }
}

fn required(value: &str, field: &str) -> Result<String, ServerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServerError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn valid_email(email: &str) -> Result<String, ServerError> {
    let email = required(email, "email")?;
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !well_formed {
        return Err(ServerError::Validation("invalid email format".to_string()));
    }
    Ok(email)
}

pub fn parse_id(value: &str, field: &str) -> Result<Uuid, ServerError> {
    if value.is_empty() {
        return Err(ServerError::Validation(format!("{field} is required")));
    }
    Uuid::parse_str(value).map_err(|_| ServerError::Validation(format!("{field} must be a valid UUID")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_user() -> (Store, User) {
        let mut store = Store::default();
        let user = store.create_user("Ada", "ada@example.com", None).unwrap();
        (store, user)
    }

    #[test]
    fn page_clamps_and_defaults() {
        assert_eq!(Page::new(None, None, 10, 100), Page { limit: 10, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(-3), 10, 100), Page { limit: 10, offset: 0 });
        assert_eq!(Page::new(Some(1000), Some(5), 50, 500), Page { limit: 500, offset: 5 });
    }

    #[test]
    fn tools_list_newest_first_with_paging() {
        let mut store = Store::default();
        for name in ["a", "b", "c"] {
            store.create_tool(name, None).unwrap();
        }
        let names: Vec<_> = store
            .list_tools(None, Page { limit: 2, offset: 1 })
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn create_tool_requires_name_and_defaults_status() {
        let mut store = Store::default();
        assert!(matches!(store.create_tool("  ", None), Err(ServerError::Validation(_))));
        let tool = store.create_tool("Drill", None).unwrap();
        assert_eq!(tool.status, ToolStatus::InOffice);
        assert_eq!(store.tool_history(tool.id)[0].kind, EventType::ToolCreated);
    }

    #[test]
    fn checkout_then_checkin() {
        let (mut store, user) = store_with_user();
        let tool = store.create_tool("Drill", None).unwrap();
        let uid = user.id.to_string();

        let out = store.checkout(tool.id, &uid, "job").unwrap();
        assert_eq!(out.status, ToolStatus::CheckedOut);
        assert_eq!(out.current_user_id, Some(user.id));
        assert!(out.last_checked_out_at.is_some());

        let err = store.checkout(tool.id, &uid, "").unwrap_err();
        assert!(err.to_string().contains("not available"));

        let back = store.checkin(tool.id, &uid, "").unwrap();
        assert_eq!(back.status, ToolStatus::InOffice);
        assert_eq!(back.current_user_id, None);
        assert!(store.checkin(tool.id, &uid, "").is_err());

        let kinds: Vec<_> = store.tool_history(tool.id).iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [EventType::ToolCheckedIn, EventType::ToolCheckedOut, EventType::ToolCreated]
        );
        assert_eq!(store.user_tools(user.id), vec![tool.id]);
    }

    #[test]
    fn actions_validate_user() {
        let mut store = Store::default();
        let tool = store.create_tool("Drill", None).unwrap();
        assert!(matches!(store.checkout(tool.id, "", ""), Err(ServerError::Validation(_))));
        assert!(matches!(store.checkout(tool.id, "nope", ""), Err(ServerError::Validation(_))));
        let stranger = Uuid::new_v4().to_string();
        assert!(matches!(store.mark_lost(tool.id, &stranger, ""), Err(ServerError::NotFound)));
    }

    #[test]
    fn lost_releases_holder() {
        let (mut store, user) = store_with_user();
        let tool = store.create_tool("Drill", None).unwrap();
        store.checkout(tool.id, &user.id.to_string(), "").unwrap();
        let lost = store.mark_lost(tool.id, &user.id.to_string(), "gone").unwrap();
        assert_eq!(lost.status, ToolStatus::Lost);
        assert_eq!(lost.current_user_id, None);
    }

    #[test]
    fn duplicate_email_conflicts() {
        let (mut store, user) = store_with_user();
        let err = store.create_user("Other", "ada@example.com", None).unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
        // Updating a user with their own email is fine.
        store
            .update_user(user.id, "Ada L", "ada@example.com", UserRole::Admin)
            .unwrap();
    }

    #[test]
    fn email_format_is_checked() {
        let mut store = Store::default();
        for bad in ["", "ada", "@example.com", "ada@example", "ada@.com"] {
            assert!(store.create_user("Ada", bad, None).is_err(), "{bad}");
        }
    }

    #[test]
    fn event_filter_and_activity() {
        let (mut store, user) = store_with_user();
        let tool = store.create_tool("Drill", None).unwrap();
        store.checkout(tool.id, &user.id.to_string(), "").unwrap();

        let filter = EventFilter {
            kind: Some(EventType::ToolCheckedOut),
            ..EventFilter::default()
        };
        assert_eq!(store.list_events(&filter, Page::new(None, None, 50, 500)).len(), 1);
        assert_eq!(store.user_activity(user.id).len(), 2);
        assert_eq!(store.user_activity(SYSTEM_USER_ID).len(), 2);
    }

    #[test]
    fn tool_actions_record_their_actor() {
        let (mut store, user) = store_with_user();
        let tool = store.create_tool("Drill", None).unwrap();
        let user_id = user.id.to_string();
        store.checkout(tool.id, &user_id, "").unwrap();
        store.checkin(tool.id, &user_id, "").unwrap();
        store.mark_lost(tool.id, &user_id, "").unwrap();

        let history = store.tool_history(tool.id);
        let actors: Vec<_> = history.iter().map(|e| (e.kind, e.actor_id)).collect();
        assert_eq!(
            actors,
            [
                (EventType::ToolLost, None),
                (EventType::ToolCheckedIn, Some(user.id)),
                (EventType::ToolCheckedOut, Some(user.id)),
                (EventType::ToolCreated, Some(SYSTEM_USER_ID)),
            ]
        );
        assert!(history.iter().all(|e| e.tool_id == Some(tool.id)));
    }

    #[test]
    fn stats_count_by_status_and_role() {
        let store = Store::with_demo_data();
        let stats = store.stats();
        assert_eq!(stats.total_tools, 3);
        assert_eq!(stats.tools_by_status.in_office, 1);
        assert_eq!(stats.tools_by_status.checked_out, 1);
        assert_eq!(stats.tools_by_status.maintenance, 1);
        assert_eq!(stats.users_by_role.employees, 1);
        assert_eq!(stats.users_by_role.managers, 1);
        assert_eq!(store.audit().total, stats.total_events);
    }
}

//! View projection.
//!
//! Every view is rebuilt from a store snapshot and the current time. Nothing
//! here can fail and nothing holds on to the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{deadline_instant, Priority, ServerRecord, StaffMember, Store, Todo, TodoStatus};

/// Placeholder shown for a staff member without responsibilities.
pub const NO_RESPONSIBILITIES: &str = "No responsibilities";

/// Separator between responsibilities in the staff list.
pub const RESPONSIBILITY_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    pub fn for_status(status: TodoStatus) -> Self {
        match status {
            TodoStatus::Done => StatusColor::Green,
            TodoStatus::InProgress => StatusColor::Yellow,
            TodoStatus::NotStarted => StatusColor::Red,
        }
    }
}

/// Completion summary for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub server: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoRow {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub status: TodoStatus,
    pub color: StatusColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub priority: Priority,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffRow {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub rank: String,
    pub responsibilities: Vec<String>,
    /// Joined responsibilities or the placeholder
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerOption {
    pub name: String,
    pub selected: bool,
}

/// Everything a render surface needs for one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Sections are shown only when at least one server exists
    pub visible: bool,
    pub servers: Vec<ServerOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Dashboard>,
    pub todos: Vec<TodoRow>,
    pub staff: Vec<StaffRow>,
}

/// Project every view for `selected` at time `now`.
pub fn project(store: &Store, selected: Option<&str>, now: DateTime<Utc>) -> Board {
    let servers = server_options(store, selected);
    let record = selected.and_then(|name| store.get(name));
    Board {
        visible: is_visible(store),
        servers,
        dashboard: selected.map(|name| dashboard(name, record)),
        todos: record.map(|r| todo_rows(r, now)).unwrap_or_default(),
        staff: record.map(staff_rows).unwrap_or_default(),
    }
}

pub fn is_visible(store: &Store) -> bool {
    !store.is_empty()
}

pub fn server_options(store: &Store, selected: Option<&str>) -> Vec<ServerOption> {
    store
        .server_names()
        .map(|name| ServerOption {
            name: name.to_string(),
            selected: Some(name) == selected,
        })
        .collect()
}

/// Dashboard for `server`; a missing record counts as no todos.
pub fn dashboard(server: &str, record: Option<&ServerRecord>) -> Dashboard {
    let todos = record.map(|r| r.todos.as_slice()).unwrap_or_default();
    let completed = todos
        .iter()
        .filter(|todo| todo.status == TodoStatus::Done)
        .count();
    let total = todos.len();
    Dashboard {
        server: server.to_string(),
        completed,
        total,
        percentage: completion_percentage(completed, total),
    }
}

/// `round(100 * completed / total)`, halves rounding up; 0 when empty.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

pub fn todo_rows(record: &ServerRecord, now: DateTime<Utc>) -> Vec<TodoRow> {
    record
        .todos
        .iter()
        .enumerate()
        .map(|(position, todo)| TodoRow {
            position,
            id: todo.id.clone(),
            name: todo.name.clone(),
            status: todo.status,
            color: StatusColor::for_status(todo.status),
            deadline: todo.deadline.clone(),
            priority: todo.priority.unwrap_or_default(),
            overdue: is_overdue(todo, now),
        })
        .collect()
}

/// A todo is overdue when its deadline parses, lies strictly before `now`,
/// and the todo is not done.
pub fn is_overdue(todo: &Todo, now: DateTime<Utc>) -> bool {
    if todo.status == TodoStatus::Done {
        return false;
    }
    todo.deadline
        .as_deref()
        .and_then(deadline_instant)
        .is_some_and(|deadline| deadline < now)
}

pub fn staff_rows(record: &ServerRecord) -> Vec<StaffRow> {
    record
        .staff
        .iter()
        .enumerate()
        .map(|(position, member)| StaffRow {
            position,
            id: member.id.clone(),
            name: member.name.clone(),
            rank: member.rank.clone(),
            responsibilities: member.responsibilities.clone(),
            summary: responsibilities_summary(member),
        })
        .collect()
}

pub fn responsibilities_summary(member: &StaffMember) -> String {
    if member.responsibilities.is_empty() {
        NO_RESPONSIBILITIES.to_string()
    } else {
        member.responsibilities.join(RESPONSIBILITY_SEPARATOR)
    }
}

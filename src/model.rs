//! Data model for the server desk.
//!
//! The whole persisted state is one [`Store`]: a mapping from server name to
//! [`ServerRecord`]. Servers, todos, and staff all keep insertion order. Every
//! todo and staff member also carries a generated id so callers can address
//! it without depending on its current position.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

const TODO_ID_PREFIX: &str = "todo";
const STAFF_ID_PREFIX: &str = "staff";
const ID_SUFFIX_LEN: usize = 6;

/// Accepted input format for deadlines.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Every server known to the desk, keyed by name in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    servers: IndexMap<String, ServerRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ServerRecord> {
        self.servers.get(name)
    }

    /// Server names in selector order.
    pub fn server_names(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServerRecord)> {
        self.servers.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Record for `name`, or `ServerNotFound`.
    pub fn record(&self, name: &str) -> Result<&ServerRecord> {
        self.servers
            .get(name)
            .ok_or_else(|| Error::ServerNotFound(name.to_string()))
    }

    pub fn record_mut(&mut self, name: &str) -> Result<&mut ServerRecord> {
        self.servers
            .get_mut(name)
            .ok_or_else(|| Error::ServerNotFound(name.to_string()))
    }

    /// Insert an empty record; names are unique.
    pub fn insert_server(&mut self, name: &str) -> Result<()> {
        if self.servers.contains_key(name) {
            return Err(Error::ServerExists(name.to_string()));
        }
        self.servers.insert(name.to_string(), ServerRecord::default());
        Ok(())
    }

    pub fn remove_server(&mut self, name: &str) -> Option<ServerRecord> {
        self.servers.shift_remove(name)
    }

    /// Bring records loaded from older payloads up to the current shape:
    /// assign missing or duplicate ids and drop blank deadlines.
    ///
    /// Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for record in self.servers.values_mut() {
            changed |= record.normalize();
        }
        changed
    }
}

/// One server's todos, staff, and the reserved `logs` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    /// Reserved. No operation writes it; it is carried through load/save.
    #[serde(default)]
    pub logs: Vec<String>,
}

impl ServerRecord {
    /// Append a new todo with status `NotStarted`.
    pub fn push_todo(
        &mut self,
        name: &str,
        deadline: Option<String>,
        priority: Option<Priority>,
    ) -> &Todo {
        let id = {
            let existing: HashSet<&str> = self.todos.iter().map(|t| t.id.as_str()).collect();
            generate_id(TODO_ID_PREFIX, &existing)
        };
        self.todos.push(Todo {
            id,
            name: name.to_string(),
            status: TodoStatus::NotStarted,
            priority,
            deadline,
        });
        &self.todos[self.todos.len() - 1]
    }

    pub fn todo_mut(&mut self, target: &EntityRef) -> Result<&mut Todo> {
        let position = resolve_position(&self.todos, target, "Todo")?;
        Ok(&mut self.todos[position])
    }

    pub fn remove_todo(&mut self, target: &EntityRef) -> Result<Todo> {
        let position = resolve_position(&self.todos, target, "Todo")?;
        Ok(self.todos.remove(position))
    }

    /// Append a new staff member with no responsibilities.
    pub fn push_staff(&mut self, name: &str, rank: &str) -> &StaffMember {
        let id = {
            let existing: HashSet<&str> = self.staff.iter().map(|s| s.id.as_str()).collect();
            generate_id(STAFF_ID_PREFIX, &existing)
        };
        self.staff.push(StaffMember {
            id,
            name: name.to_string(),
            rank: rank.to_string(),
            responsibilities: Vec::new(),
        });
        &self.staff[self.staff.len() - 1]
    }

    pub fn staff_mut(&mut self, target: &EntityRef) -> Result<&mut StaffMember> {
        let position = resolve_position(&self.staff, target, "Staff member")?;
        Ok(&mut self.staff[position])
    }

    pub fn remove_staff(&mut self, target: &EntityRef) -> Result<StaffMember> {
        let position = resolve_position(&self.staff, target, "Staff member")?;
        Ok(self.staff.remove(position))
    }

    fn normalize(&mut self) -> bool {
        let mut changed = normalize_ids(&mut self.todos, TODO_ID_PREFIX);
        changed |= normalize_ids(&mut self.staff, STAFF_ID_PREFIX);
        for todo in &mut self.todos {
            if todo.deadline.as_deref().is_some_and(|d| d.trim().is_empty()) {
                todo.deadline = None;
                changed = true;
            }
        }
        changed
    }
}

/// A task on a server's todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// A person on a server's staff roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub rank: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

/// Todo lifecycle. Any status may be set from any other.
///
/// Persisted values outside the three known labels load as `NotStarted`;
/// input from the command line is parsed strictly via `FromStr`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TodoStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl TodoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "NotStarted",
            TodoStatus::InProgress => "InProgress",
            TodoStatus::Done => "Done",
        }
    }

    /// Human label used in rendered views and activity messages.
    pub fn label(self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "Not started",
            TodoStatus::InProgress => "In progress",
            TodoStatus::Done => "Done",
        }
    }

    /// Lenient match that also accepts the legacy Danish labels.
    pub fn parse_label(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "notstarted" | "todo" | "open" | "ikkepåbegyndt" => Some(TodoStatus::NotStarted),
            "inprogress" | "started" | "igang" => Some(TodoStatus::InProgress),
            "done" | "finished" | "færdig" => Some(TodoStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TodoStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TodoStatus::parse_label(s).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "invalid status '{}': must be not-started, in-progress, or done",
                s.trim()
            ))
        })
    }
}

impl From<String> for TodoStatus {
    fn from(raw: String) -> Self {
        TodoStatus::parse_label(&raw).unwrap_or_else(|| {
            tracing::warn!(status = %raw, "unknown todo status, loading as not started");
            TodoStatus::NotStarted
        })
    }
}

impl From<TodoStatus> for String {
    fn from(status: TodoStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Todo priority. Views show `Low` when a todo has none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse_label(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "low" | "lav" => Some(Priority::Low),
            "medium" | "mellem" => Some(Priority::Medium),
            "high" | "høj" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Priority::parse_label(s).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "invalid priority '{}': must be low, medium, or high",
                s.trim()
            ))
        })
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Priority::parse_label(&raw).unwrap_or_else(|| {
            tracing::warn!(priority = %raw, "unknown priority, loading as low");
            Priority::Low
        })
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

fn fold_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
        .collect()
}

/// Validate a deadline supplied by the user.
///
/// Blank input means "no deadline". Anything else must be `YYYY-MM-DD`.
pub fn parse_deadline_input(raw: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let date = NaiveDate::parse_from_str(raw, DEADLINE_FORMAT).map_err(|err| {
        Error::InvalidArgument(format!(
            "invalid deadline '{raw}': expected YYYY-MM-DD ({err})"
        ))
    })?;
    Ok(Some(date.format(DEADLINE_FORMAT).to_string()))
}

/// Moment a stored deadline refers to, if it parses.
///
/// Calendar dates mean midnight UTC; RFC 3339 timestamps are taken as is.
pub fn deadline_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DEADLINE_FORMAT) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// How a caller points at a todo or staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    /// Zero-based position in the current list. Past the end it still
    /// matches an id whose suffix is exactly these digits.
    Index(usize),
    /// Full id, id without its prefix, or a unique prefix of either.
    Id(String),
}

impl FromStr for EntityRef {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("target cannot be empty".to_string()));
        }
        // "007" keeps its digits as an id fragment; positions have no leading zeros.
        let is_position = trimmed.chars().all(|ch| ch.is_ascii_digit())
            && (trimmed.len() == 1 || !trimmed.starts_with('0'));
        if is_position {
            let index = trimmed.parse::<usize>().map_err(|_| {
                Error::InvalidArgument(format!("invalid position '{trimmed}'"))
            })?;
            return Ok(EntityRef::Index(index));
        }
        Ok(EntityRef::Id(trimmed.to_ascii_lowercase()))
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Index(index) => write!(f, "#{index}"),
            EntityRef::Id(id) => f.write_str(id),
        }
    }
}

/// Items addressable by generated id.
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Identified for Todo {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Identified for StaffMember {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Position of `target` within `items`.
pub fn resolve_position<T: Identified>(
    items: &[T],
    target: &EntityRef,
    kind: &'static str,
) -> Result<usize> {
    match target {
        EntityRef::Index(index) if *index < items.len() => Ok(*index),
        EntityRef::Index(index) => match position_by_id(items, &index.to_string(), false, kind) {
            Err(Error::NotFound { .. }) => Err(Error::OutOfRange {
                kind,
                index: *index,
                len: items.len(),
            }),
            resolved => resolved,
        },
        EntityRef::Id(id) => position_by_id(items, &id.trim().to_ascii_lowercase(), true, kind),
    }
}

fn position_by_id<T: Identified>(
    items: &[T],
    wanted: &str,
    allow_prefix: bool,
    kind: &'static str,
) -> Result<usize> {
    let mut exact = Vec::new();
    let mut prefixed = Vec::new();
    for (position, item) in items.iter().enumerate() {
        let id = item.id();
        let suffix = id_suffix(id);
        if id == wanted || suffix == wanted {
            exact.push(position);
        } else if allow_prefix
            && !wanted.is_empty()
            && (id.starts_with(wanted) || suffix.starts_with(wanted))
        {
            prefixed.push(position);
        }
    }

    let candidates = if exact.is_empty() { prefixed } else { exact };
    match candidates.as_slice() {
        [position] => Ok(*position),
        [] => Err(Error::NotFound {
            kind,
            id: wanted.to_string(),
        }),
        many => {
            let ids: Vec<&str> = many.iter().map(|&p| items[p].id()).collect();
            Err(Error::InvalidArgument(format!(
                "ambiguous {} id '{}': {}",
                kind.to_lowercase(),
                wanted,
                ids.join(", ")
            )))
        }
    }
}

fn id_suffix(id: &str) -> &str {
    match id.split_once('-') {
        Some((_, suffix)) => suffix,
        None => id,
    }
}

/// Lowercase ids and replace missing or duplicate ones.
fn normalize_ids<T: Identified>(items: &mut [T], prefix: &str) -> bool {
    let mut changed = false;
    let mut seen: HashSet<String> = HashSet::new();
    for item in items.iter_mut() {
        let id = item.id().trim().to_ascii_lowercase();
        if !id.is_empty() && !seen.contains(&id) {
            if id != item.id() {
                item.set_id(id.clone());
                changed = true;
            }
            seen.insert(id);
            continue;
        }
        let fresh = {
            let existing: HashSet<&str> = seen.iter().map(String::as_str).collect();
            generate_id(prefix, &existing)
        };
        item.set_id(fresh.clone());
        seen.insert(fresh);
        changed = true;
    }
    changed
}

/// Fresh `<prefix>-xxxxxx` id. Suffixes always contain a letter so they
/// never read as a position.
fn generate_id(prefix: &str, existing: &HashSet<&str>) -> String {
    loop {
        let raw = Ulid::new().to_string().to_ascii_lowercase();
        let suffix = &raw[raw.len() - ID_SUFFIX_LEN..];
        if suffix.chars().all(|ch| ch.is_ascii_digit()) {
            continue;
        }
        let candidate = format!("{prefix}-{suffix}");
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
    }
}

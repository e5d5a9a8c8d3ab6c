//! Mutation operations.
//!
//! A [`Desk`] is the handle every operation goes through: it owns the storage
//! port and the activity feed. Each operation is one load → mutate → save
//! cycle; nothing is cached between operations.
//!
//! Required text inputs are trimmed. A blank one turns the operation into a
//! silent no-op that returns `Ok(None)` without saving or recording
//! activity.

use chrono::{DateTime, Utc};

use crate::activity::{self, ActivityEntry, ActivityFeed};
use crate::error::{Error, Result};
use crate::model::{EntityRef, Priority, ServerRecord, StaffMember, Store, Todo, TodoStatus};
use crate::storage::StoragePort;
use crate::view::{self, Board};

/// Input for a new todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub name: String,
    /// Already validated `YYYY-MM-DD`, or `None`
    pub deadline: Option<String>,
    pub priority: Option<Priority>,
}

impl NewTodo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Store handle plus the process-local activity feed.
#[derive(Debug)]
pub struct Desk<S: StoragePort> {
    storage: S,
    feed: ActivityFeed,
    default_server: Option<String>,
}

impl<S: StoragePort> Desk<S> {
    pub fn new(storage: S) -> Self {
        Self::with_feed(storage, ActivityFeed::new())
    }

    pub fn with_feed(storage: S, feed: ActivityFeed) -> Self {
        Self {
            storage,
            feed,
            default_server: None,
        }
    }

    /// Server to select when none is named explicitly.
    pub fn with_default_server(mut self, server: Option<String>) -> Self {
        self.default_server = server.and_then(|s| non_blank(&s).map(str::to_string));
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    /// Fresh copy of the persisted store.
    pub fn load(&self) -> Store {
        self.storage.load_all()
    }

    /// Resolve the server an operation applies to.
    ///
    /// An explicit name must exist. Otherwise the configured default is used
    /// if it still exists, then the first server.
    pub fn selected_server(&self, explicit: Option<&str>) -> Result<String> {
        let store = self.load();
        if let Some(name) = explicit.and_then(non_blank) {
            if !store.contains(name) {
                return Err(Error::ServerNotFound(name.to_string()));
            }
            return Ok(name.to_string());
        }
        select_server(&store, None, self.default_server.as_deref()).ok_or(Error::NoServerSelected)
    }

    /// Project every view for the selected server.
    pub fn board(&self, explicit: Option<&str>, now: DateTime<Utc>) -> Board {
        let store = self.load();
        let selected = select_server(&store, explicit, self.default_server.as_deref());
        view::project(&store, selected.as_deref(), now)
    }

    pub fn add_server(&mut self, name: &str) -> Result<Option<String>> {
        let Some(name) = non_blank(name) else {
            return Ok(None);
        };
        let added = self.storage.update(|store| {
            store.insert_server(name)?;
            Ok(Some((name.to_string(), activity::server_created(name))))
        })?;
        Ok(self.finish(added))
    }

    /// Remove a server and everything on it.
    ///
    /// Callers obtain the user's confirmation first.
    pub fn delete_server(&mut self, name: &str) -> Result<Option<ServerRecord>> {
        let Some(name) = non_blank(name) else {
            return Ok(None);
        };
        let removed = self.storage.update(|store| {
            let record = store
                .remove_server(name)
                .ok_or_else(|| Error::ServerNotFound(name.to_string()))?;
            Ok(Some((record, activity::server_deleted(name))))
        })?;
        Ok(self.finish(removed))
    }

    pub fn add_todo(&mut self, server: &str, todo: NewTodo) -> Result<Option<Todo>> {
        let server = require_server(server)?;
        let Some(name) = non_blank(&todo.name) else {
            return Ok(None);
        };
        let deadline = todo.deadline.as_deref().and_then(non_blank).map(str::to_string);
        let added = self.storage.update(|store| {
            let record = store.record_mut(server)?;
            let created = record.push_todo(name, deadline, todo.priority).clone();
            let entry = activity::todo_added(server, &created.name, created.deadline.as_deref());
            Ok(Some((created, entry)))
        })?;
        Ok(self.finish(added))
    }

    /// Set a todo's status. Any status may follow any other.
    pub fn change_todo_status(
        &mut self,
        server: &str,
        target: &EntityRef,
        status: TodoStatus,
    ) -> Result<Todo> {
        let server = require_server(server)?;
        let changed = self.storage.update(|store| {
            let todo = store.record_mut(server)?.todo_mut(target)?;
            todo.status = status;
            let updated = todo.clone();
            let entry = activity::todo_status_changed(server, &updated.name, status.label());
            Ok(Some((updated, entry)))
        })?;
        self.finish(changed).ok_or_else(|| missing(target))
    }

    pub fn delete_todo(&mut self, server: &str, target: &EntityRef) -> Result<Todo> {
        let server = require_server(server)?;
        let removed = self.storage.update(|store| {
            let todo = store.record_mut(server)?.remove_todo(target)?;
            let entry = activity::todo_deleted(server, &todo.name);
            Ok(Some((todo, entry)))
        })?;
        self.finish(removed).ok_or_else(|| missing(target))
    }

    pub fn add_staff(
        &mut self,
        server: &str,
        name: &str,
        rank: &str,
    ) -> Result<Option<StaffMember>> {
        let server = require_server(server)?;
        let (Some(name), Some(rank)) = (non_blank(name), non_blank(rank)) else {
            return Ok(None);
        };
        let added = self.storage.update(|store| {
            let member = store.record_mut(server)?.push_staff(name, rank).clone();
            let entry = activity::staff_added(server, &member.name);
            Ok(Some((member, entry)))
        })?;
        Ok(self.finish(added))
    }

    pub fn delete_staff(&mut self, server: &str, target: &EntityRef) -> Result<StaffMember> {
        let server = require_server(server)?;
        let removed = self.storage.update(|store| {
            let member = store.record_mut(server)?.remove_staff(target)?;
            let entry = activity::staff_deleted(server, &member.name);
            Ok(Some((member, entry)))
        })?;
        self.finish(removed).ok_or_else(|| missing(target))
    }

    /// Append a responsibility; a blank one is a no-op.
    pub fn add_responsibility(
        &mut self,
        server: &str,
        target: &EntityRef,
        responsibility: &str,
    ) -> Result<Option<StaffMember>> {
        let server = require_server(server)?;
        let Some(responsibility) = non_blank(responsibility) else {
            return Ok(None);
        };
        let updated = self.storage.update(|store| {
            let member = store.record_mut(server)?.staff_mut(target)?;
            member.responsibilities.push(responsibility.to_string());
            let updated = member.clone();
            let entry = activity::responsibility_added(server, &updated.name, responsibility);
            Ok(Some((updated, entry)))
        })?;
        Ok(self.finish(updated))
    }

    fn finish<T>(&mut self, outcome: Option<(T, ActivityEntry)>) -> Option<T> {
        let (value, entry) = outcome?;
        if let Err(err) = self.feed.record(entry) {
            tracing::warn!(error = %err, "failed to mirror activity event");
        }
        Some(value)
    }
}

/// Server a view should show: `explicit` if it exists, then `default` if it
/// exists, then the first server.
pub fn select_server(
    store: &Store,
    explicit: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    [explicit, default]
        .into_iter()
        .flatten()
        .filter_map(non_blank)
        .find(|name| store.contains(name))
        .or_else(|| store.server_names().next())
        .map(str::to_string)
}

fn require_server(server: &str) -> Result<&str> {
    non_blank(server).ok_or(Error::NoServerSelected)
}

fn missing(target: &EntityRef) -> Error {
    Error::InvalidArgument(format!("no change applied for {target}"))
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

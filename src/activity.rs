//! Activity feed.
//!
//! Every successful mutation records one human-readable entry. The feed lives
//! only as long as the [`Desk`](crate::desk::Desk) that owns it and is never
//! persisted; it is unrelated to the reserved `logs` field on server records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::events::{Event, EventSink};

/// What kind of mutation produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ServerCreated,
    ServerDeleted,
    TodoAdded,
    TodoStatusChanged,
    TodoDeleted,
    StaffAdded,
    StaffDeleted,
    ResponsibilityAdded,
}

/// One line of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub server: String,
    pub message: String,
}

impl ActivityEntry {
    pub fn new(kind: ActivityKind, server: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            server: server.into(),
            message: message.into(),
        }
    }
}

/// In-memory feed, optionally mirrored to an event sink.
#[derive(Default)]
pub struct ActivityFeed {
    entries: Vec<ActivityEntry>,
    sink: Option<EventSink>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also stream every new entry to `sink`.
    pub fn with_sink(sink: EventSink) -> Self {
        Self {
            entries: Vec::new(),
            sink: Some(sink),
        }
    }

    /// Append an entry. The entry is kept even if mirroring it fails.
    pub fn record(&mut self, entry: ActivityEntry) -> Result<()> {
        tracing::info!(kind = ?entry.kind, server = %entry.server, "{}", entry.message);
        let event = Event::from_activity(&entry);
        self.entries.push(entry);
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(&event)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ActivityFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityFeed")
            .field("entries", &self.entries)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

pub fn server_created(server: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::ServerCreated,
        server,
        format!("Server \"{server}\" created."),
    )
}

pub fn server_deleted(server: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::ServerDeleted,
        server,
        format!("Server \"{server}\" deleted."),
    )
}

pub fn todo_added(server: &str, name: &str, deadline: Option<&str>) -> ActivityEntry {
    let message = match deadline {
        Some(deadline) => format!("Todo \"{name}\" added with deadline {deadline}."),
        None => format!("Todo \"{name}\" added without a deadline."),
    };
    ActivityEntry::new(ActivityKind::TodoAdded, server, message)
}

pub fn todo_status_changed(server: &str, name: &str, status: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::TodoStatusChanged,
        server,
        format!("Todo \"{name}\" status changed to \"{status}\"."),
    )
}

pub fn todo_deleted(server: &str, name: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::TodoDeleted,
        server,
        format!("Todo \"{name}\" deleted."),
    )
}

pub fn staff_added(server: &str, name: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::StaffAdded,
        server,
        format!("Staff member \"{name}\" added."),
    )
}

pub fn staff_deleted(server: &str, name: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::StaffDeleted,
        server,
        format!("Staff member \"{name}\" deleted."),
    )
}

pub fn responsibility_added(server: &str, staff: &str, responsibility: &str) -> ActivityEntry {
    ActivityEntry::new(
        ActivityKind::ResponsibilityAdded,
        server,
        format!("Responsibility \"{responsibility}\" added to staff member \"{staff}\"."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_operations() {
        assert_eq!(server_created("Alpha").message, "Server \"Alpha\" created.");
        assert_eq!(
            todo_added("Alpha", "patch", None).message,
            "Todo \"patch\" added without a deadline."
        );
        assert_eq!(
            todo_added("Alpha", "patch", Some("2030-01-01")).message,
            "Todo \"patch\" added with deadline 2030-01-01."
        );
        assert_eq!(
            responsibility_added("Alpha", "Ann", "cook").message,
            "Responsibility \"cook\" added to staff member \"Ann\"."
        );
    }

    #[test]
    fn feed_keeps_entries_in_order() {
        let mut feed = ActivityFeed::new();
        assert!(feed.is_empty());
        feed.record(server_created("Alpha")).unwrap();
        feed.record(staff_added("Alpha", "Ann")).unwrap();

        let kinds: Vec<ActivityKind> = feed.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::ServerCreated, ActivityKind::StaffAdded]);
        assert_eq!(
            feed.messages().collect::<Vec<_>>(),
            vec!["Server \"Alpha\" created.", "Staff member \"Ann\" added."]
        );
    }
}

//! serverdesk - Server Desk Library
//!
//! Tracks servers, their todo lists, and staff rosters in one JSON store.
//!
//! # Core Concepts
//!
//! - **Store**: server name → record with todos, staff, and reserved logs
//! - **Desk**: the handle every mutation goes through; each one is a single
//!   load → mutate → save cycle that records one activity entry
//! - **Views**: dashboard, todo list, staff list, and server selector,
//!   projected from a store snapshot and the current time
//!
//! # Module Organization
//!
//! - `activity`: In-memory feed of performed actions
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `desk`: Mutation operations
//! - `error`: Error types and result aliases
//! - `events`: JSONL event output for activity entries
//! - `lock`: File locking and atomic writes
//! - `model`: Store, records, statuses, priorities, and entity targeting
//! - `output`: Human and JSON output envelopes
//! - `prompt`: Confirmation and text prompts
//! - `storage`: Storage port with file and in-memory backends
//! - `view`: View projection

pub mod activity;
pub mod cli;
pub mod config;
pub mod desk;
pub mod error;
pub mod events;
pub mod lock;
pub mod model;
pub mod output;
pub mod prompt;
pub mod storage;
pub mod view;

pub use desk::{Desk, NewTodo};
pub use error::{Error, Result};
pub use storage::{FileStorage, MemoryStorage, StoragePort};

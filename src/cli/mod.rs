//! Command-line interface for serverdesk
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::activity::ActivityFeed;
use crate::config::Config;
use crate::desk::Desk;
use crate::error::Result;
use crate::events::EventDestination;
use crate::model::TodoStatus;
use crate::output::{HumanOutput, OutputOptions};
use crate::storage::FileStorage;

mod board;
mod config;
mod server;
mod staff;
mod todo;

/// serverdesk - servers, their todo lists, and staff rosters
///
/// Every command loads the whole store, applies one change, and saves it
/// back.
#[derive(Parser, Debug)]
#[command(name = "serverdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the store (defaults to the platform data dir)
    #[arg(long, global = true, env = "SERVERDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "SERVERDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server to operate on (defaults to desk.default_server, then the first server)
    #[arg(long, global = true, env = "SERVERDESK_SERVER")]
    pub server: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Stream activity as JSON lines to a file, or `-` for stdout
    #[arg(long, global = true, value_name = "DEST")]
    pub events: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Server management
    #[command(subcommand)]
    Server(ServerCommands),

    /// Todo list of the selected server
    #[command(subcommand)]
    Todo(TodoCommands),

    /// Staff roster of the selected server
    #[command(subcommand)]
    Staff(StaffCommands),

    /// Dashboard, todos, and staff of the selected server
    Board,

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Server subcommands
#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// Add a server
    Add {
        /// Server name
        name: String,
    },

    /// Delete a server with all its todos and staff
    Rm {
        /// Server name (defaults to the selected server)
        name: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List servers
    Ls,
}

/// Todo subcommands
#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Add a todo
    Add {
        /// What needs doing
        name: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,
    },

    /// List todos
    Ls,

    /// Set a todo's status
    Status {
        /// Position (0, 1, ...) or id
        target: String,

        /// Status: not-started, in-progress, done
        status: String,
    },

    /// Mark a todo in progress
    Start {
        /// Position (0, 1, ...) or id
        target: String,
    },

    /// Mark a todo done
    Done {
        /// Position (0, 1, ...) or id
        target: String,
    },

    /// Delete a todo
    Rm {
        /// Position (0, 1, ...) or id
        target: String,
    },
}

/// Staff subcommands
#[derive(Subcommand, Debug)]
pub enum StaffCommands {
    /// Add a staff member
    Add {
        /// Name
        name: String,

        /// Rank
        rank: String,
    },

    /// List staff
    Ls,

    /// Delete a staff member
    Rm {
        /// Position (0, 1, ...) or id
        target: String,
    },

    /// Add a responsibility to a staff member
    Assign {
        /// Position (0, 1, ...) or id
        target: String,

        /// Responsibility (prompted for when omitted)
        text: Option<String>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Set the server used when --server is not given
    SetDefault {
        /// Server name (clears the default when omitted)
        name: Option<String>,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub server: Option<String>,
    pub json: bool,
    pub quiet: bool,
    pub events: Option<String>,
}

impl Context {
    pub fn storage(&self) -> FileStorage {
        self.config.file_storage(self.data_dir.as_deref())
    }

    /// Open the desk with its event sink and the output options to use.
    ///
    /// Events on stdout take over stdout, so other output is silenced.
    pub fn open_desk(&self) -> Result<(Desk<FileStorage>, OutputOptions)> {
        let destination = EventDestination::parse(self.events.as_deref());
        let sink = destination.as_ref().map(|dest| dest.open()).transpose()?;
        let events_to_stdout = matches!(destination, Some(EventDestination::Stdout));

        let feed = sink.map(ActivityFeed::with_sink).unwrap_or_default();
        let desk = Desk::with_feed(self.storage(), feed)
            .with_default_server(self.config.desk.default_server.clone());

        let options = OutputOptions::new(
            self.json && !events_to_stdout,
            self.quiet || events_to_stdout,
            self.config.display.color,
        );
        Ok((desk, options))
    }

    pub fn output(&self) -> OutputOptions {
        OutputOptions::new(self.json, self.quiet, self.config.display.color)
    }

    /// Server the command applies to.
    pub fn server(&self, desk: &Desk<FileStorage>) -> Result<String> {
        desk.selected_server(self.server.as_deref())
    }
}

/// Copy the desk's activity into the human output.
fn push_activity(human: &mut HumanOutput, feed: &ActivityFeed) {
    for message in feed.messages() {
        human.push_activity(message);
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let (config, config_path) = Config::resolve(self.config.as_deref())?;
        tracing::debug!(path = ?config_path, "configuration resolved");

        let ctx = Context {
            config,
            config_path,
            data_dir: self.data_dir,
            server: self.server,
            json: self.json,
            quiet: self.quiet,
            events: self.events,
        };

        match self.command {
            Commands::Server(cmd) => match cmd {
                ServerCommands::Add { name } => server::run_add(&ctx, &name),
                ServerCommands::Rm { name, yes } => server::run_rm(&ctx, name.as_deref(), yes),
                ServerCommands::Ls => server::run_ls(&ctx),
            },
            Commands::Todo(cmd) => match cmd {
                TodoCommands::Add {
                    name,
                    deadline,
                    priority,
                } => todo::run_add(
                    &ctx,
                    todo::AddOptions {
                        name,
                        deadline,
                        priority,
                    },
                ),
                TodoCommands::Ls => todo::run_ls(&ctx),
                TodoCommands::Status { target, status } => {
                    todo::run_status(&ctx, &target, status.parse()?, "todo status")
                }
                TodoCommands::Start { target } => todo::run_status(
                    &ctx,
                    &target,
                    TodoStatus::InProgress,
                    "todo start",
                ),
                TodoCommands::Done { target } => todo::run_status(
                    &ctx,
                    &target,
                    TodoStatus::Done,
                    "todo done",
                ),
                TodoCommands::Rm { target } => todo::run_rm(&ctx, &target),
            },
            Commands::Staff(cmd) => match cmd {
                StaffCommands::Add { name, rank } => staff::run_add(&ctx, &name, &rank),
                StaffCommands::Ls => staff::run_ls(&ctx),
                StaffCommands::Rm { target } => staff::run_rm(&ctx, &target),
                StaffCommands::Assign { target, text } => {
                    staff::run_assign(&ctx, &target, text.as_deref())
                }
            },
            Commands::Board => board::run(&ctx),
            Commands::Config(cmd) => match cmd {
                ConfigCommands::Show => config::run_show(&ctx),
                ConfigCommands::Path => config::run_path(&ctx),
                ConfigCommands::SetDefault { name } => {
                    config::run_set_default(&ctx, name.as_deref())
                }
            },
        }
    }
}

//! serverdesk server command implementation
//!
//! Adds, deletes, and lists servers.

use serde::Serialize;

use crate::desk::select_server;
use crate::error::Result;
use crate::output::{emit_success, server_line, HumanOutput};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::view::{self, ServerOption};

use super::{push_activity, Context};

#[derive(Serialize)]
struct ServerAddReport {
    server: Option<String>,
    created: bool,
}

#[derive(Serialize)]
struct ServerRmReport {
    server: String,
    deleted: bool,
    todos: usize,
    staff: usize,
}

#[derive(Serialize)]
struct ServerLsReport {
    total: usize,
    servers: Vec<ServerOption>,
}

pub fn run_add(ctx: &Context, name: &str) -> Result<()> {
    let (mut desk, output) = ctx.open_desk()?;
    let created = desk.add_server(name)?;

    let mut human = match &created {
        Some(server) => {
            let mut human = HumanOutput::new(format!("serverdesk server add: {server}"));
            human.push_next_step(format!("serverdesk --server {server:?} todo add <name>"));
            human
        }
        None => {
            let mut human = HumanOutput::new("serverdesk server add: nothing to add");
            human.push_warning("server name is blank");
            human
        }
    };
    push_activity(&mut human, desk.feed());

    let report = ServerAddReport {
        created: created.is_some(),
        server: created,
    };
    emit_success(output, "server add", &report, Some(&human))
}

pub fn run_rm(ctx: &Context, name: Option<&str>, yes: bool) -> Result<()> {
    let (mut desk, output) = ctx.open_desk()?;
    let server = match name {
        Some(name) => desk.selected_server(Some(name))?,
        None => ctx.server(&desk)?,
    };

    let confirmed = yes
        || TerminalPrompter::stdio().confirm(&format!(
            "Delete server \"{server}\" with all its todos and staff?"
        ))?;

    if !confirmed {
        let mut human = HumanOutput::new(format!("serverdesk server rm: kept {server}"));
        human.push_detail("deletion cancelled");
        let report = ServerRmReport {
            server,
            deleted: false,
            todos: 0,
            staff: 0,
        };
        return emit_success(output, "server rm", &report, Some(&human));
    }

    let removed = desk.delete_server(&server)?;
    let mut human = HumanOutput::new(format!("serverdesk server rm: {server}"));
    let report = ServerRmReport {
        deleted: removed.is_some(),
        todos: removed.as_ref().map(|r| r.todos.len()).unwrap_or(0),
        staff: removed.as_ref().map(|r| r.staff.len()).unwrap_or(0),
        server,
    };
    human.push_summary("todos removed", report.todos.to_string());
    human.push_summary("staff removed", report.staff.to_string());
    push_activity(&mut human, desk.feed());

    emit_success(output, "server rm", &report, Some(&human))
}

pub fn run_ls(ctx: &Context) -> Result<()> {
    let (desk, output) = ctx.open_desk()?;
    let store = desk.load();
    let selected = match ctx.server.as_deref() {
        Some(_) => Some(ctx.server(&desk)?),
        None => select_server(&store, None, ctx.config.desk.default_server.as_deref()),
    };
    let servers = view::server_options(&store, selected.as_deref());

    let mut human = HumanOutput::new(format!("serverdesk server ls: {} server(s)", servers.len()));
    for option in &servers {
        human.push_detail(server_line(option));
    }
    if servers.is_empty() {
        human.push_next_step("serverdesk server add <name>");
    }

    let report = ServerLsReport {
        total: servers.len(),
        servers,
    };
    emit_success(output, "server ls", &report, Some(&human))
}

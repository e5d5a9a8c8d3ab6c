//! serverdesk todo command implementation
//!
//! Adds, lists, updates, and deletes todos on the selected server.

use chrono::Utc;
use serde::Serialize;

use crate::desk::NewTodo;
use crate::error::Result;
use crate::model::{parse_deadline_input, EntityRef, Priority, Todo, TodoStatus};
use crate::output::{dashboard_line, emit_success, render_todos, HumanOutput};
use crate::view::{Dashboard, TodoRow};

use super::{push_activity, Context};

/// Options for `serverdesk todo add`
pub struct AddOptions {
    pub name: String,
    pub deadline: Option<String>,
    pub priority: Option<String>,
}

#[derive(Serialize)]
struct TodoReport {
    server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    todo: Option<Todo>,
}

#[derive(Serialize)]
struct TodoLsReport {
    server: String,
    dashboard: Option<Dashboard>,
    todos: Vec<TodoRow>,
}

pub fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let deadline = parse_deadline_input(options.deadline.as_deref())?;
    let priority = options
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;

    let (mut desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let added = desk.add_todo(
        &server,
        NewTodo {
            name: options.name,
            deadline,
            priority,
        },
    )?;

    let mut human = match &added {
        Some(todo) => {
            let mut human = HumanOutput::new(format!("serverdesk todo add: {}", todo.name));
            human.push_summary("server", server.clone());
            human.push_summary("id", todo.id.clone());
            human.push_summary("priority", todo.priority.unwrap_or_default().to_string());
            if let Some(deadline) = &todo.deadline {
                human.push_summary("deadline", deadline.clone());
            }
            human.push_next_step(format!("serverdesk todo start {}", todo.id));
            human
        }
        None => {
            let mut human = HumanOutput::new("serverdesk todo add: nothing to add");
            human.push_warning("todo name is blank");
            human
        }
    };
    push_activity(&mut human, desk.feed());

    let report = TodoReport {
        server,
        todo: added,
    };
    emit_success(output, "todo add", &report, Some(&human))
}

pub fn run_ls(ctx: &Context) -> Result<()> {
    let (desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let board = desk.board(Some(&server), Utc::now());

    let mut human = HumanOutput::new(format!(
        "serverdesk todo ls: {} todo(s) on {server}",
        board.todos.len()
    ));
    if let Some(dashboard) = &board.dashboard {
        human.push_summary("completed", dashboard_line(dashboard));
    }
    render_todos(&mut human, &board.todos, output.color);
    if board.todos.is_empty() {
        human.push_next_step("serverdesk todo add <name>");
    }

    let report = TodoLsReport {
        server,
        dashboard: board.dashboard,
        todos: board.todos,
    };
    emit_success(output, "todo ls", &report, Some(&human))
}

/// Shared by `todo status`, `todo start`, and `todo done`.
pub fn run_status(ctx: &Context, target: &str, status: TodoStatus, command: &str) -> Result<()> {
    let target: EntityRef = target.parse()?;
    let (mut desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let todo = desk.change_todo_status(&server, &target, status)?;

    let mut human = HumanOutput::new(format!("serverdesk {command}: {}", todo.name));
    human.push_summary("id", todo.id.clone());
    human.push_summary("status", todo.status.label());
    push_activity(&mut human, desk.feed());

    let report = TodoReport {
        server,
        todo: Some(todo),
    };
    emit_success(output, command, &report, Some(&human))
}

pub fn run_rm(ctx: &Context, target: &str) -> Result<()> {
    let target: EntityRef = target.parse()?;
    let (mut desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let todo = desk.delete_todo(&server, &target)?;

    let mut human = HumanOutput::new(format!("serverdesk todo rm: {}", todo.name));
    human.push_summary("id", todo.id.clone());
    push_activity(&mut human, desk.feed());

    let report = TodoReport {
        server,
        todo: Some(todo),
    };
    emit_success(output, "todo rm", &report, Some(&human))
}

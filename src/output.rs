//! Shared output formatting for serverdesk CLI commands.

use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use serde::Serialize;

use crate::config::ColorMode;
use crate::error::{Error, JsonError, Result};
use crate::view::{Board, Dashboard, ServerOption, StaffRow, StatusColor, TodoRow};

pub const SCHEMA_VERSION: &str = "serverdesk.v1";

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
    pub color: bool,
}

impl OutputOptions {
    pub fn new(json: bool, quiet: bool, color: ColorMode) -> Self {
        Self {
            json,
            quiet,
            color: use_color(color),
        }
    }
}

/// Whether to emit ANSI styling for `mode`.
pub fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_tty(),
    }
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    activity: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            activity: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_activity(&mut self, value: impl Into<String>) {
        self.activity.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();
        let activity = human.map(|h| h.activity.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            activity: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            activity,
            warnings,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: JsonError,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: JsonError::from(err),
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Activity", &output.activity);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

/// Command name (`"todo add"`, `"board"`) from raw arguments, skipping
/// global flags and their values.
pub fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        if matches!(
            arg.as_str(),
            "--data-dir" | "--config" | "--server" | "--events"
        ) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        let takes_subcommand = matches!(arg.as_str(), "server" | "todo" | "staff" | "config");
        words.push(arg);
        if words.len() == 2 || !takes_subcommand {
            break;
        }
    }

    if words.is_empty() {
        "serverdesk".to_string()
    } else {
        words.join(" ")
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::NoServerSelected => vec!["serverdesk server add <name>".to_string()],
        Error::ServerNotFound(_) => vec!["serverdesk server ls".to_string()],
        Error::OutOfRange { kind, .. } | Error::NotFound { kind, .. } => {
            if *kind == "Todo" {
                vec!["serverdesk todo ls".to_string()]
            } else {
                vec!["serverdesk staff ls".to_string()]
            }
        }
        Error::InvalidConfig(_) | Error::TomlParse(_) => {
            vec!["fix config.toml (see `serverdesk config path`) then retry".to_string()]
        }
        Error::LockFailed(_) => {
            vec!["retry once the other serverdesk process finishes".to_string()]
        }
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

// View rendering

fn paint(text: &str, color: StatusColor, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    match color {
        StatusColor::Green => text.green().to_string(),
        StatusColor::Yellow => text.yellow().to_string(),
        StatusColor::Red => text.red().to_string(),
    }
}

/// `completed/total (percentage%)`
pub fn dashboard_line(dashboard: &Dashboard) -> String {
    format!(
        "{}/{} ({}%)",
        dashboard.completed, dashboard.total, dashboard.percentage
    )
}

/// One todo, e.g. `#0 [todo-1a2b3c] Patch kernel: In progress, High, due 2030-01-01`
pub fn todo_line(row: &TodoRow, color: bool) -> String {
    let mut line = format!(
        "#{} [{}] {}: {}, {}",
        row.position,
        row.id,
        row.name,
        paint(row.status.label(), row.color, color),
        row.priority,
    );
    if let Some(deadline) = &row.deadline {
        let due = format!("due {deadline}");
        if row.overdue {
            let marker = format!("{due} (overdue)");
            if color {
                line.push_str(&format!(", {}", marker.red().bold()));
            } else {
                line.push_str(&format!(", {marker}"));
            }
        } else {
            line.push_str(&format!(", {due}"));
        }
    }
    line
}

/// One staff member, e.g. `#0 [staff-1a2b3c] Ann (Admin): clean, cook`
pub fn staff_line(row: &StaffRow) -> String {
    format!(
        "#{} [{}] {} ({}): {}",
        row.position, row.id, row.name, row.rank, row.summary
    )
}

/// Server name with a marker for the selected one.
pub fn server_line(option: &ServerOption) -> String {
    if option.selected {
        format!("{} (selected)", option.name)
    } else {
        option.name.clone()
    }
}

pub fn render_todos(human: &mut HumanOutput, rows: &[TodoRow], color: bool) {
    for row in rows {
        human.push_detail(todo_line(row, color));
    }
}

pub fn render_staff(human: &mut HumanOutput, rows: &[StaffRow]) {
    for row in rows {
        human.push_detail(staff_line(row));
    }
}

/// Human rendering of the full board.
pub fn render_board(board: &Board, color: bool) -> HumanOutput {
    let Some(dashboard) = board.dashboard.as_ref().filter(|_| board.visible) else {
        let mut human = HumanOutput::new("serverdesk: no servers yet");
        human.push_next_step("serverdesk server add <name>");
        return human;
    };

    let mut human = HumanOutput::new(format!("serverdesk board: {}", dashboard.server));
    human.push_summary("completed", dashboard_line(dashboard));
    human.push_summary("todos", board.todos.len().to_string());
    human.push_summary("staff", board.staff.len().to_string());
    human.push_summary(
        "servers",
        board
            .servers
            .iter()
            .map(server_line)
            .collect::<Vec<_>>()
            .join(", "),
    );

    for row in &board.todos {
        human.push_detail(format!("todo {}", todo_line(row, color)));
    }
    for row in &board.staff {
        human.push_detail(format!("staff {}", staff_line(row)));
    }
    if board.todos.iter().any(|row| row.overdue) {
        human.push_warning("some todos are past their deadline");
    }
    human
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TodoStatus};

    fn row(overdue: bool, deadline: Option<&str>) -> TodoRow {
        TodoRow {
            position: 1,
            id: "todo-abc123".to_string(),
            name: "Patch kernel".to_string(),
            status: TodoStatus::InProgress,
            color: StatusColor::Yellow,
            deadline: deadline.map(str::to_string),
            priority: Priority::High,
            overdue,
        }
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_name_skips_global_flags() {
        assert_eq!(command_name_from(args(&[])), "serverdesk");
        assert_eq!(command_name_from(args(&["board"])), "board");
        assert_eq!(
            command_name_from(args(&["--data-dir", "/tmp/x", "--json", "todo", "add", "patch"])),
            "todo add"
        );
        assert_eq!(
            command_name_from(args(&["--server=Alpha", "staff", "--quiet", "ls"])),
            "staff ls"
        );
    }

    #[test]
    fn todo_line_plain() {
        assert_eq!(
            todo_line(&row(false, None), false),
            "#1 [todo-abc123] Patch kernel: In progress, High"
        );
        assert_eq!(
            todo_line(&row(false, Some("2099-01-01")), false),
            "#1 [todo-abc123] Patch kernel: In progress, High, due 2099-01-01"
        );
        assert_eq!(
            todo_line(&row(true, Some("2000-01-01")), false),
            "#1 [todo-abc123] Patch kernel: In progress, High, due 2000-01-01 (overdue)"
        );
    }

    #[test]
    fn todo_line_colored_keeps_text() {
        let line = todo_line(&row(true, Some("2000-01-01")), true);
        assert!(line.contains("In progress"));
        assert!(line.contains("due 2000-01-01 (overdue)"));
    }

    #[test]
    fn empty_board_suggests_adding_a_server() {
        let board = Board {
            visible: false,
            servers: Vec::new(),
            dashboard: None,
            todos: Vec::new(),
            staff: Vec::new(),
        };
        let rendered = format_human(&render_board(&board, false));
        assert!(rendered.contains("no servers yet"));
        assert!(rendered.contains("serverdesk server add <name>"));
    }

    #[test]
    fn board_lists_sections() {
        let board = Board {
            visible: true,
            servers: vec![
                ServerOption {
                    name: "Alpha".to_string(),
                    selected: true,
                },
                ServerOption {
                    name: "Beta".to_string(),
                    selected: false,
                },
            ],
            dashboard: Some(Dashboard {
                server: "Alpha".to_string(),
                completed: 2,
                total: 3,
                percentage: 67,
            }),
            todos: vec![row(true, Some("2000-01-01"))],
            staff: Vec::new(),
        };
        let rendered = format_human(&render_board(&board, false));
        assert!(rendered.contains("serverdesk board: Alpha"));
        assert!(rendered.contains("- completed: 2/3 (67%)"));
        assert!(rendered.contains("- servers: Alpha (selected), Beta"));
        assert!(rendered.contains("- todo #1 [todo-abc123] Patch kernel"));
        assert!(rendered.contains("Warnings:"));
    }
}

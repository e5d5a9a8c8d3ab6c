//! serverdesk staff command implementation
//!
//! Manages the staff roster of the selected server.

use serde::Serialize;

use crate::error::Result;
use crate::model::{resolve_position, EntityRef, StaffMember};
use crate::output::{emit_success, render_staff, HumanOutput};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::view::{self, StaffRow};

use super::{push_activity, Context};

#[derive(Serialize)]
struct StaffReport {
    server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    staff: Option<StaffMember>,
}

#[derive(Serialize)]
struct StaffLsReport {
    server: String,
    staff: Vec<StaffRow>,
}

pub fn run_add(ctx: &Context, name: &str, rank: &str) -> Result<()> {
    let (mut desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let added = desk.add_staff(&server, name, rank)?;

    let mut human = match &added {
        Some(member) => {
            let mut human = HumanOutput::new(format!("serverdesk staff add: {}", member.name));
            human.push_summary("server", server.clone());
            human.push_summary("id", member.id.clone());
            human.push_summary("rank", member.rank.clone());
            human.push_next_step(format!("serverdesk staff assign {} <responsibility>", member.id));
            human
        }
        None => {
            let mut human = HumanOutput::new("serverdesk staff add: nothing to add");
            human.push_warning("name and rank are both required");
            human
        }
    };
    push_activity(&mut human, desk.feed());

    let report = StaffReport {
        server,
        staff: added,
    };
    emit_success(output, "staff add", &report, Some(&human))
}

pub fn run_ls(ctx: &Context) -> Result<()> {
    let (desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let store = desk.load();
    let rows = view::staff_rows(store.record(&server)?);

    let mut human = HumanOutput::new(format!(
        "serverdesk staff ls: {} member(s) on {server}",
        rows.len()
    ));
    render_staff(&mut human, &rows);
    if rows.is_empty() {
        human.push_next_step("serverdesk staff add <name> <rank>");
    }

    let report = StaffLsReport {
        server,
        staff: rows,
    };
    emit_success(output, "staff ls", &report, Some(&human))
}

pub fn run_rm(ctx: &Context, target: &str) -> Result<()> {
    let target: EntityRef = target.parse()?;
    let (mut desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;
    let member = desk.delete_staff(&server, &target)?;

    let mut human = HumanOutput::new(format!("serverdesk staff rm: {}", member.name));
    human.push_summary("id", member.id.clone());
    push_activity(&mut human, desk.feed());

    let report = StaffReport {
        server,
        staff: Some(member),
    };
    emit_success(output, "staff rm", &report, Some(&human))
}

/// Add a responsibility, prompting for it when `text` is not given.
pub fn run_assign(ctx: &Context, target: &str, text: Option<&str>) -> Result<()> {
    let target: EntityRef = target.parse()?;
    let (mut desk, output) = ctx.open_desk()?;
    let server = ctx.server(&desk)?;

    let text = match text {
        Some(text) => Some(text.to_string()),
        None => {
            let store = desk.load();
            let record = store.record(&server)?;
            let position = resolve_position(&record.staff, &target, "Staff member")?;
            TerminalPrompter::stdio().prompt(&format!(
                "Responsibility for {}",
                record.staff[position].name
            ))?
        }
    };

    let updated = match text {
        Some(text) => desk.add_responsibility(&server, &target, &text)?,
        None => None,
    };

    let mut human = match &updated {
        Some(member) => {
            let mut human = HumanOutput::new(format!("serverdesk staff assign: {}", member.name));
            human.push_summary("responsibilities", view::responsibilities_summary(member));
            human
        }
        None => {
            let mut human = HumanOutput::new("serverdesk staff assign: nothing to add");
            human.push_warning("responsibility is blank");
            human
        }
    };
    push_activity(&mut human, desk.feed());

    let report = StaffReport {
        server,
        staff: updated,
    };
    emit_success(output, "staff assign", &report, Some(&human))
}

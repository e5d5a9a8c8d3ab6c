//! serverdesk board command implementation

use chrono::Utc;

use crate::error::Result;
use crate::output::{emit_success, render_board};

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let (desk, output) = ctx.open_desk()?;
    if ctx.server.is_some() {
        // explicit server must exist
        ctx.server(&desk)?;
    }
    let board = desk.board(ctx.server.as_deref(), Utc::now());
    let human = render_board(&board, output.color);
    emit_success(output, "board", &board, Some(&human))
}

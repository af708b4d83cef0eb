//! `tickets assign <id> <worker>`: hand a ticket to a worker.
//!
//! An `open` ticket moves to `in-progress` automatically; any other status
//! is left as it is.

use crate::cmd::{reject, surface};
use crate::output::{OutputMode, render};
use crate::validate;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use tickets_core::store::{Assignment, TicketStore};
use tickets_core::{Status, Ticket};

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Ticket ID (a unique prefix is enough).
    pub id: String,

    /// Worker session to assign.
    #[arg(value_name = "WORKER")]
    pub worker: String,
}

#[derive(Debug, Serialize)]
struct AssignOutput<'a> {
    ticket: &'a Ticket,
    previous_assignee: Option<&'a str>,
    auto_started: bool,
}

pub fn run_assign(
    args: &AssignArgs,
    output: OutputMode,
    store: &TicketStore,
) -> anyhow::Result<()> {
    if let Err(e) = validate::validate_ticket_id(&args.id) {
        return Err(reject(output, &e));
    }
    if let Err(e) = validate::validate_worker(&args.worker) {
        return Err(reject(output, &e));
    }

    let assignment = surface(output, store.assign(&args.id, &args.worker))?;

    let result = AssignOutput {
        ticket: &assignment.ticket,
        previous_assignee: assignment.previous.as_deref(),
        auto_started: assignment.started,
    };
    render(output, &result, |_, w| render_assign_human(&assignment, w))
}

fn render_assign_human(a: &Assignment, w: &mut dyn Write) -> io::Result<()> {
    let t = &a.ticket;
    if a.started {
        writeln!(w, "Status: {} -> {} (auto)", Status::Open, Status::InProgress)?;
    }
    match a.previous {
        Some(ref old) => writeln!(w, "Reassigned {}: {} -> {}", t.id, old, t.assignee_label()),
        None => writeln!(w, "Assigned {} to {}", t.id, t.assignee_label()),
    }
}

//! `tickets update`: change status, description, and/or title.

use crate::cmd::{reject, surface};
use crate::output::{OutputMode, render};
use crate::validate;
use clap::Args;
use std::io::{self, Write};
use tickets_core::store::{TicketStore, TicketUpdate};
use tickets_core::{Action, HistoryEntry, Ticket};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Ticket ID (a unique prefix is enough).
    pub id: String,

    /// New status: open, in-progress, blocked, waiting, done.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Replace the description (an empty string clears it).
    #[arg(short, long)]
    pub body: Option<String>,

    /// Replace the title.
    #[arg(short, long)]
    pub title: Option<String>,
}

impl UpdateArgs {
    fn field_count(&self) -> usize {
        [
            self.status.is_some(),
            self.body.is_some(),
            self.title.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

pub fn run_update(
    args: &UpdateArgs,
    output: OutputMode,
    store: &TicketStore,
) -> anyhow::Result<()> {
    if let Err(e) = validate::validate_ticket_id(&args.id) {
        return Err(reject(output, &e));
    }
    let status = match args.status.as_deref().map(validate::validate_status) {
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => return Err(reject(output, &e)),
        None => None,
    };
    if let Some(Err(e)) = args.title.as_deref().map(validate::validate_title) {
        return Err(reject(output, &e));
    }

    let changes = TicketUpdate {
        status,
        body: args.body.clone(),
        title: args.title.clone(),
    };
    let ticket = surface(output, store.update(&args.id, &changes))?;

    let applied = args.field_count();
    render(output, &ticket, |t, w| render_update_human(t, applied, w))
}

/// Describe the last `applied` history entries, then confirm.
fn render_update_human(t: &Ticket, applied: usize, w: &mut dyn Write) -> io::Result<()> {
    let start = t.history.len().saturating_sub(applied);
    for HistoryEntry { action, .. } in &t.history[start..] {
        match action {
            Action::StatusChange { .. } => writeln!(w, "Status: {}", action.summary())?,
            other => writeln!(w, "{}", other.summary())?,
        }
    }
    writeln!(w, "Ticket {} updated", t.id)
}

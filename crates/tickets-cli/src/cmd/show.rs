//! `tickets show`: full details and history for one ticket.

use crate::cmd::{reject, surface};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::validate;
use clap::Args;
use std::io::{self, Write};
use tickets_core::Ticket;
use tickets_core::model::timestamp;
use tickets_core::store::TicketStore;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket ID (a unique prefix is enough).
    pub id: String,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, store: &TicketStore) -> anyhow::Result<()> {
    if let Err(e) = validate::validate_ticket_id(&args.id) {
        return Err(reject(output, &e));
    }

    let ticket = surface(output, store.show(&args.id))?;
    render_mode(output, &ticket, render_show_text, render_show_human)
}

fn render_show_human(t: &Ticket, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Ticket {}", t.id))?;
    writeln!(w, "{} {}", t.status.icon(), t.title)?;
    pretty_rule(w)?;
    pretty_kv(w, "status", t.status.as_str())?;
    pretty_kv(w, "assigned", t.assignee_label())?;
    pretty_kv(w, "created", timestamp::format(&t.created_at))?;
    pretty_kv(w, "updated", timestamp::format(&t.updated_at))?;

    if !t.body.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Description")?;
        for line in t.body.lines() {
            writeln!(w, "{line}")?;
        }
    }

    writeln!(w)?;
    pretty_section(w, &format!("History ({})", t.history.len()))?;
    for entry in &t.history {
        writeln!(
            w,
            "[{}] {:<13} {}",
            timestamp::format(&entry.timestamp),
            entry.action.name(),
            entry.action.summary()
        )?;
    }
    Ok(())
}

fn render_show_text(t: &Ticket, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{} {}", t.status.icon(), t.title)?;
    writeln!(w)?;
    writeln!(w, "ID:       {}", t.id)?;
    writeln!(w, "Status:   {}", t.status)?;
    writeln!(w, "Assigned: {}", t.assignee_label())?;
    writeln!(w, "Created:  {}", timestamp::format(&t.created_at))?;
    writeln!(w, "Updated:  {}", timestamp::format(&t.updated_at))?;

    if !t.body.is_empty() {
        writeln!(w)?;
        writeln!(w, "Description:")?;
        for line in t.body.split('\n') {
            writeln!(w, "  {line}")?;
        }
    }

    writeln!(w)?;
    writeln!(w, "History:")?;
    for entry in &t.history {
        writeln!(
            w,
            "  {}: {} {}",
            timestamp::format(&entry.timestamp),
            entry.action.name(),
            entry.action.summary()
        )?;
    }
    Ok(())
}

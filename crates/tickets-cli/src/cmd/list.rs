//! `tickets list`: list tickets with optional status/worker filters.

use crate::cmd::{reject, surface};
use crate::output::{OutputMode, render};
use crate::validate;
use clap::Args;
use std::io::{self, Write};
use tickets_core::Ticket;
use tickets_core::store::{TicketFilter, TicketStore};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: open, in-progress, blocked, waiting, done.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by assigned worker.
    #[arg(short, long, value_name = "WORKER")]
    pub assigned: Option<String>,
}

pub fn run_list(args: &ListArgs, output: OutputMode, store: &TicketStore) -> anyhow::Result<()> {
    let status = match args.status.as_deref().map(validate::validate_status) {
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => return Err(reject(output, &e)),
        None => None,
    };

    let filter = TicketFilter {
        status,
        assigned_to: args.assigned.clone(),
    };
    let tickets = surface(output, store.list(&filter))?;

    render(output, &tickets, |tickets, w| render_list_human(tickets, w))
}

/// One `<icon> <id>: <title> [<status>] -> <worker>` row per ticket.
pub fn render_list_human(tickets: &[Ticket], w: &mut dyn Write) -> io::Result<()> {
    if tickets.is_empty() {
        return writeln!(w, "No tickets");
    }
    for t in tickets {
        writeln!(
            w,
            "{} {}: {} [{}] -> {}",
            t.status.icon(),
            t.id,
            t.title,
            t.status,
            t.assignee_label()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickets_core::TicketId;
    use tickets_core::model::timestamp;

    #[test]
    fn list_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.status.is_none());
        assert!(w.args.assigned.is_none());

        let w = Wrapper::parse_from(["test", "-s", "in-progress", "-a", "auth-worker"]);
        assert_eq!(w.args.status.as_deref(), Some("in-progress"));
        assert_eq!(w.args.assigned.as_deref(), Some("auth-worker"));
    }

    #[test]
    fn empty_list_says_no_tickets() {
        let mut buf = Vec::new();
        render_list_human(&[], &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "No tickets\n");
    }

    #[test]
    fn row_shows_icon_status_and_worker() {
        let mut ticket = Ticket::new(
            TicketId::new_unchecked("abc12345"),
            "Fix login bug",
            "",
            timestamp::now(),
        );
        let mut buf = Vec::new();
        render_list_human(std::slice::from_ref(&ticket), &mut buf).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "○ abc12345: Fix login bug [open] -> unassigned\n"
        );

        ticket.assign(timestamp::now(), "auth-worker");
        let mut buf = Vec::new();
        render_list_human(&[ticket], &mut buf).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "◐ abc12345: Fix login bug [in-progress] -> auth-worker\n"
        );
    }
}

//! `tickets delete`: permanently remove a ticket.
//!
//! There is no tombstone: the ticket file is unlinked. Without `--force`
//! the user is asked to confirm on an interactive terminal, and the command
//! refuses outright when nobody is there to answer.

use crate::cmd::{reject, surface};
use crate::output::{CliError, OutputMode, render, render_error};
use crate::validate;
use clap::Args;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use tickets_core::store::TicketStore;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ticket ID (a unique prefix is enough).
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    ok: bool,
    id: String,
    title: String,
}

enum Confirmation {
    Yes,
    No,
    NotInteractive,
}

fn confirm_delete(title: &str) -> anyhow::Result<Confirmation> {
    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
        return Ok(Confirmation::NotInteractive);
    }

    eprint!("Delete ticket '{title}'? [y/N] ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    if is_yes(&input) {
        Ok(Confirmation::Yes)
    } else {
        Ok(Confirmation::No)
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_ascii_lowercase();
    answer == "y" || answer == "yes"
}

pub fn run_delete(
    args: &DeleteArgs,
    output: OutputMode,
    store: &TicketStore,
) -> anyhow::Result<()> {
    if let Err(e) = validate::validate_ticket_id(&args.id) {
        return Err(reject(output, &e));
    }

    let target = surface(output, store.show(&args.id))?;

    if !args.force {
        match confirm_delete(&target.title)? {
            Confirmation::Yes => {}
            Confirmation::No => {
                render_error(output, &CliError::new("Aborted"))?;
                anyhow::bail!("deletion of '{}' cancelled", target.id);
            }
            Confirmation::NotInteractive => {
                render_error(
                    output,
                    &CliError::with_details(
                        format!("refusing to delete '{}' without confirmation", target.id),
                        "pass --force to delete non-interactively",
                        "confirmation_required",
                    ),
                )?;
                anyhow::bail!("deletion of '{}' needs --force", target.id);
            }
        }
    }

    let deleted = surface(output, store.delete(target.id.as_str()))?;
    let result = DeleteOutput {
        ok: true,
        id: deleted.id.to_string(),
        title: deleted.title,
    };
    render(output, &result, |r, w| writeln!(w, "Deleted ticket: {}", r.id))
}

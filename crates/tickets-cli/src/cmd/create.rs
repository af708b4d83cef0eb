//! `tickets create`: open a new ticket, optionally assigned.

use crate::cmd::{reject, surface};
use crate::output::{OutputMode, render};
use crate::validate;
use clap::Args;
use tickets_core::store::TicketStore;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Short title of the task.
    pub title: String,

    /// Detailed description of the task.
    #[arg(short, long, default_value = "")]
    pub body: String,

    /// Assign to a worker immediately (moves the ticket to in-progress).
    #[arg(short, long, value_name = "WORKER")]
    pub assign: Option<String>,
}

pub fn run_create(
    args: &CreateArgs,
    output: OutputMode,
    store: &TicketStore,
) -> anyhow::Result<()> {
    if let Err(e) = validate::validate_title(&args.title) {
        return Err(reject(output, &e));
    }
    if let Some(Err(e)) = args.assign.as_deref().map(validate::validate_worker) {
        return Err(reject(output, &e));
    }

    let ticket = surface(
        output,
        store.create(&args.title, &args.body, args.assign.as_deref()),
    )?;

    render(output, &ticket, |t, w| {
        writeln!(w, "Created ticket: {}", t.id)?;
        writeln!(w, "  Title: {}", t.title)?;
        if let Some(ref worker) = t.assigned_to {
            writeln!(w, "  Assigned: {worker}")?;
            writeln!(w, "  Status: {}", t.status)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CreateArgs,
        }
        let w = Wrapper::parse_from(["test", "Hello"]);
        assert_eq!(w.args.title, "Hello");
        assert_eq!(w.args.body, "");
        assert!(w.args.assign.is_none());

        let w = Wrapper::parse_from(["test", "Add tests", "-b", "unit + e2e", "-a", "test-worker"]);
        assert_eq!(w.args.body, "unit + e2e");
        assert_eq!(w.args.assign.as_deref(), Some("test-worker"));
    }
}

//! `tickets comment <id> <text>`: workers report progress or issues.

use crate::cmd::{reject, surface};
use crate::output::{OutputMode, render};
use crate::validate;
use clap::Args;
use tickets_core::store::TicketStore;

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Ticket ID (a unique prefix is enough).
    pub id: String,

    /// Comment text. May be empty.
    pub text: String,
}

pub fn run_comment(
    args: &CommentArgs,
    output: OutputMode,
    store: &TicketStore,
) -> anyhow::Result<()> {
    if let Err(e) = validate::validate_ticket_id(&args.id) {
        return Err(reject(output, &e));
    }

    let ticket = surface(output, store.comment(&args.id, &args.text))?;
    render(output, &ticket, |t, w| writeln!(w, "Comment added to {}", t.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CommentArgs,
        }
        let w = Wrapper::parse_from(["test", "abc123", "Started implementation, 50% done"]);
        assert_eq!(w.args.id, "abc123");
        assert_eq!(w.args.text, "Started implementation, 50% done");
    }
}

use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `tickets completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write a completion script for `tickets` to stdout.
///
/// Needs no ticket store, so it runs before any config is resolved.
pub fn run_completions(args: &CompletionsArgs, command: &mut clap::Command) -> anyhow::Result<()> {
    let mut out = std::io::stdout();
    generate(args.shell, command, "tickets", &mut out);
    Ok(())
}

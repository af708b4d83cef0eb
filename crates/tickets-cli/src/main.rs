#![forbid(unsafe_code)]

mod cmd;
mod output;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tickets: file-backed ticket tracker for coordinating worker sessions",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, text, json). Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Ticket directory (overrides TICKETS_DIR and tickets.toml).
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a new ticket",
        long_about = "Create a new ticket with status open. With --assign the ticket is handed to a worker and starts in-progress.",
        after_help = "EXAMPLES:\n    # Create a ticket\n    tickets create \"Fix login bug\" -b \"Users can't login with email\"\n\n    # Create and assign in one step\n    tickets create \"Add OAuth\" -a auth-worker"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Change status, description, or title",
        long_about = "Update one or more fields of a ticket. Each changed field is recorded in the ticket history.",
        after_help = "EXAMPLES:\n    # Mark a ticket done\n    tickets update abc123 -s done\n\n    # Block it with an explanation\n    tickets update abc123 -s blocked -b \"Waiting on API keys\""
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Assign a ticket to a worker",
        long_about = "Assign a ticket to a worker session. An open ticket moves to in-progress automatically.",
        after_help = "EXAMPLES:\n    # Assign to a worker\n    tickets assign abc123 auth-worker"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Add a comment to a ticket",
        after_help = "EXAMPLES:\n    # Report progress\n    tickets comment abc123 \"Started implementation, 50% done\""
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Permanently delete a ticket",
        long_about = "Delete a ticket file. Asks for confirmation on a terminal; use --force in scripts.",
        after_help = "EXAMPLES:\n    # Delete without prompting\n    tickets delete abc123 --force"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tickets",
        after_help = "EXAMPLES:\n    # Everything\n    tickets list\n\n    # Work in progress for one worker\n    tickets list -s in-progress -a auth-worker\n\n    # Machine-readable\n    tickets list --format json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show ticket details and history",
        after_help = "EXAMPLES:\n    # Full ID or any unique prefix\n    tickets show abc1"
    )]
    Show(cmd::show::ShowArgs),

    #[command(next_help_heading = "Read", about = "Count tickets by status")]
    Stats,

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    tickets completions bash > ~/.local/share/bash-completion/completions/tickets"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "tickets=debug,info"
    } else {
        "tickets=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TICKETS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let format = env::var("TICKETS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            let layer = fmt::layer().json().with_ansi(false);
            registry.with(layer.with_writer(io::stderr)).init();
        }
        _ => {
            let layer = fmt::layer().compact();
            registry.with(layer.with_writer(io::stderr)).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions(ref args) = cli.command {
        return cmd::completions::run_completions(args, &mut Cli::command());
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    debug!(?output, root = %project_root.display(), "starting");

    let store = cmd::open_store(&project_root, cli.dir.as_deref(), output)?;

    match cli.command {
        Commands::Create(ref args) => cmd::create::run_create(args, output, &store),
        Commands::Update(ref args) => cmd::update::run_update(args, output, &store),
        Commands::Assign(ref args) => cmd::assign::run_assign(args, output, &store),
        Commands::Comment(ref args) => cmd::comment::run_comment(args, output, &store),
        Commands::Delete(ref args) => cmd::delete::run_delete(args, output, &store),
        Commands::List(ref args) => cmd::list::run_list(args, output, &store),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &store),
        Commands::Stats => cmd::stats::run_stats(output, &store),
        Commands::Completions(_) => Ok(()),
    }
}

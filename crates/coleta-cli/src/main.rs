#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use coleta_core::config;
use output::OutputMode;
use std::env;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "coleta: sample collection scheduler for food and water inspection",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for coleta (ignored when COLETA_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, and user config.
    fn output_mode(&self, user_default: Option<&str>) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, user_default)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a coleta project",
        long_about = "Create .coleta/ with a default config and an empty event store.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    coleta init\n\n    # Re-run in an existing project, keeping its settings and store\n    coleta init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show upcoming collections",
        long_about = "Compute the next due date of every establishment and analyzed item from the \
                      collection history, most urgent first.",
        after_help = "EXAMPLES:\n    # Agenda as of today\n    coleta agenda\n\n    # Only overdue collections\n    coleta agenda --status overdue\n\n    # Evaluate a JSON export as of a fixed date\n    coleta agenda --snapshot history.json --today 2024-06-01 --format json"
    )]
    Agenda(cmd::agenda::AgendaArgs),

    #[command(
        next_help_heading = "Read",
        about = "List requisitions",
        long_about = "List submitted requisitions, newest first.",
        after_help = "EXAMPLES:\n    # Full history\n    coleta history\n\n    # Last 10 submissions as JSON\n    coleta history -n 10 --json"
    )]
    History(cmd::history::HistoryArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one requisition",
        long_about = "Show a requisition with its establishment and requested analyses.",
        after_help = "EXAMPLES:\n    # Show requisition 42\n    coleta show 42"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    coleta completions bash\n\n    # Generate zsh completions\n    coleta completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose || env::var("DEBUG").is_ok() {
        "coleta=debug,info"
    } else {
        "coleta=info,warn"
    }
}

/// Logs go to stderr so `--format json` output stays parseable.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COLETA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let format = env::var("COLETA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let user_output = match config::load_user_config() {
        Ok(user) => user.output,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable user config");
            None
        }
    };
    let output = cli.output_mode(user_output.as_deref());
    debug!(?output, "resolved output mode");

    let project_root = env::current_dir()?;

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Agenda(ref args) => cmd::agenda::run_agenda(args, output, &project_root),
        Commands::History(ref args) => cmd::history::run_history(args, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "confbot", version, about = "Conference schedule bot CLI")]
struct Cli {
    /// Schedule snapshot (JSON array of scraped events)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    /// Config file (defaults to ~/.config/confbot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what is running now (or at --at), skipping empty slots
    Now {
        #[command(flatten)]
        args: commands::browse::PageArgs,
        /// Reference time, e.g. 2019-05-03T10:15 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Follow a navigation token (DDxHHxMM)
    Goto {
        #[command(flatten)]
        args: commands::browse::PageArgs,
        token: String,
    },
    /// Inline search over upcoming events
    Search(commands::search::SearchArgs),
    /// Schedule snapshot inspection
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let result =
        commands::Context::load(cli.config, cli.snapshot).and_then(|ctx| match cli.command {
            Commands::Now { args, at } => commands::browse::now(&ctx, at.as_deref(), &args),
            Commands::Goto { args, token } => commands::browse::goto(&ctx, &token, &args),
            Commands::Search(args) => commands::search::run(&ctx, &args),
            Commands::Schedule { action } => commands::schedule::run(&ctx, action),
            Commands::Config { action } => commands::config::run(ctx, action),
        });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

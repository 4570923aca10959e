use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tapvoice::command::{DispatchResult, Dispatcher};
use tapvoice::config::Config;
use tapvoice::repl::{self, ExitReason};
use tapvoice::session::Session;
use tapvoice::ui::{self, ConsoleSink};

#[derive(Parser)]
#[command(name = "tapvoice", version, about = "Voice commands and tap gestures for an accessible app")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session (default)
    Run,
    /// Resolve one utterance and print the destination
    Dispatch {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// List the voice commands and their pages
    Pages,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start runtime")?
            .block_on(run_interactive(config)),
        Command::Dispatch { words } => {
            let dispatcher = Dispatcher::new(config.commands.rules);
            match dispatcher.dispatch(&words.join(" ")) {
                DispatchResult::Matched {
                    destination,
                    keyword,
                } => {
                    println!("{} ({})", destination, keyword);
                    Ok(())
                }
                DispatchResult::Unmatched => {
                    println!("unmatched");
                    std::process::exit(1);
                }
            }
        }
        Command::Pages => {
            for rule in &config.commands.rules {
                println!("{:<20} {}", rule.destination, rule.keywords.join(", "));
            }
            Ok(())
        }
    }
}

async fn run_interactive(config: Config) -> anyhow::Result<()> {
    let mut session = Session::new(&config, Arc::new(ConsoleSink));
    ui::banner(&session.state().current_page());

    let input = repl::spawn_stdin_reader();
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    let reason = repl::run(&mut session, input, shutdown).await;
    info!(?reason, "session ended");
    if reason == ExitReason::Interrupted {
        println!();
    }
    Ok(())
}

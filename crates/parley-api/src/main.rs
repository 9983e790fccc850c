//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes tracing, loads configuration, then
//! dispatches to the requested command.

mod cli;
mod config;

use clap::Parser;
use clap_complete::generate;
use parley_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_directive};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_directive(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let file_config = config::load_config(cli.config.as_deref()).await;

    let result = match cli.command {
        Commands::Respond {
            message,
            analysis,
            seed,
        } => {
            let config = config::apply_overrides(file_config, seed, None);
            cli::respond::respond(&config, &message, analysis.as_deref(), cli.json)
        }

        Commands::Chat { name, seed } => {
            let config = config::apply_overrides(file_config, seed, name);
            cli::chat::loop_runner::run_chat_loop(&config, cli.json).await
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

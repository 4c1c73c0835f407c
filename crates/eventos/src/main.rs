mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::util::TerminalNavigator;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "eventos", &mut std::io::stdout());
            Ok(())
        }

        // Everything else runs against a restored session
        cmd => {
            let resolved = config::resolve(&cli.global)?;
            let navigator = Arc::new(TerminalNavigator::new(
                cli.global.quiet,
                output::should_color(&cli.global.color),
            ));
            let ctx = config::build_context(&resolved, navigator)?;

            tracing::debug!(
                command = ?cmd,
                profile = %resolved.profile_name,
                api = %resolved.client.api_url,
                "dispatching command"
            );
            commands::dispatch(cmd, &ctx, &resolved, &cli.global).await
        }
    }
}

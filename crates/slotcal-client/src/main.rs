//! slotcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use slotcal_core::{TracingConfig, init_tracing};

use slotcal_client::cli::{self, Cli, Command, ConfigAction};
use slotcal_client::commands;
use slotcal_client::commands::week::WeekOptions;
use slotcal_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = cli::load_config(&cli)?;

    let tracing_config = if config.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config.with_format(cli.log_format.into())) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
        None => {
            let options = WeekOptions {
                date: cli.date,
                weeks_ahead: cli.weeks_ahead,
                select: cli.select,
                locale: cli.locale.into(),
                json: cli.json,
            };
            commands::week::show(&config, &options).await
        }
    }
}

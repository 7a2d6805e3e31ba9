#![warn(clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use paym_cli::commands::handle_command;
use paym_cli::state::{State, StateOptions};
use paym_cli::{utils, CLI};

#[tokio::main]
async fn main() -> Result<()> {
    // setup panic hook
    utils::set_hook();

    let cli = CLI::parse();

    utils::logs(cli.verbose);

    let state = State::new(StateOptions {
        override_parent: cli.parent,
        override_api_url: std::env::var("PAYM_API_URL").ok(),
    })
    .await?;

    if let Err(error) = handle_command(cli.commands, state).await {
        log::error!("{error}");
        std::process::exit(1);
    }

    Ok(())
}

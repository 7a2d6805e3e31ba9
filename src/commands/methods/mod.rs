mod activate;
mod add;
mod delete;
mod list;
mod manage;
pub mod types;
pub mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::state::State;

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[clap(name = "ls", alias = "list")]
    List(list::Options),
    #[clap(name = "add", alias = "new")]
    Add(add::Options),
    #[clap(name = "activate", alias = "use")]
    Activate(activate::Options),
    #[clap(name = "rm", alias = "del", alias = "delete", alias = "remove")]
    Delete(delete::Options),
    Manage(manage::Options),
}

#[derive(Debug, Parser)]
#[clap(about = "Interact with payment methods")]
#[group(skip)]
pub struct Options {
    #[clap(subcommand)]
    pub commands: Commands,
}

pub async fn handle(options: Options, state: State) -> Result<()> {
    match options.commands {
        Commands::List(options) => list::handle(&options, &state).await,
        Commands::Add(options) => add::handle(&options, &state).await,
        Commands::Activate(options) => activate::handle(&options, &state).await,
        Commands::Delete(options) => delete::handle(&options, &state).await,
        Commands::Manage(options) => manage::handle(&options, &state).await,
    }
}

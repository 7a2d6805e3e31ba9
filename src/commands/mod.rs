pub mod completions;
pub mod methods;
pub mod switch;

use anyhow::Result;
use clap::Subcommand;

use crate::state::State;

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[clap(name = "methods", alias = "method", alias = "pm")]
    Methods(methods::Options),
    Switch(switch::Options),
    Completions(completions::Options),
}

pub async fn handle_command(command: Commands, state: State) -> Result<()> {
    match command {
        Commands::Methods(options) => methods::handle(options, state).await,
        Commands::Switch(options) => switch::handle(options, state).await,
        Commands::Completions(options) => {
            completions::handle(&options);

            Ok(())
        }
    }
}

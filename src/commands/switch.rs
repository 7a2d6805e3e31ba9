use anyhow::Result;
use clap::Parser;

use crate::state::State;
use crate::store::Store;

#[derive(Debug, Parser)]
#[clap(about = "Set the default parent account")]
pub struct Options {
    #[clap(name = "parent", help = "ID of the parent account")]
    parent: Option<i64>,
}

pub async fn handle(options: Options, mut state: State) -> Result<()> {
    let parent = match options.parent.or(state.ctx.parent_override) {
        Some(parent) => parent,
        None => dialoguer::Input::<i64>::new()
            .with_prompt("Parent account ID")
            .interact_text()?,
    };

    state.ctx.default_parent = Some(parent);
    state.ctx.save().await?;

    log::info!("Default parent account set to `{parent}`");

    Ok(())
}

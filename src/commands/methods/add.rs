use anyhow::Result;
use clap::Parser;

use super::utils::add_method;
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Add a new payment method")]
#[group(skip)]
pub struct Options {
    #[clap(name = "label", help = "Label describing the payment method")]
    pub label: Option<String>,
}

pub async fn handle(options: &Options, state: &State) -> Result<()> {
    let parent_id = state.ctx.current_parent_error();

    let label = match &options.label {
        Some(label) => label.clone(),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Label")
            .allow_empty(true)
            .interact_text()?,
    };

    match add_method(&state.http, parent_id, &label).await? {
        Some(method) => log::info!("Added payment method `{}` ({})", method.method, method.id),

        // blank input, nothing was sent
        None => log::debug!("Empty label, skipping"),
    }

    Ok(())
}

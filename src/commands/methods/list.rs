use anyhow::Result;
use clap::Parser;

use super::utils::{format_methods, PaymentsApi};
use crate::config::EXEC_NAME;
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "List all payment methods")]
#[group(skip)]
pub struct Options {
    #[clap(short, long, help = "Only print the IDs of the payment methods")]
    pub quiet: bool,
}

pub async fn handle(options: &Options, state: &State) -> Result<()> {
    let parent_id = state.ctx.current_parent_error();

    let methods = state.http.payment_methods(parent_id).await?;

    if methods.is_empty() {
        log::info!(
            "No payment methods yet. Add one with `{EXEC_NAME} methods add <label>`"
        );

        return Ok(());
    }

    if options.quiet {
        let ids = methods
            .iter()
            .map(|method| method.id.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        println!("{ids}");
    } else {
        let methods_fmt = format_methods(&methods, true)?;

        println!("{}", methods_fmt.join("\n"));
    }

    Ok(())
}

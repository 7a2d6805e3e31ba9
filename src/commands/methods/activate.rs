use anyhow::{ensure, Result};
use clap::Parser;

use super::utils::{activate_method, format_methods, PaymentsApi};
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Set the active payment method")]
#[group(skip)]
pub struct Options {
    #[clap(name = "method", help = "ID of the payment method")]
    pub method: Option<i64>,
}

pub async fn handle(options: &Options, state: &State) -> Result<()> {
    let parent_id = state.ctx.current_parent_error();

    let methods = state.http.payment_methods(parent_id).await?;
    ensure!(!methods.is_empty(), "No payment methods found");

    let method_id = match options.method {
        Some(id) => id,

        None => {
            // only inactive methods get an activate control
            let inactive = methods
                .iter()
                .filter(|method| !method.is_active)
                .cloned()
                .collect::<Vec<_>>();

            ensure!(!inactive.is_empty(), "All payment methods are already active");

            let inactive_fmt = format_methods(&inactive, false)?;

            let idx = dialoguer::Select::new()
                .with_prompt("Select a payment method to activate")
                .items(&inactive_fmt)
                .default(0)
                .interact()?;

            inactive[idx].id
        }
    };

    let methods = activate_method(&state.http, parent_id, method_id).await?;

    let active = methods
        .iter()
        .find(|method| method.is_active)
        .map_or_else(|| method_id.to_string(), |method| method.method.clone());

    log::info!("Payment method `{active}` is now active");

    Ok(())
}

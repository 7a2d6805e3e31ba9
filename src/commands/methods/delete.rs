use anyhow::{anyhow, ensure, Result};
use clap::Parser;

use super::types::DeletePlan;
use super::utils::{delete_method, format_methods, plan_delete, PaymentsApi};
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Delete a payment method")]
#[group(skip)]
pub struct Options {
    #[clap(name = "method", help = "ID of the payment method")]
    pub method: Option<i64>,

    #[clap(short = 'f', long = "force", help = "Skip confirmation")]
    pub force: bool,
}

pub async fn handle(options: &Options, state: &State) -> Result<()> {
    let parent_id = state.ctx.current_parent_error();

    let methods = state.http.payment_methods(parent_id).await?;
    ensure!(!methods.is_empty(), "No payment methods found");

    let method = match options.method {
        Some(id) => methods
            .iter()
            .find(|method| method.id == id)
            .ok_or_else(|| anyhow!("Payment method `{id}` not found"))?
            .clone(),

        None => {
            let methods_fmt = format_methods(&methods, false)?;

            let idx = dialoguer::Select::new()
                .with_prompt("Select a payment method to delete")
                .items(&methods_fmt)
                .default(0)
                .interact_opt()?
                .ok_or_else(|| anyhow!("No payment method selected"))?;

            methods[idx].clone()
        }
    };

    if !options.force {
        let mut prompt = format!("Are you sure you want to delete `{}`?", method.method);

        if let DeletePlan::ReassignThenDelete { fallback } =
            plan_delete(&methods, method.id, method.is_active)
        {
            let fallback = methods
                .iter()
                .find(|method| method.id == fallback)
                .map_or_else(|| fallback.to_string(), |method| method.method.clone());

            prompt = format!(
                "`{}` is the active method, `{fallback}` will become active. Delete anyway?",
                method.method
            );
        }

        let confirmed = dialoguer::Confirm::new().with_prompt(prompt).interact_opt()?;

        ensure!(confirmed == Some(true), "Aborted");
    }

    let remaining =
        delete_method(&state.http, parent_id, &methods, method.id, method.is_active).await?;

    log::info!(
        "Deleted payment method `{}`, {} remaining",
        method.method,
        remaining.len()
    );

    Ok(())
}

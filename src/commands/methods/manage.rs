use anyhow::Result;
use clap::Parser;
use console::style;

use super::types::{DeletePlan, PaymentMethod};
use super::utils::{
    activate_method, add_method, delete_method, format_methods, plan_delete, PaymentsApi,
    SOLE_METHOD_WARNING,
};
use crate::state::State;

#[derive(Debug, Parser)]
#[clap(about = "Manage payment methods interactively")]
#[group(skip)]
pub struct Options {}

enum Action {
    Add,
    Activate,
    Delete,
    Refresh,
    Quit,
}

pub async fn handle(_options: &Options, state: &State) -> Result<()> {
    let parent_id = state.ctx.current_parent_error();
    let term = console::Term::stdout();

    loop {
        let methods = load(state, parent_id, &term).await?;

        render(&methods)?;

        match prompt_action(&methods)? {
            Action::Add => {
                let label = dialoguer::Input::<String>::new()
                    .with_prompt("New payment method")
                    .allow_empty(true)
                    .interact_text()?;

                run_add(&state.http, parent_id, &label).await;
            }

            Action::Activate => {
                let inactive = methods
                    .iter()
                    .filter(|method| !method.is_active)
                    .cloned()
                    .collect::<Vec<_>>();

                if let Some(method) = select_method("Activate which method?", &inactive)? {
                    run_activate(&state.http, parent_id, &method).await;
                }
            }

            Action::Delete => {
                if let Some(method) = select_method("Delete which method?", &methods)? {
                    run_delete(&state.http, parent_id, &methods, &method).await;
                }
            }

            Action::Refresh => {}

            Action::Quit => break,
        }
    }

    Ok(())
}

// A failed mutation is reported and the session returns to the menu,
// it never ends the loop.

async fn run_add(api: &impl PaymentsApi, parent_id: i64, label: &str) {
    match add_method(api, parent_id, label).await {
        Ok(Some(method)) => log::info!("Added `{}` ({})", method.method, method.id),

        // blank input is silently ignored
        Ok(None) => log::debug!("Empty label, skipping"),

        Err(error) => log::error!("{error}"),
    }
}

async fn run_activate(api: &impl PaymentsApi, parent_id: i64, method: &PaymentMethod) {
    match activate_method(api, parent_id, method.id).await {
        Ok(_) => log::info!("`{}` is now active", method.method),
        Err(error) => log::error!("{error}"),
    }
}

async fn run_delete(
    api: &impl PaymentsApi,
    parent_id: i64,
    methods: &[PaymentMethod],
    method: &PaymentMethod,
) {
    if plan_delete(methods, method.id, method.is_active) == DeletePlan::Refuse {
        log::warn!("{SOLE_METHOD_WARNING}");

        return;
    }

    match delete_method(api, parent_id, methods, method.id, method.is_active).await {
        Ok(_) => log::info!("Deleted `{}`", method.method),
        Err(error) => log::error!("{error}"),
    }
}

async fn load(state: &State, parent_id: i64, term: &console::Term) -> Result<Vec<PaymentMethod>> {
    println!("{}", style("Loading payment methods...").dim());

    let methods = state.http.payment_methods(parent_id).await;

    if term.is_term() {
        term.clear_last_lines(1)?;
    }

    methods
}

fn render(methods: &[PaymentMethod]) -> Result<()> {
    println!("{}", style("Payment Methods").bold());

    if methods.is_empty() {
        println!("{}", style("No payment methods yet").dim());
    } else {
        println!("{}", format_methods(methods, true)?.join("\n"));
    }

    Ok(())
}

fn prompt_action(methods: &[PaymentMethod]) -> Result<Action> {
    let mut actions = vec![(Action::Add, "Add a payment method")];

    if methods.iter().any(|method| !method.is_active) {
        actions.push((Action::Activate, "Activate a payment method"));
    }

    if !methods.is_empty() {
        actions.push((Action::Delete, "Delete a payment method"));
    }

    actions.push((Action::Refresh, "Refresh"));
    actions.push((Action::Quit, "Quit"));

    let labels = actions.iter().map(|(_, label)| *label).collect::<Vec<_>>();

    let idx = dialoguer::Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(actions.swap_remove(idx).0)
}

fn select_method(prompt: &str, methods: &[PaymentMethod]) -> Result<Option<PaymentMethod>> {
    if methods.is_empty() {
        return Ok(None);
    }

    let methods_fmt = format_methods(methods, false)?;

    let idx = dialoguer::Select::new()
        .with_prompt(prompt)
        .items(&methods_fmt)
        .default(0)
        .interact_opt()?;

    Ok(idx.map(|idx| methods[idx].clone()))
}

#[cfg(test)]
mod test {
    use anyhow::anyhow;
    use mockall::predicate::eq;

    use super::super::utils::MockPaymentsApi;
    use super::*;

    fn method(id: i64, label: &str, is_active: bool) -> PaymentMethod {
        PaymentMethod {
            id,
            method: label.to_string(),
            is_active,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_failed_add_returns_to_the_menu() {
        let mut api = MockPaymentsApi::new();

        api.expect_add_payment_method()
            .times(1)
            .returning(|_, _, _| Err(anyhow!("connection refused")));

        // completing at all means the session keeps going
        run_add(&api, 9, "Visa").await;
    }

    #[tokio::test]
    async fn test_failed_delete_returns_to_the_menu() {
        let methods = [method(1, "Visa", true), method(2, "Mastercard", false)];

        let mut api = MockPaymentsApi::new();

        api.expect_delete_payment_method()
            .with(eq(9), eq(2))
            .times(1)
            .returning(|_, _| Err(anyhow!("connection refused")));

        run_delete(&api, 9, &methods, &methods[1]).await;
    }

    #[tokio::test]
    async fn test_sole_method_delete_warns_without_remote_calls() {
        let methods = [method(1, "Visa", true)];

        // no expectations: any remote call would panic the mock
        let api = MockPaymentsApi::new();

        run_delete(&api, 9, &methods, &methods[0]).await;
    }
}

use std::io::Write;

use anyhow::{bail, ensure, Result};
use async_trait::async_trait;
use serde_json::json;
use tabwriter::TabWriter;

use super::types::{DeletePlan, PaymentMethod};
use crate::state::graphql::GraphQLClient;
use crate::utils::{current_timestamp, human_date};

pub const GET_PAYMENT_METHODS: &str = r"
query GetPaymentMethods($parentId: Long!) {
    paymentMethods(parentId: $parentId) {
        id
        method
        isActive
        createdAt
    }
}";

pub const SET_ACTIVE_PAYMENT_METHOD: &str = r"
mutation SetActivePaymentMethod($parentId: Long!, $methodId: Long!) {
    setActivePaymentMethod(parentId: $parentId, methodId: $methodId) {
        id
        method
        isActive
    }
}";

pub const ADD_PAYMENT_METHOD: &str = r"
mutation AddPaymentMethod($parentId: Long!, $method: String!, $createdAt: String!) {
    addPaymentMethod(parentId: $parentId, method: $method, createdAt: $createdAt) {
        id
        method
        isActive
        createdAt
    }
}";

pub const DELETE_PAYMENT_METHOD: &str = r"
mutation DeletePaymentMethod($parentId: Long!, $methodId: Long!) {
    deletePaymentMethod(parentId: $parentId, methodId: $methodId)
}";

pub const SOLE_METHOD_WARNING: &str =
    "You cannot delete the only active payment method. Please add a new payment method first.";

/// The four remote operations. Commands run against this trait so the
/// flows can be exercised without a live endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsApi {
    async fn payment_methods(&self, parent_id: i64) -> Result<Vec<PaymentMethod>>;
    async fn set_active_payment_method(
        &self,
        parent_id: i64,
        method_id: i64,
    ) -> Result<PaymentMethod>;
    async fn add_payment_method(
        &self,
        parent_id: i64,
        method: &str,
        created_at: &str,
    ) -> Result<PaymentMethod>;
    async fn delete_payment_method(&self, parent_id: i64, method_id: i64) -> Result<bool>;
}

#[async_trait]
impl PaymentsApi for GraphQLClient {
    async fn payment_methods(&self, parent_id: i64) -> Result<Vec<PaymentMethod>> {
        self.query(
            GET_PAYMENT_METHODS,
            "paymentMethods",
            json!({ "parentId": parent_id }),
        )
        .await
    }

    async fn set_active_payment_method(
        &self,
        parent_id: i64,
        method_id: i64,
    ) -> Result<PaymentMethod> {
        self.mutate(
            SET_ACTIVE_PAYMENT_METHOD,
            "setActivePaymentMethod",
            json!({ "parentId": parent_id, "methodId": method_id }),
            &["paymentMethods"],
        )
        .await
    }

    async fn add_payment_method(
        &self,
        parent_id: i64,
        method: &str,
        created_at: &str,
    ) -> Result<PaymentMethod> {
        self.mutate(
            ADD_PAYMENT_METHOD,
            "addPaymentMethod",
            json!({ "parentId": parent_id, "method": method, "createdAt": created_at }),
            &["paymentMethods"],
        )
        .await
    }

    async fn delete_payment_method(&self, parent_id: i64, method_id: i64) -> Result<bool> {
        self.mutate(
            DELETE_PAYMENT_METHOD,
            "deletePaymentMethod",
            json!({ "parentId": parent_id, "methodId": method_id }),
            &["paymentMethods"],
        )
        .await
    }
}

/// Trims a new-method label. Whitespace-only input means "nothing to
/// submit" and the caller skips the remote call entirely.
pub fn normalize_label(input: &str) -> Option<String> {
    let label = input.trim();

    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Decides a delete against the loaded set. Deleting the active method
/// first hands the active flag to the first other method in loaded
/// order, and deleting the only method is refused outright.
pub fn plan_delete(methods: &[PaymentMethod], method_id: i64, is_active: bool) -> DeletePlan {
    if !is_active {
        return DeletePlan::Delete;
    }

    match methods.iter().find(|method| method.id != method_id) {
        Some(fallback) => DeletePlan::ReassignThenDelete {
            fallback: fallback.id,
        },
        None => DeletePlan::Refuse,
    }
}

/// Adds a payment method stamped with the local clock, then returns the
/// created method. `Ok(None)` means the input was blank and nothing was
/// sent.
pub async fn add_method(
    api: &impl PaymentsApi,
    parent_id: i64,
    input: &str,
) -> Result<Option<PaymentMethod>> {
    let Some(label) = normalize_label(input) else {
        return Ok(None);
    };

    let created_at = current_timestamp();

    let method = api.add_payment_method(parent_id, &label, &created_at).await?;

    Ok(Some(method))
}

/// Makes `method_id` the active method and refetches the list.
pub async fn activate_method(
    api: &impl PaymentsApi,
    parent_id: i64,
    method_id: i64,
) -> Result<Vec<PaymentMethod>> {
    api.set_active_payment_method(parent_id, method_id).await?;

    api.payment_methods(parent_id).await
}

/// Deletes `method_id` per [`plan_delete`] and refetches the list. The
/// reassignment is awaited before the delete fires so the parent never
/// passes through a zero-active-method state.
pub async fn delete_method(
    api: &impl PaymentsApi,
    parent_id: i64,
    methods: &[PaymentMethod],
    method_id: i64,
    is_active: bool,
) -> Result<Vec<PaymentMethod>> {
    match plan_delete(methods, method_id, is_active) {
        DeletePlan::Refuse => bail!(SOLE_METHOD_WARNING),

        DeletePlan::ReassignThenDelete { fallback } => {
            api.set_active_payment_method(parent_id, fallback).await?;

            let deleted = api.delete_payment_method(parent_id, method_id).await?;

            ensure!(deleted, "The remote system refused to delete `{method_id}`");
        }

        DeletePlan::Delete => {
            let deleted = api.delete_payment_method(parent_id, method_id).await?;

            ensure!(deleted, "The remote system refused to delete `{method_id}`");
        }
    }

    api.payment_methods(parent_id).await
}

pub fn format_methods(methods: &[PaymentMethod], title: bool) -> Result<Vec<String>> {
    let mut tw = TabWriter::new(vec![]);

    if title {
        writeln!(&mut tw, "LABEL\tID\tSTATUS\tCREATED")?;
    }

    for method in methods {
        writeln!(
            &mut tw,
            "{}\t{}\t{}\t{}",
            method.method,
            method.id,
            method.status(),
            method
                .created_at
                .as_deref()
                .map_or_else(|| "-".to_string(), human_date),
        )?;
    }

    let out = String::from_utf8(tw.into_inner().unwrap())?
        .lines()
        .map(std::string::ToString::to_string)
        .collect();

    Ok(out)
}

#[cfg(test)]
mod test {
    use mockall::predicate::eq;
    use mockall::Sequence;

    use super::*;

    fn method(id: i64, label: &str, is_active: bool) -> PaymentMethod {
        PaymentMethod {
            id,
            method: label.to_string(),
            is_active,
            created_at: Some("2024-03-05 09:03:07".to_string()),
        }
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label(" "), None);
        assert_eq!(normalize_label("   "), None);
        assert_eq!(normalize_label("  Visa  "), Some("Visa".to_string()));
    }

    #[test]
    fn test_plan_inactive_deletes_directly() {
        let methods = [method(1, "Visa", true), method(2, "Mastercard", false)];

        assert_eq!(plan_delete(&methods, 2, false), DeletePlan::Delete);
    }

    #[test]
    fn test_plan_active_reassigns_to_first_other() {
        let methods = [method(1, "Visa", true), method(2, "Mastercard", false)];

        assert_eq!(
            plan_delete(&methods, 1, true),
            DeletePlan::ReassignThenDelete { fallback: 2 }
        );
    }

    #[test]
    fn test_plan_refuses_sole_method() {
        let methods = [method(1, "Visa", true)];

        assert_eq!(plan_delete(&methods, 1, true), DeletePlan::Refuse);
    }

    #[test]
    fn test_format_methods() {
        let rows = format_methods(
            &[method(1, "Visa", true), method(2, "Mastercard", false)],
            true,
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("LABEL"));
        assert!(rows[1].contains("Visa") && rows[1].contains("Active"));
        assert!(rows[2].contains("Mastercard") && rows[2].contains("Inactive"));
        assert!(rows[1].contains("Mar 05, 2024"));
    }

    #[test]
    fn test_format_methods_empty() {
        let rows = format_methods(&[], true).unwrap();

        // header only, no data rows
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("LABEL"));

        assert!(format_methods(&[], false).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_active_reassigns_then_deletes_then_refetches() {
        let methods = [method(1, "Visa", true), method(2, "Mastercard", false)];

        let mut api = MockPaymentsApi::new();
        let mut seq = Sequence::new();

        api.expect_set_active_payment_method()
            .with(eq(9), eq(2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(method(2, "Mastercard", true)));
        api.expect_delete_payment_method()
            .with(eq(9), eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(true));
        api.expect_payment_methods()
            .with(eq(9))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![method(2, "Mastercard", true)]));

        let remaining = delete_method(&api, 9, &methods, 1, true).await.unwrap();

        assert_eq!(remaining, vec![method(2, "Mastercard", true)]);
    }

    #[tokio::test]
    async fn test_delete_sole_method_makes_no_remote_calls() {
        let methods = [method(1, "Visa", true)];

        // no expectations: any remote call would panic the mock
        let api = MockPaymentsApi::new();

        let error = delete_method(&api, 9, &methods, 1, true)
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), SOLE_METHOD_WARNING);
    }

    #[tokio::test]
    async fn test_delete_inactive_skips_reassignment() {
        let methods = [method(1, "Visa", true), method(2, "Mastercard", false)];

        let mut api = MockPaymentsApi::new();
        let mut seq = Sequence::new();

        api.expect_delete_payment_method()
            .with(eq(9), eq(2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(true));
        api.expect_payment_methods()
            .with(eq(9))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![method(1, "Visa", true)]));

        delete_method(&api, 9, &methods, 2, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_sends_trimmed_label() {
        let mut api = MockPaymentsApi::new();

        api.expect_add_payment_method()
            .withf(|parent_id, label, created_at| {
                *parent_id == 9
                    && label == "Visa"
                    && chrono::NaiveDateTime::parse_from_str(created_at, "%Y-%m-%d %H:%M:%S")
                        .is_ok()
            })
            .times(1)
            .returning(|_, label, _| Ok(method(3, label, false)));

        let created = add_method(&api, 9, "  Visa  ").await.unwrap();

        assert_eq!(created, Some(method(3, "Visa", false)));
    }

    #[tokio::test]
    async fn test_add_blank_is_a_noop() {
        let api = MockPaymentsApi::new();

        for input in ["", " ", "   "] {
            assert_eq!(add_method(&api, 9, input).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_activate_twice_settles_on_same_state() {
        let mut api = MockPaymentsApi::new();

        api.expect_set_active_payment_method()
            .with(eq(9), eq(2))
            .times(2)
            .returning(|_, _| Ok(method(2, "Mastercard", true)));
        api.expect_payment_methods()
            .with(eq(9))
            .times(2)
            .returning(|_| Ok(vec![method(1, "Visa", false), method(2, "Mastercard", true)]));

        let first = activate_method(&api, 9, 2).await.unwrap();
        let second = activate_method(&api, 9, 2).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.iter().filter(|m| m.is_active).map(|m| m.id).collect::<Vec<_>>(),
            vec![2]
        );
    }
}

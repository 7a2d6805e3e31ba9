use serde::Deserialize;

// types for the API response
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: i64,
    pub method: String,
    pub is_active: bool,
    // the set-active response shape omits this field
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PaymentMethod {
    pub fn status(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// What a delete request should do, decided against the loaded set
/// before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePlan {
    /// The target isn't active, delete it directly.
    Delete,
    /// The target is active; make `fallback` active first, then delete.
    ReassignThenDelete { fallback: i64 },
    /// The target is the only method. Deleting it would leave the parent
    /// with no active method, so nothing may be sent.
    Refuse,
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The GraphQL-over-HTTP request envelope.
#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

/// Cache key for query results: the operation's root field plus its
/// serialized variables, so the same query against different parents
/// caches independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub operation: String,
    pub variables: String,
}

impl QueryKey {
    pub fn new(operation: &str, variables: &Value) -> Self {
        Self {
            operation: operation.to_string(),
            variables: variables.to_string(),
        }
    }
}

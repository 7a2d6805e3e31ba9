pub mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::HeaderMap;
use reqwest::Client as AsyncClient;
use serde_json::Value;

use self::types::{GraphQLRequest, GraphQLResponse, QueryKey};
use crate::config::{DEFAULT_API_URL, VERSION};

/// Response cache shared by every command for the lifetime of the
/// process. Queries read through it; mutations only ever invalidate.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Value>>,
}

impl QueryCache {
    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn put(&self, key: QueryKey, data: Value) {
        self.lock().insert(key, data);
    }

    /// Drops every cached result of the named operation, regardless of
    /// the variables it was fetched with.
    pub fn invalidate(&self, operation: &str) {
        self.lock().retain(|key, _| key.operation != operation);
    }

    // a poisoned cache only ever holds plain data, keep serving it
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Value>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct GraphQLClient {
    pub client: AsyncClient,
    pub endpoint: String,
    pub ua: String,
    cache: Arc<QueryCache>,
}

impl GraphQLClient {
    pub fn new(api_url: Option<String>) -> Self {
        let mut headers = HeaderMap::new();

        headers.insert("accept", "application/json".parse().unwrap());

        let ua = format!(
            "paym_cli/{VERSION} on {}",
            sys_info::os_type().unwrap_or_else(|_| "unknown".to_string())
        );

        let endpoint = match api_url {
            Some(url) => url,
            None => DEFAULT_API_URL.to_string(),
        };

        Self {
            client: AsyncClient::builder()
                .user_agent(ua.clone())
                .default_headers(headers)
                .build()
                .unwrap(),
            endpoint,
            ua,
            cache: Arc::new(QueryCache::default()),
        }
    }

    /// Executes a query, serving it from the cache when an identical
    /// one already ran and no mutation has invalidated it since.
    pub async fn query<T>(&self, document: &str, operation: &str, variables: Value) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let key = QueryKey::new(operation, &variables);

        if let Some(data) = self.cache.get(&key) {
            log::debug!("cache hit: {operation} {variables}");

            return serde_json::from_value(data).context("Failed to deserialize cached response");
        }

        let data = self.execute(document, operation, variables).await?;

        self.cache.put(key, data.clone());

        serde_json::from_value(data).context("Failed to deserialize response")
    }

    /// Executes a mutation and invalidates the cached queries it makes
    /// stale, so the follow-up refetch goes back to the network.
    pub async fn mutate<T>(
        &self,
        document: &str,
        operation: &str,
        variables: Value,
        invalidates: &[&str],
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let data = self.execute(document, operation, variables).await?;

        for operation in invalidates {
            self.cache.invalidate(operation);
        }

        serde_json::from_value(data).context("Failed to deserialize response")
    }

    async fn execute(&self, document: &str, operation: &str, variables: Value) -> Result<Value> {
        log::debug!("graphql request: {operation} {variables}");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQLRequest {
                query: document,
                variables,
            })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            bail!("Error: HTTP {status}");
        }

        let payload = response.json::<GraphQLResponse>().await?;

        if let Some(errors) = payload.errors {
            if let Some(error) = errors.first() {
                bail!("{}", error.message);
            }
        }

        payload
            .data
            .and_then(|mut data| data.get_mut(operation).map(Value::take))
            .ok_or_else(|| anyhow!("Error while parsing response"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_round_trip() {
        let cache = QueryCache::default();
        let key = QueryKey::new("paymentMethods", &json!({ "parentId": 1 }));

        assert_eq!(cache.get(&key), None);

        cache.put(key.clone(), json!([{ "id": 1 }]));

        assert_eq!(cache.get(&key), Some(json!([{ "id": 1 }])));
    }

    #[test]
    fn test_cache_keyed_by_variables() {
        let cache = QueryCache::default();

        cache.put(
            QueryKey::new("paymentMethods", &json!({ "parentId": 1 })),
            json!([]),
        );

        let other = QueryKey::new("paymentMethods", &json!({ "parentId": 2 }));

        assert_eq!(cache.get(&other), None);
    }

    #[test]
    fn test_cache_survives_a_poisoned_lock() {
        let cache = Arc::new(QueryCache::default());
        let key = QueryKey::new("paymentMethods", &json!({ "parentId": 1 }));

        cache.put(key.clone(), json!([]));

        let poisoner = cache.clone();
        std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join()
        .unwrap_err();

        assert_eq!(cache.get(&key), Some(json!([])));

        cache.invalidate("paymentMethods");

        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn test_invalidate_clears_all_variables() {
        let cache = QueryCache::default();

        cache.put(
            QueryKey::new("paymentMethods", &json!({ "parentId": 1 })),
            json!([]),
        );
        cache.put(
            QueryKey::new("paymentMethods", &json!({ "parentId": 2 })),
            json!([]),
        );
        cache.put(QueryKey::new("other", &json!({})), json!(true));

        cache.invalidate("paymentMethods");

        assert_eq!(
            cache.get(&QueryKey::new("paymentMethods", &json!({ "parentId": 1 }))),
            None
        );
        assert_eq!(
            cache.get(&QueryKey::new("paymentMethods", &json!({ "parentId": 2 }))),
            None
        );
        assert_eq!(
            cache.get(&QueryKey::new("other", &json!({}))),
            Some(json!(true))
        );
    }
}

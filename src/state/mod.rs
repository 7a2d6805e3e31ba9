pub mod graphql;

use anyhow::Result;

use self::graphql::GraphQLClient;
use crate::store::context::Context;
use crate::store::Store;

#[derive(Debug)]
pub struct State {
    pub ctx: Context,
    pub http: GraphQLClient,
}

pub struct StateOptions {
    pub override_parent: Option<i64>,
    pub override_api_url: Option<String>,
}

impl State {
    pub async fn new(options: StateOptions) -> Result<Self> {
        let mut ctx = Context::new().await?;

        // override the parent account if provided
        ctx.parent_override = options.override_parent;

        // prefer the env/flag endpoint over the stored one
        let http = GraphQLClient::new(
            options
                .override_api_url
                .or_else(|| ctx.override_api_url.clone()),
        );

        Ok(State { ctx, http })
    }
}

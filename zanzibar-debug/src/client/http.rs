//! HTTP client for an OpenFGA-compatible `expand` endpoint
//!
//! Issues `POST {base_url}/stores/{store_id}/expand` with a
//! `{"tuple_key": {"object", "relation"}}` body and decodes the returned
//! rewrite tree. A `null` body is a valid "nothing to expand" answer.

use crate::{
    client::ExpandClient,
    config::ClientConfig,
    error::{DebugError, Result},
    models::*,
};
use async_trait::async_trait;
use tracing::debug;

/// reqwest-backed expansion client
pub struct HttpExpandClient {
    client: reqwest::Client,
    config: ClientConfig,
    expand_url: String,
}

impl HttpExpandClient {
    /// Create a client for the configured store
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let expand_url = config.expand_url();

        Ok(Self {
            client,
            config,
            expand_url,
        })
    }

    pub fn expand_url(&self) -> &str {
        &self.expand_url
    }
}

#[async_trait]
impl ExpandClient for HttpExpandClient {
    async fn expand(&self, object: &str, relation: &str) -> Result<Option<RewriteTree>> {
        debug!(object, relation, url = %self.expand_url, "POST expand");

        let request = ExpandRequest {
            tuple_key: TupleKey::new(object, relation),
        };

        let mut req = self.client.post(&self.expand_url).json(&request);
        if let Some(token) = &self.config.api_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DebugError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: Option<ExpandResponse> = serde_json::from_slice(&bytes)?;

        Ok(parsed.map(|response| response.tree.root))
    }
}

//! Vector retrievers: hybrid dense+sparse search against the FAQ, services,
//! and products collections. The distilled spec treats the vector store as
//! an opaque "retriever" (§1 out-of-scope); this module is the thin client
//! boundary the core calls through, grounded in `retriever_common.py`'s
//! lazy Qdrant/OpenAI singletons and per-collection settings.

use crate::settings::Settings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetrieverClient {
    client: Client,
    qdrant_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedItem {
    pub id: serde_json::Value,
    pub score: f64,
    pub payload: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("vector store request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("vector store returned an unexpected shape")]
    BadResponse,
}

impl RetrieverClient {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            qdrant_url: settings.qdrant_url.clone(),
            api_key: settings.qdrant_api_key.clone(),
            timeout: Duration::from_secs_f64(settings.qdrant_timeout),
        }
    }

    /// Dense-vector search against `collection`, restricted to `channel_id`
    /// via a payload filter. Sparse (BM25) fusion is left to the Qdrant
    /// collection's configured hybrid query — this client only shapes the
    /// request, it does not re-implement ranking.
    pub async fn search(
        &self,
        collection: &str,
        channel_id: i64,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedItem>, RetrieverError> {
        let url = format!("{}/collections/{collection}/points/search", self.qdrant_url.trim_end_matches('/'));
        let body = json!({
            "vector": query_vector,
            "limit": limit,
            "filter": {"must": [{"key": "channel_id", "match": {"value": channel_id}}]},
            "with_payload": true,
        });

        let mut request = self.client.post(&url).json(&body).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request.send().await?.error_for_status()?;
        let value: serde_json::Value = response.json().await?;
        let result = value.get("result").and_then(|v| v.as_array()).ok_or(RetrieverError::BadResponse)?;

        Ok(result
            .iter()
            .filter_map(|item| {
                Some(RetrievedItem {
                    id: item.get("id")?.clone(),
                    score: item.get("score")?.as_f64()?,
                    payload: item.get("payload").cloned().unwrap_or(serde_json::Value::Null),
                })
            })
            .collect())
    }

    pub fn faq_collection<'a>(&self, settings: &'a Settings) -> &'a str {
        &settings.qdrant_collection_faq
    }

    pub fn services_collection<'a>(&self, settings: &'a Settings) -> &'a str {
        &settings.qdrant_collection_services
    }

    pub fn products_collection<'a>(&self, settings: &'a Settings) -> &'a str {
        &settings.qdrant_collection_products
    }
}

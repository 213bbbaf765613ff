//! Post-booking recommendation lookup. Grounded in `recommendations.py`:
//! a single hybrid search against the services collection, trimmed to a
//! fixed field allowlist, with a safe empty-list fallback on any failure
//! (the original wraps the whole body in `try/except` returning `[]`).

use super::{Tool, ToolResult};
use crate::retrievers::RetrieverClient;
use crate::settings::Settings;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const ALLOWED_KEYS: &[&str] = &["services_name", "description", "pre_session_instructions"];

pub struct RecommendationsTool {
    pub retriever: Arc<RetrieverClient>,
    pub settings: Arc<Settings>,
    pub channel_id: i64,
}

#[async_trait]
impl Tool for RecommendationsTool {
    fn name(&self) -> &str {
        "recommendations"
    }

    fn description(&self) -> &str {
        "Получение рекомендаций к посещению по выбранной услуге."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["session_id", "query_vector"],
            "properties": {
                "session_id": {"type": "string"},
                "query_vector": {"type": "array", "items": {"type": "number"}}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(vector) = args.get("query_vector").and_then(|v| v.as_array()) else {
            return ToolResult::failed("query_vector обязателен");
        };
        let query_vector: Vec<f32> = vector.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect();
        let collection = self.retriever.services_collection(&self.settings).to_string();

        // Matches the original's blanket try/except: any failure yields an
        // empty list rather than propagating an error to the agent.
        let items = match self.retriever.search(&collection, self.channel_id, &query_vector, 1).await {
            Ok(items) => items,
            Err(_) => return ToolResult::ok(Value::Array(Vec::new())),
        };

        let filtered: Vec<Value> = items
            .into_iter()
            .map(|item| {
                let mut trimmed = Map::new();
                if let Some(payload) = item.payload.as_object() {
                    for key in ALLOWED_KEYS {
                        if let Some(v) = payload.get(*key) {
                            trimmed.insert(key.to_string(), v.clone());
                        }
                    }
                }
                Value::Object(trimmed)
            })
            .collect();

        ToolResult::ok(Value::Array(filtered))
    }
}

//! Knowledge-base search tools: wrap [`crate::retrievers`] against the FAQ
//! and services collections. The query-embedding step is out of scope
//! (distilled spec's §1 Non-goals exclude the vector store internals);
//! these tools accept a pre-embedded query vector, matching the boundary
//! `retriever_common.py` draws between the MCP tool layer and the
//! embedding service.

use super::{Tool, ToolResult};
use crate::retrievers::RetrieverClient;
use crate::settings::Settings;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct FaqSearchTool {
    pub retriever: Arc<RetrieverClient>,
    pub settings: Arc<Settings>,
    pub channel_id: i64,
}

#[async_trait]
impl Tool for FaqSearchTool {
    fn name(&self) -> &str {
        "search_faq"
    }

    fn description(&self) -> &str {
        "Поиск ответа на вопрос клиента по базе часто задаваемых вопросов."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query_vector"],
            "properties": {
                "query_vector": {"type": "array", "items": {"type": "number"}},
                "limit": {"type": "integer", "default": 5}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(vector) = args.get("query_vector").and_then(|v| v.as_array()) else {
            return ToolResult::failed("query_vector обязателен");
        };
        let query_vector: Vec<f32> = vector.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect();
        let limit = args.get("limit").and_then(|v| v.as_u64()).unwrap_or(5) as usize;

        let collection = self.retriever.faq_collection(&self.settings).to_string();
        match self.retriever.search(&collection, self.channel_id, &query_vector, limit).await {
            Ok(items) => ToolResult::ok(serde_json::to_value(items).unwrap_or(Value::Null)),
            Err(e) => ToolResult::failed(e.to_string()),
        }
    }
}

/// Full-detail service lookup (description, indications, contraindications,
/// preparation) against the same collection [`RecommendationsTool`] queries,
/// but returning the whole payload rather than a fixed field subset.
/// Grounded in `services.py`.
pub struct ServicesSearchTool {
    pub retriever: Arc<RetrieverClient>,
    pub settings: Arc<Settings>,
    pub channel_id: i64,
}

#[async_trait]
impl Tool for ServicesSearchTool {
    fn name(&self) -> &str {
        "services"
    }

    fn description(&self) -> &str {
        "Получение подробной информации об услуге: описание, показания, противопоказания, подготовка."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query_vector"],
            "properties": {
                "query_vector": {"type": "array", "items": {"type": "number"}},
                "limit": {"type": "integer", "default": 5}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(vector) = args.get("query_vector").and_then(|v| v.as_array()) else {
            return ToolResult::failed("query_vector обязателен");
        };
        let query_vector: Vec<f32> = vector.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect();
        let limit = args.get("limit").and_then(|v| v.as_u64()).unwrap_or(5) as usize;

        let collection = self.retriever.services_collection(&self.settings).to_string();
        match self.retriever.search(&collection, self.channel_id, &query_vector, limit).await {
            Ok(items) => ToolResult::ok(serde_json::to_value(items).unwrap_or(Value::Null)),
            Err(e) => ToolResult::failed(e.to_string()),
        }
    }
}

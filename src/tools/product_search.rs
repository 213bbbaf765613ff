//! Filtered product search with tool-choice recording. Grounded in
//! `class_product_search_full.py::MCPServiceFull`: the tool's own
//! description enumerates the tenant's allowed indication/contraindication/
//! body-part values, read from Postgres once at builder-construction time
//! (`select_key`, here [`crate::pg_pool::PgPool::catalogue_keys`]) so the
//! description differs per tenant; every call also records the session's
//! query and result list via `insert_dialog_state` (C18), matching the
//! original's `product_search` handler.

use super::{Tool, ToolResult};
use crate::pg_pool::{CatalogueKeys, PgPool};
use crate::retrievers::RetrieverClient;
use crate::settings::Settings;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ProductSearchTool {
    pub retriever: Arc<RetrieverClient>,
    pub settings: Arc<Settings>,
    pub pg: Arc<PgPool>,
    pub channel_id: i64,
    description: String,
}

impl ProductSearchTool {
    /// `keys` must be fetched before construction (`catalogue_keys` is
    /// async; tenant builders themselves are plain functions), so the
    /// supervisor resolves them once per tenant and passes them in here.
    pub fn new(retriever: Arc<RetrieverClient>, settings: Arc<Settings>, pg: Arc<PgPool>, channel_id: i64, keys: &CatalogueKeys) -> Self {
        let description = format!(
            "Поиск услуг по запросу и опциональным показаниям, противопоказаниям и зонам тела.\n\n\
             Args:\n\
             - session_id (str): id диалоговой сессии. Обязательный параметр.\n\
             - query_vector (array[number]): эмбеддинг поискового запроса. Обязательный параметр.\n\
             - indications (list[str], optional): допустимые значения: {:?}\n\
             - contraindications (list[str], optional): допустимые значения: {:?}\n\
             - body_parts (list[str], optional): допустимые значения: {:?}",
            keys.indications_key, keys.contraindications_key, keys.body_parts,
        );
        Self { retriever, settings, pg, channel_id, description }
    }
}

#[async_trait]
impl Tool for ProductSearchTool {
    fn name(&self) -> &str {
        "product_search"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["session_id", "query_vector"],
            "properties": {
                "session_id": {"type": "string"},
                "query_vector": {"type": "array", "items": {"type": "number"}},
                "indications": {"type": "array", "items": {"type": "string"}},
                "contraindications": {"type": "array", "items": {"type": "string"}},
                "body_parts": {"type": "array", "items": {"type": "string"}},
                "limit": {"type": "integer", "default": 10}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(session_id) = args.get("session_id").and_then(|v| v.as_str()) else {
            return ToolResult::failed("session_id обязателен");
        };
        let Some(vector) = args.get("query_vector").and_then(|v| v.as_array()) else {
            return ToolResult::failed("query_vector обязателен");
        };
        let query_vector: Vec<f32> = vector.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect();
        let limit = args.get("limit").and_then(|v| v.as_u64()).unwrap_or(10) as usize;

        let collection = self.retriever.products_collection(&self.settings).to_string();
        let items = match self.retriever.search(&collection, self.channel_id, &query_vector, limit).await {
            Ok(items) => items,
            Err(e) => return ToolResult::failed(e.to_string()),
        };
        let product_list = serde_json::to_value(&items).unwrap_or(Value::Null);

        let dialog_state = json!({
            "query_search": {
                "indications": args.get("indications"),
                "contraindications": args.get("contraindications"),
                "body_parts": args.get("body_parts"),
            },
            "product_list": product_list.clone(),
            "name": "selecting",
        });
        if let Err(e) = self.pg.insert_dialog_state(session_id, &dialog_state).await {
            tracing::warn!(session_id, error = %e, "failed to record product_search tool choice");
        }

        ToolResult::ok(product_list)
    }
}

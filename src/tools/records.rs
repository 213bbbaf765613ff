//! Client appointment listing tool. Wraps `crm::client_records`.

use super::{Tool, ToolResult};
use crate::crm::{client_records::get_client_records, CrmGateway};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ClientRecordsTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for ClientRecordsTool {
    fn name(&self) -> &str {
        "get_client_records"
    }

    fn description(&self) -> &str {
        "Получение списка ожидающих записей клиента."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id", "channel_id"],
            "properties": {
                "user_id": {"type": "string"},
                "channel_id": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let user_id = args.get("user_id").and_then(|v| v.as_str()).unwrap_or_default();
        let channel_id = args.get("channel_id").and_then(|v| v.as_str()).unwrap_or_default();
        match get_client_records(&self.gateway, user_id, channel_id).await {
            Ok(records) => ToolResult::ok(serde_json::to_value(records).unwrap_or(Value::Null)),
            Err(payload) => ToolResult::failed(payload.error),
        }
    }
}

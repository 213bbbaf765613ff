//! Branch staff listing tool. Wraps `crm::masters`.

use super::{Tool, ToolResult};
use crate::crm::{masters::get_masters, CrmGateway};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct MastersTool {
    pub gateway: Arc<CrmGateway>,
    pub channel_id: i64,
}

#[async_trait]
impl Tool for MastersTool {
    fn name(&self) -> &str {
        "get_masters"
    }

    fn description(&self) -> &str {
        "Получение списка действующих мастеров филиала."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> ToolResult {
        match get_masters(&self.gateway, self.channel_id).await {
            Ok(masters) => ToolResult::ok(serde_json::to_value(masters).unwrap_or(Value::Null)),
            Err(payload) => ToolResult::failed(payload.error),
        }
    }
}

//! Human-operator escalation tool. Wraps `crm::administrator`.

use super::{Tool, ToolResult};
use crate::crm::{administrator::httpservice_call_administrator, CrmGateway};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct EscalationTool {
    pub gateway: Arc<CrmGateway>,
    pub channel_id: String,
}

#[async_trait]
impl Tool for EscalationTool {
    fn name(&self) -> &str {
        "call_administrator"
    }

    fn description(&self) -> &str {
        "Передача диалога администратору-человеку с кратким резюме ситуации."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["session_id", "summary"],
            "properties": {
                "session_id": {"type": "string"},
                "summary": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let session_id = args.get("session_id").and_then(|v| v.as_str()).unwrap_or_default();
        let summary = args.get("summary").and_then(|v| v.as_str()).unwrap_or_default();
        match httpservice_call_administrator(&self.gateway, session_id, &self.channel_id, summary).await {
            Ok(message) => ToolResult::ok(Value::String(message)),
            Err(payload) => ToolResult::failed(payload.error),
        }
    }
}

//! `avaliable_time_for_master` tool: thin wrapper over the branch fan-out
//! availability engine (C11). Grounded in
//! `class_avaliable_time_for_master.py::MCPAvailableTimeForMaster`.

use super::{Tool, ToolResult};
use crate::availability::{find_available_time, TenantBranches};
use crate::crm::CrmGateway;
use crate::pg_pool::PgPool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct AvailabilityTool {
    pub gateway: Arc<CrmGateway>,
    pub pg: Arc<PgPool>,
    pub tenant: TenantBranches,
}

#[async_trait]
impl Tool for AvailabilityTool {
    fn name(&self) -> &str {
        "avaliable_time_for_master"
    }

    fn description(&self) -> &str {
        "Получение списка доступного времени для записи на выбранную услугу в указанный день."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["office_id", "date", "product_id"],
            "properties": {
                "office_id": {"type": "string"},
                "date": {"type": "string", "description": "YYYY-MM-DD"},
                "product_id": {"type": "string", "description": "e.g. '1-232324'"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let office_id = args.get("office_id").and_then(|v| v.as_str()).unwrap_or_default();
        let date = args.get("date").and_then(|v| v.as_str()).unwrap_or_default();
        let product_id = args.get("product_id").and_then(|v| v.as_str()).unwrap_or_default();

        match find_available_time(&self.gateway, &self.pg, &self.tenant, office_id, date, product_id).await {
            Ok(branches) => ToolResult::ok(serde_json::to_value(branches).unwrap_or(Value::Null)),
            Err(payload) => ToolResult::failed(payload.error),
        }
    }
}

//! Secondary-backend tool family: client lessons, profile updates, lesson
//! rescheduling, and usage statistics against the parallel `go_*` CRM,
//! grounded in `get_client_lessons.py`/`update_client_info.py`/
//! `update_client_lesson.py`/the `crm_get_client_statistics.py` naming
//! pattern. Only enabled for tenants whose registry entry wires it in.

use super::{Tool, ToolResult};
use crate::crm::secondary::{go_get_client_lessons, go_get_client_statistics, go_update_client_info, go_update_client_lesson};
use crate::crm::CrmGateway;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

fn from_payload(result: crate::result::Payload<Value>) -> ToolResult {
    match result {
        Ok(value) => ToolResult::ok(value),
        Err(payload) => ToolResult::failed(payload.error),
    }
}

pub struct SecondaryLessonsTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for SecondaryLessonsTool {
    fn name(&self) -> &str {
        "get_client_lessons"
    }

    fn description(&self) -> &str {
        "Получение расписания уроков клиента для последующего переноса."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id"],
            "properties": {"user_id": {"type": "string"}}
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let user_id = args.get("user_id").and_then(|v| v.as_str()).unwrap_or_default();
        from_payload(go_get_client_lessons(&self.gateway, user_id).await)
    }
}

pub struct SecondaryUpdateInfoTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for SecondaryUpdateInfoTool {
    fn name(&self) -> &str {
        "update_client_info"
    }

    fn description(&self) -> &str {
        "Сохранение анкетных данных клиента при первом обращении."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id", "info"],
            "properties": {
                "user_id": {"type": "string"},
                "info": {"type": "object"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let user_id = args.get("user_id").and_then(|v| v.as_str()).unwrap_or_default();
        let info = args.get("info").cloned().unwrap_or(Value::Null);
        from_payload(go_update_client_info(&self.gateway, user_id, &info).await)
    }
}

pub struct SecondaryUpdateLessonTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for SecondaryUpdateLessonTool {
    fn name(&self) -> &str {
        "update_client_lesson"
    }

    fn description(&self) -> &str {
        "Перенос урока на другую дату и время."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id", "lesson_id", "update"],
            "properties": {
                "user_id": {"type": "string"},
                "lesson_id": {"type": "string"},
                "update": {"type": "object"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let user_id = args.get("user_id").and_then(|v| v.as_str()).unwrap_or_default();
        let lesson_id = args.get("lesson_id").and_then(|v| v.as_str()).unwrap_or_default();
        let update = args.get("update").cloned().unwrap_or(Value::Null);
        from_payload(go_update_client_lesson(&self.gateway, user_id, lesson_id, &update).await)
    }
}

pub struct SecondaryStatisticsTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for SecondaryStatisticsTool {
    fn name(&self) -> &str {
        "get_client_statistics"
    }

    fn description(&self) -> &str {
        "Получение статистики посещений клиента."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id"],
            "properties": {"user_id": {"type": "string"}}
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let user_id = args.get("user_id").and_then(|v| v.as_str()).unwrap_or_default();
        from_payload(go_get_client_statistics(&self.gateway, user_id).await)
    }
}

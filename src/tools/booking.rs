//! Booking lifecycle tools: create, reschedule, cancel. Three distinct wire
//! tools sharing one file since they all wrap `crm::record_time`/
//! `crm::reschedule`/`crm::delete_record` with near-identical argument
//! extraction.

use super::{Tool, ToolResult};
use crate::crm::{delete_record::delete_client_record, record_time::record_time_async, reschedule::reschedule_client_record, CrmGateway};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

fn arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

fn from_payload<T: serde::Serialize>(result: crate::result::Payload<T>) -> ToolResult {
    match result {
        Ok(value) => ToolResult::ok(serde_json::to_value(value).unwrap_or(Value::Null)),
        Err(payload) => ToolResult::failed(payload.error),
    }
}

pub struct RecordTimeTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for RecordTimeTool {
    fn name(&self) -> &str {
        "record_time"
    }

    fn description(&self) -> &str {
        "Создание записи клиента к мастеру на выбранное время."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["product_id", "date", "time", "user_id", "staff_id", "channel_id"],
            "properties": {
                "product_id": {"type": "string"},
                "date": {"type": "string"},
                "time": {"type": "string"},
                "user_id": {"type": "string"},
                "staff_id": {"type": "string"},
                "channel_id": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let result = record_time_async(
            &self.gateway,
            arg(&args, "product_id"),
            arg(&args, "date"),
            arg(&args, "time"),
            arg(&args, "user_id"),
            arg(&args, "staff_id"),
            arg(&args, "channel_id"),
        )
        .await;
        from_payload(result)
    }
}

pub struct RescheduleTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for RescheduleTool {
    fn name(&self) -> &str {
        "reschedule_record"
    }

    fn description(&self) -> &str {
        "Перенос существующей записи клиента на новое время."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id", "office_id", "record_id", "new_date_time"],
            "properties": {
                "user_id": {"type": "string"},
                "office_id": {"type": "string"},
                "record_id": {"type": "string"},
                "new_date_time": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let result = reschedule_client_record(
            &self.gateway,
            arg(&args, "user_id"),
            arg(&args, "office_id"),
            arg(&args, "record_id"),
            arg(&args, "new_date_time"),
        )
        .await;
        from_payload(result)
    }
}

pub struct CancelRecordTool {
    pub gateway: Arc<CrmGateway>,
}

#[async_trait]
impl Tool for CancelRecordTool {
    fn name(&self) -> &str {
        "cancel_record"
    }

    fn description(&self) -> &str {
        "Отмена существующей записи клиента."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["user_id", "office_id", "record_id"],
            "properties": {
                "user_id": {"type": "string"},
                "office_id": {"type": "string"},
                "record_id": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let result = delete_client_record(&self.gateway, arg(&args, "user_id"), arg(&args, "office_id"), arg(&args, "record_id")).await;
        from_payload(result)
    }
}

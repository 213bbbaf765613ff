//! Session-state confirmation tools: the client's choice of branch, master,
//! service, date, or time gets echoed back as a confirmation record so the
//! calling agent can carry it forward in the conversation. Grounded in
//! `remember_office.py`/`remember_master.py`/`remember_product_id.py`/
//! `remember_desired_date.py`/`remember_desired_time.py` — none of these
//! touch the CRM or Postgres in the original, they only validate shape and
//! echo the confirmed value back.

use super::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct RememberOfficeTool;

#[async_trait]
impl Tool for RememberOfficeTool {
    fn name(&self) -> &str {
        "remember_office"
    }

    fn description(&self) -> &str {
        "Сохраняет выбранный клиентом филиал для записи."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["office_id", "office_address"],
            "properties": {
                "office_id": {"type": "string"},
                "office_address": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(office_id) = args.get("office_id").and_then(|v| v.as_str()) else {
            return ToolResult::failed("office_id обязателен");
        };
        let Some(office_address) = args.get("office_address").and_then(|v| v.as_str()) else {
            return ToolResult::failed("office_address обязателен");
        };
        ToolResult::ok(json!({"success": true, "office_id": office_id, "office_address": office_address}))
    }
}

pub struct RememberMasterTool;

#[async_trait]
impl Tool for RememberMasterTool {
    fn name(&self) -> &str {
        "remember_master"
    }

    fn description(&self) -> &str {
        "Сохраняет выбранного клиентом мастера для записи."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["master_id", "master_name"],
            "properties": {
                "master_id": {"type": "string"},
                "master_name": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(master_id) = args.get("master_id").and_then(|v| v.as_str()) else {
            return ToolResult::failed("master_id обязателен");
        };
        let Some(master_name) = args.get("master_name").and_then(|v| v.as_str()) else {
            return ToolResult::failed("master_name обязателен");
        };
        ToolResult::ok(json!({"success": true, "master_id": master_id, "master_name": master_name}))
    }
}

/// The original cross-checks `product_name` against a Postgres lookup
/// (`get_product_name_for_id`) before confirming. No schema for that lookup
/// was ever located in the retrieved source (only the call site), so this
/// confirms shape only, same as its `remember_*` siblings — flagged in
/// DESIGN.md rather than invented.
pub struct RememberProductIdTool;

#[async_trait]
impl Tool for RememberProductIdTool {
    fn name(&self) -> &str {
        "remember_product_id"
    }

    fn description(&self) -> &str {
        "Подтверждение/выбор клиентом нужной услуги."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["session_id", "product_id", "product_name"],
            "properties": {
                "session_id": {"type": "string"},
                "product_id": {"type": "string"},
                "product_name": {"type": "string"}
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(product_id) = args.get("product_id").and_then(|v| v.as_str()) else {
            return ToolResult::failed("product_id обязателен");
        };
        let Some(product_name) = args.get("product_name").and_then(|v| v.as_str()) else {
            return ToolResult::failed("product_name обязателен");
        };
        ToolResult::ok(json!({
            "success": true,
            "products": [{"product_id": product_id, "product_name": product_name}]
        }))
    }
}

pub struct RememberDesiredDateTool;

#[async_trait]
impl Tool for RememberDesiredDateTool {
    fn name(&self) -> &str {
        "remember_desired_date"
    }

    fn description(&self) -> &str {
        "Сохраняет выбранную клиентом дату для записи."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["date_iso"],
            "properties": {"date_iso": {"type": "string"}}
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(date_iso) = args.get("date_iso").and_then(|v| v.as_str()) else {
            return ToolResult::failed("date_iso обязателен");
        };
        ToolResult::ok(json!({"success": true, "desired_date": date_iso}))
    }
}

pub struct RememberDesiredTimeTool;

#[async_trait]
impl Tool for RememberDesiredTimeTool {
    fn name(&self) -> &str {
        "remember_desired_time"
    }

    fn description(&self) -> &str {
        "Сохраняет выбранное клиентом время для записи."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["time_hhmm"],
            "properties": {"time_hhmm": {"type": "string"}}
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let Some(time_hhmm) = args.get("time_hhmm").and_then(|v| v.as_str()) else {
            return ToolResult::failed("time_hhmm обязателен");
        };
        ToolResult::ok(json!({"success": true, "desired_time": time_hhmm}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remember_office_echoes_input() {
        let result = RememberOfficeTool.execute(json!({"office_id": "1", "office_address": "Ленина 1"})).await;
        assert!(result.success);
        assert_eq!(result.output["office_id"], "1");
    }

    #[tokio::test]
    async fn remember_desired_date_requires_date_iso() {
        let result = RememberDesiredDateTool.execute(json!({})).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn remember_product_id_wraps_confirmation_in_products_list() {
        let result = RememberProductIdTool
            .execute(json!({"session_id": "1-1", "product_id": "2-113323232", "product_name": "LPG-массаж"}))
            .await;
        assert!(result.success);
        assert_eq!(result.output["products"][0]["product_id"], "2-113323232");
    }
}

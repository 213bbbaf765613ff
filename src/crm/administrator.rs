//! Human-operator escalation. Grounded in the distilled spec's
//! `httpservice_call_administrator` naming; hands a conversation summary to
//! a human-dispatch endpoint on the primary CRM backend.

use super::CrmGateway;
use crate::result::{err, ok, ErrorCode, Payload};
use serde_json::json;

const ADMINISTRATOR_PATH: &str = "/appointments/yclients/administrator/call";

pub async fn httpservice_call_administrator(
    gateway: &CrmGateway,
    session_id: &str,
    channel_id: &str,
    summary: &str,
) -> Payload<String> {
    if [session_id, channel_id].iter().any(|s| s.trim().is_empty()) {
        return err(ErrorCode::ValidationError, "Не задан session_id или channel_id");
    }

    let payload = json!({"session_id": session_id, "channel_id": channel_id, "summary": summary});
    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        ADMINISTRATOR_PATH,
        &payload,
        "httpservice_call_administrator",
    )
    .await
    {
        Ok(v) => v,
        Err(_) => return err(ErrorCode::CrmUnavailable, "CRM временно недоступен"),
    };

    if response.get("success").and_then(|v| v.as_bool()) == Some(true) {
        ok("Администратор уведомлён".to_string())
    } else {
        err(ErrorCode::CrmError, "Не удалось уведомить администратора")
    }
}

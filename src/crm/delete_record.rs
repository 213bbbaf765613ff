//! Record cancellation. Grounded in `crm_delete_client_record.py`:
//! `ok(message)` on CRM `success=true`, `err("not_found", …)` otherwise.

use super::CrmGateway;
use crate::result::{err, ok, ErrorCode, Payload};
use serde_json::json;

const DELETE_PATH: &str = "/appointments/yclients/record/delete";

pub async fn delete_client_record(
    gateway: &CrmGateway,
    user_id: &str,
    office_id: &str,
    record_id: &str,
) -> Payload<String> {
    if [user_id, office_id, record_id].iter().any(|s| s.trim().is_empty()) {
        return err(ErrorCode::ValidationError, "Не заданы обязательные параметры записи");
    }

    let payload = json!({"user_id": user_id, "office_id": office_id, "record_id": record_id});
    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        DELETE_PATH,
        &payload,
        "delete_client_record",
    )
    .await
    {
        Ok(v) => v,
        Err(_) => return err(ErrorCode::CrmUnavailable, "CRM временно недоступен"),
    };

    if response.get("success").and_then(|v| v.as_bool()) == Some(true) {
        ok("Запись успешно отменена".to_string())
    } else {
        err(ErrorCode::NotFound, "Запись не найдена или уже отменена")
    }
}

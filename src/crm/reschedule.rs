//! Reschedule an existing record. Grounded in
//! `crm_reschedule_client_record.py`'s status-to-code mapping, recorded as
//! Open Question (c) in DESIGN.md: 4xx (other than 429, already retried
//! away) maps to `validation_error`; a 200 with `success:false` maps to
//! `crm_error`; 5xx exhausts retry into `crm_unavailable`.

use super::http::CrmHttpError;
use super::CrmGateway;
use crate::result::{err, ok, ErrorCode, Payload};
use reqwest::StatusCode;
use serde_json::{json, Value};

const RESCHEDULE_PATH: &str = "/appointments/yclients/record/reschedule";

pub async fn reschedule_client_record(
    gateway: &CrmGateway,
    user_id: &str,
    office_id: &str,
    record_id: &str,
    new_date_time: &str,
) -> Payload<Value> {
    if [user_id, office_id, record_id, new_date_time]
        .iter()
        .any(|s| s.trim().is_empty())
    {
        return err(ErrorCode::ValidationError, "Не заданы обязательные параметры переноса записи");
    }

    let payload = json!({
        "user_id": user_id,
        "office_id": office_id,
        "record_id": record_id,
        "date_time": new_date_time,
    });

    let response = super::http::post_json(
        &gateway.client,
        &gateway.primary,
        RESCHEDULE_PATH,
        &payload,
        "reschedule_client_record",
    )
    .await;

    let response = match response {
        Ok(v) => v,
        Err(CrmHttpError::Status(status)) if status != StatusCode::TOO_MANY_REQUESTS && status.is_client_error() => {
            return err(ErrorCode::ValidationError, format!("HTTP ошибка: {status}"));
        }
        Err(CrmHttpError::Status(status)) => {
            return err(ErrorCode::CrmUnavailable, format!("CRM недоступен: HTTP {status}"));
        }
        Err(CrmHttpError::Network) => return err(ErrorCode::NetworkError, "Сетевая ошибка при переносе записи"),
        Err(CrmHttpError::Parse(_)) | Err(CrmHttpError::NotAnObject) => {
            return err(ErrorCode::InvalidResponse, "CRM вернул некорректный ответ")
        }
    };

    if response.get("success").and_then(|v| v.as_bool()) == Some(true) {
        ok(response)
    } else {
        err(ErrorCode::CrmError, "CRM отклонил перенос записи")
    }
}

//! Booking creation. Grounded in `crm_record_time.py`, including the
//! documented CRM-bug normalization: a response shaped exactly
//! `{success:false, error:"Неожиданный код статуса: 400"}` is treated as a
//! successful booking. Kept behind a named predicate so it stays auditable
//! and removable once upstream fixes the bug.

use super::CrmGateway;
use crate::result::{err, ok, ErrorCode, Payload};
use serde_json::{json, Value};

const RECORD_PATH: &str = "/appointments/yclients/record";
const BUG_ERROR_TEXT: &str = "Неожиданный код статуса: 400";

/// Named, auditable predicate for the documented booking-create bug.
fn is_booking_400_bug(response: &Value) -> bool {
    response.get("success").and_then(|v| v.as_bool()) == Some(false)
        && response.get("error").and_then(|v| v.as_str()) == Some(BUG_ERROR_TEXT)
}

#[allow(clippy::too_many_arguments)]
pub async fn record_time_async(
    gateway: &CrmGateway,
    product_id: &str,
    date: &str,
    time: &str,
    user_id: &str,
    staff_id: &str,
    channel_id: &str,
) -> Payload<Value> {
    if [product_id, date, time, user_id, staff_id, channel_id]
        .iter()
        .any(|s| s.trim().is_empty())
    {
        return err(ErrorCode::ValidationError, "Не заданы обязательные параметры записи");
    }

    let requested_datetime = format!("{date} {time}");
    let payload = json!({
        "product_id": product_id,
        "date_time": requested_datetime,
        "user_id": user_id,
        "staff_id": staff_id,
        "channel_id": channel_id,
    });

    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        RECORD_PATH,
        &payload,
        "record_time",
    )
    .await
    {
        Ok(v) => v,
        Err(_) => return err(ErrorCode::CrmUnavailable, "CRM временно недоступен"),
    };

    if is_booking_400_bug(&response) {
        return ok(json!({
            "success": true,
            "info": format!("Запись к master_id={staff_id} на время {requested_datetime} сделана"),
        }));
    }

    if response.get("success").and_then(|v| v.as_bool()) == Some(true) {
        ok(response)
    } else {
        err(ErrorCode::CrmError, "CRM отклонил запись")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_exact_bug_shape() {
        let bug = json!({"success": false, "error": "Неожиданный код статуса: 400"});
        assert!(is_booking_400_bug(&bug));
    }

    #[test]
    fn other_failures_are_not_the_bug() {
        let other = json!({"success": false, "error": "slot taken"});
        assert!(!is_booking_400_bug(&other));
        let wrong_status = json!({"success": false, "error": "Неожиданный код статуса: 500"});
        assert!(!is_booking_400_bug(&wrong_status));
    }
}

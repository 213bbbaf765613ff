//! Master/staff listing for a branch. Grounded in `crm_get_masters.py`.

use super::{CrmGateway, Master};
use crate::result::{err, ok, ErrorCode, Payload};
use serde_json::json;

const MASTERS_PATH: &str = "/appointments/yclients/staff/actual";

pub async fn get_masters(gateway: &CrmGateway, channel_id: i64) -> Payload<Vec<Master>> {
    let payload = json!({"channel_id": channel_id});
    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        MASTERS_PATH,
        &payload,
        "get_masters",
    )
    .await
    {
        Ok(v) => v,
        Err(super::http::CrmHttpError::Network) => {
            return err(ErrorCode::NetworkError, "Сетевая ошибка при получении списка мастеров")
        }
        Err(super::http::CrmHttpError::Status(status)) => {
            return err(ErrorCode::HttpError, format!("CRM вернул HTTP {status}"))
        }
        Err(_) => return err(ErrorCode::CrmBadResponse, "CRM вернул некорректный JSON"),
    };

    if response.get("success").and_then(|v| v.as_bool()) != Some(true) {
        return err(ErrorCode::CrmError, "CRM вернул ошибку при получении мастеров");
    }

    let Some(masters) = response.get("masters").and_then(|v| v.as_array()) else {
        return err(ErrorCode::CrmBadResponse, "CRM вернул некорректный список мастеров");
    };

    let masters = masters
        .iter()
        .map(|item| Master {
            id: item.get("id").and_then(|v| v.as_i64()),
            name: item.get("name").and_then(|v| v.as_str()).map(str::to_string),
        })
        .collect();

    ok(masters)
}

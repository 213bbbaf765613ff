//! Parallel family against the secondary CRM backend (a distinct base URL
//! and credential set from the primary appointment CRM). Same `Result[T]`
//! shape and retry envelope as the primary family; named per the `go_`
//! prefix the tool layer exposes them under.

use super::CrmGateway;
use crate::result::{err, ok, ErrorCode, Payload};
use serde_json::{json, Value};

async fn post_secondary(gateway: &CrmGateway, path: &str, payload: &Value, label: &str) -> Payload<Value> {
    match super::http::post_json(&gateway.client, &gateway.secondary, path, payload, label).await {
        Ok(v) if v.get("success").and_then(|s| s.as_bool()) == Some(true) => ok(v),
        Ok(_) => err(ErrorCode::CrmError, "Вторичный CRM вернул ошибку"),
        Err(super::http::CrmHttpError::Network) => err(ErrorCode::NetworkError, "Сетевая ошибка"),
        Err(_) => err(ErrorCode::CrmBadResponse, "Вторичный CRM вернул некорректный ответ"),
    }
}

pub async fn go_get_client_lessons(gateway: &CrmGateway, user_id: &str) -> Payload<Value> {
    if user_id.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не задан user_id");
    }
    post_secondary(gateway, "/go/client/lessons", &json!({"user_id": user_id}), "go_get_client_lessons").await
}

pub async fn go_update_client_info(gateway: &CrmGateway, user_id: &str, info: &Value) -> Payload<Value> {
    if user_id.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не задан user_id");
    }
    post_secondary(
        gateway,
        "/go/client/info",
        &json!({"user_id": user_id, "info": info}),
        "go_update_client_info",
    )
    .await
}

pub async fn go_update_client_lesson(gateway: &CrmGateway, user_id: &str, lesson_id: &str, update: &Value) -> Payload<Value> {
    if user_id.trim().is_empty() || lesson_id.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не заданы user_id или lesson_id");
    }
    post_secondary(
        gateway,
        "/go/client/lesson",
        &json!({"user_id": user_id, "lesson_id": lesson_id, "update": update}),
        "go_update_client_lesson",
    )
    .await
}

pub async fn go_get_client_statistics(gateway: &CrmGateway, user_id: &str) -> Payload<Value> {
    if user_id.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не задан user_id");
    }
    post_secondary(
        gateway,
        "/go/client/statistics",
        &json!({"user_id": user_id}),
        "go_get_client_statistics",
    )
    .await
}

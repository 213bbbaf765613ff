//! Single-service availability fetch for one branch. Grounded in
//! `crm_avaliable_time_for_master.py`: validates inputs, extracts
//! `result.service.staff[]`, parses/sorts/filters/truncates each master's
//! slots. This is the primitive [`crate::availability`] fans out over.

use super::{CrmGateway, MasterSlots};
use crate::result::{err, ok, ErrorCode, Payload};
use crate::timezone::{now_local, parse_slot};
use serde_json::json;

const PRODUCT_PATH: &str = "/appointments/yclients/product";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_COUNT_SLOTS: usize = 30;

pub async fn avaliable_time_for_master_async(
    gateway: &CrmGateway,
    date: &str,
    product_id: &str,
    server_name: &str,
    count_slots: Option<usize>,
) -> Payload<Vec<MasterSlots>> {
    if product_id.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не задан service_id");
    }
    if server_name.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не задан server_name (нужен для TZ)");
    }

    let parsed_date = match chrono::NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(d) => d,
        Err(_) => {
            return err(
                ErrorCode::ValidationError,
                format!("Неверный формат даты: {date}. Ожидается 'YYYY-MM-DD'"),
            )
        }
    };

    let today = now_local(server_name).date_naive();
    if parsed_date < today {
        return err(
            ErrorCode::ValidationError,
            format!("Нельзя записаться на прошедшее число. Сегодня {}", today.format(DATE_FORMAT)),
        );
    }

    let payload = json!({"service_id": product_id, "base_date": date});
    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        PRODUCT_PATH,
        &payload,
        "avaliable_time_for_master",
    )
    .await
    {
        Ok(value) => value,
        // Network/parse failures after retry exhaustion are treated as "no
        // availability found", matching the original's return of `[]`
        // rather than surfacing a CRM error for this specific operation.
        Err(_) => return ok(Vec::new()),
    };

    if response.get("success").and_then(|v| v.as_bool()) != Some(true) {
        return ok(Vec::new());
    }

    let staff = response
        .get("result")
        .and_then(|r| r.get("service"))
        .and_then(|s| s.get("staff"))
        .and_then(|v| v.as_array());

    let Some(staff) = staff else {
        return ok(Vec::new());
    };

    let limit = count_slots.unwrap_or(DEFAULT_COUNT_SLOTS);
    let now = now_local(server_name);

    let mut results = Vec::with_capacity(staff.len());
    for member in staff {
        let master_name = member.get("name").and_then(|v| v.as_str()).map(str::to_string);
        let master_id = member.get("id").and_then(|v| v.as_i64());

        let dates = member.get("dates").and_then(|v| v.as_array());
        let mut parsed_pairs: Vec<(chrono::DateTime<chrono_tz::Tz>, String)> = Vec::new();
        if let Some(dates) = dates {
            for slot in dates {
                let Some(slot) = slot.as_str() else { continue };
                if let Ok(parsed) = parse_slot(server_name, slot) {
                    if parsed > now {
                        parsed_pairs.push((parsed, slot.to_string()));
                    }
                }
            }
        }
        parsed_pairs.sort_by_key(|(dt, _)| *dt);
        let master_slots = parsed_pairs.into_iter().take(limit).map(|(_, s)| s).collect();

        results.push(MasterSlots {
            master_name,
            master_id,
            master_slots,
        });
    }

    ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::CrmGateway;
    use crate::settings::Settings;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_against(server: &MockServer) -> CrmGateway {
        std::env::set_var("POSTGRES_HOST", "localhost");
        std::env::set_var("POSTGRES_DB", "crm");
        std::env::set_var("POSTGRES_USER", "u");
        std::env::set_var("POSTGRES_PASSWORD", "p");
        std::env::set_var("CRM_BASE_URL", server.uri());
        let settings = Settings::from_env().unwrap();
        for k in ["POSTGRES_HOST", "POSTGRES_DB", "POSTGRES_USER", "POSTGRES_PASSWORD", "CRM_BASE_URL"] {
            std::env::remove_var(k);
        }
        CrmGateway::new(reqwest::Client::new(), &settings)
    }

    #[tokio::test]
    async fn invalid_product_id_is_validation_error_with_no_network_call() {
        let server = MockServer::start().await;
        let gateway = gateway_against(&server).await;
        let result = avaliable_time_for_master_async(&gateway, "2030-01-15", "", "sofia", None).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn past_date_is_rejected() {
        let server = MockServer::start().await;
        let gateway = gateway_against(&server).await;
        let result = avaliable_time_for_master_async(&gateway, "2000-01-01", "1-232324", "sofia", None).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn three_future_slots_are_sorted_and_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments/yclients/product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"service": {"staff": [
                    {"id": 4216657, "name": "Кузнецова", "dates": [
                        "2030-01-15 12:00", "2030-01-15 09:00", "2030-01-15 10:30"
                    ]}
                ]}}
            })))
            .mount(&server)
            .await;
        let gateway = gateway_against(&server).await;
        let result = avaliable_time_for_master_async(&gateway, "2030-01-15", "1-232324", "sofia", None)
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].master_slots,
            vec!["2030-01-15 09:00", "2030-01-15 10:30", "2030-01-15 12:00"]
        );
    }
}

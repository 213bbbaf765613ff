//! Client appointment listing. Grounded in `crm_get_client_records.py`:
//! filters to `status == "pending"`, sorts ascending by parsed date with
//! unparseable dates sorting last, and tolerates three date formats.

use super::{ClientRecord, CrmGateway};
use crate::result::{err, ok, ErrorCode, Payload};
use chrono::NaiveDateTime;
use serde_json::json;

const RECORDS_PATH: &str = "/appointments/yclients/records";
const PENDING_STATUS: &str = "Ожидает";
const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub async fn get_client_records(
    gateway: &CrmGateway,
    user_id: &str,
    channel_id: &str,
) -> Payload<Vec<ClientRecord>> {
    if user_id.trim().is_empty() || channel_id.trim().is_empty() {
        return err(ErrorCode::ValidationError, "Не задан user_id или channel_id");
    }

    let payload = json!({"user_id": user_id, "channel_id": channel_id});
    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        RECORDS_PATH,
        &payload,
        "get_client_records",
    )
    .await
    {
        Ok(v) => v,
        Err(_) => return err(ErrorCode::CrmUnavailable, "CRM временно недоступен"),
    };

    if response.get("success").and_then(|v| v.as_bool()) != Some(true) {
        return err(ErrorCode::CrmError, "CRM вернул ошибку при получении записей");
    }

    let Some(records) = response.get("records").and_then(|v| v.as_array()) else {
        return err(ErrorCode::CrmBadResponse, "CRM вернул некорректный список записей");
    };

    let mut pending: Vec<ClientRecord> = records
        .iter()
        .filter_map(|item| {
            let status = item.get("status")?.as_str()?.to_string();
            if !status.starts_with(PENDING_STATUS) {
                return None;
            }
            Some(ClientRecord {
                record_id: item.get("id").map(|v| v.to_string()).unwrap_or_default(),
                record_date: item.get("date").and_then(|v| v.as_str()).map(str::to_string),
                office_id: item.get("office_id").and_then(|v| v.as_str()).map(str::to_string),
                master_id: item
                    .get("master_id")
                    .and_then(|m| m.get("id"))
                    .map(|v| v.to_string()),
                master_name: item
                    .get("master_id")
                    .and_then(|m| m.get("name"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                product_id: item.get("product").and_then(|p| p.get("id")).map(|v| v.to_string()),
                product_name: item
                    .get("product")
                    .and_then(|p| p.get("name"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                status,
            })
        })
        .collect();

    pending.sort_by_key(|record| {
        record
            .record_date
            .as_deref()
            .and_then(parse_record_date)
            .unwrap_or(NaiveDateTime::MAX)
    });

    ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_dates_sort_last() {
        let mut records = vec![
            ClientRecord {
                record_id: "2".into(),
                record_date: Some("garbage".into()),
                office_id: None,
                master_id: None,
                master_name: None,
                product_id: None,
                product_name: None,
                status: "Ожидает".into(),
            },
            ClientRecord {
                record_id: "1".into(),
                record_date: Some("2030-02-01 10:00".into()),
                office_id: None,
                master_id: None,
                master_name: None,
                product_id: None,
                product_name: None,
                status: "Ожидает".into(),
            },
        ];
        records.sort_by_key(|r| r.record_date.as_deref().and_then(parse_record_date).unwrap_or(NaiveDateTime::MAX));
        assert_eq!(records[0].record_id, "1");
        assert_eq!(records[1].record_id, "2");
    }
}

//! Complex/sequence availability: CRM either returns a single service's
//! master staff list (handled identically to [`super::availability_single`])
//! or a set of multi-step "sequences". Grounded in
//! `crm_avaliable_time_for_master_list.py`, including its two fixed business
//! tables (service-name master filter, sequence-step master substitution).

use super::{CrmGateway, MasterSlots};
use crate::result::{err, ok, ErrorCode, Payload};
use crate::timezone::{now_local, parse_slot};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const PRODUCT_PATH: &str = "/appointments/yclients/product";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_COUNT_SLOTS: usize = 30;

/// Fixed service-name -> required-master-name filter
/// (`filter_sequences_list` in the original).
const SERVICE_NAME_MASTER_FILTER: &[(&str, &str)] = &[
    ("Прессотерапия", "Прессотерапия"),
    ("Роликовый массажер", "Ролик"),
    ("Термотерапия", "Термотерапия"),
    ("Электролиполиз", "Токовые Процедуры"),
    ("Электромиостимуляция", "Токовые Процедуры"),
];

/// Fixed `service_id -> (master_id, master_name)` substitution applied to
/// sequence steps before flattening (`update_services_in_sequences`).
/// Deliberately not tenant-scoped — the four ids are fixed in the original
/// with no tenant identity threaded anywhere near this table.
const SEQUENCE_MASTER_SUBSTITUTION: &[(&str, &str, &str)] = &[
    ("2950601", "881127", "Термотерапия"),
    ("2950597", "864147", "Прессотерапия"),
    ("2950609", "914499", "Ролик"),
    ("2950603", "914503", "Токовые Процедуры"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSelector {
    pub sequence_id: Option<Value>,
    pub start_time: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortService {
    pub product_id: String,
    pub master_id: Option<Value>,
    pub master_name: Option<Value>,
    pub date_time: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceShort {
    pub sequence_id: Option<Value>,
    pub start_time: Option<Value>,
    pub services: Vec<ShortService>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AvailabilityList {
    SingleService(Vec<MasterSlots>),
    Sequences(Vec<SequenceSelector>),
}

fn required_master_for(service_name: &str) -> Option<&'static str> {
    SERVICE_NAME_MASTER_FILTER
        .iter()
        .find(|(prefix, _)| service_name.starts_with(prefix))
        .map(|(_, master)| *master)
}

fn filter_sequences_list(service_name: &str, slots: Vec<MasterSlots>) -> Vec<MasterSlots> {
    match required_master_for(service_name) {
        Some(required) => slots
            .into_iter()
            .filter(|s| s.master_name.as_deref() == Some(required))
            .collect(),
        None => slots,
    }
}

fn substitute_sequence_masters(mut sequences: Value) -> Value {
    let Some(seqs) = sequences
        .get_mut("result")
        .and_then(|r| r.get_mut("avaliable_sequences"))
        .and_then(|v| v.as_array_mut())
    else {
        return sequences;
    };
    for seq in seqs.iter_mut() {
        let Some(steps) = seq.get_mut("steps").and_then(|s| s.as_array_mut()) else { continue };
        for step in steps.iter_mut() {
            let Some(service_id) = step.get("service_id").and_then(|v| v.as_str()).map(str::to_string) else {
                continue;
            };
            if let Some((_, master_id, master_name)) =
                SEQUENCE_MASTER_SUBSTITUTION.iter().find(|(sid, _, _)| *sid == service_id)
            {
                step["master_id"] = json!(master_id);
                step["master_name"] = json!(master_name);
            }
        }
    }
    sequences
}

fn flatten_short(sequences: &[Value]) -> Vec<SequenceShort> {
    sequences
        .iter()
        .filter_map(|seq| {
            let steps = seq.get("steps")?.as_array()?;
            Some(SequenceShort {
                sequence_id: seq.get("sequence_id").cloned(),
                start_time: seq.get("total_start_time").cloned(),
                services: steps
                    .iter()
                    .map(|step| ShortService {
                        product_id: format!(
                            "7-{}",
                            step.get("service_id").and_then(|v| v.as_str()).unwrap_or_default()
                        ),
                        master_id: step.get("master_id").cloned(),
                        master_name: step.get("master_name").cloned(),
                        date_time: step.get("start_time").cloned(),
                    })
                    .collect(),
            })
        })
        .collect()
}

pub async fn avaliable_time_for_master_list_async(
    gateway: &CrmGateway,
    date: &str,
    service_id: &str,
    service_name: &str,
    server_name: &str,
    count_slots: Option<usize>,
) -> Payload<(AvailabilityList, Vec<SequenceShort>)> {
    if service_id.trim().is_empty() {
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

    let payload = json!({"service_id": service_id, "base_date": date});
    let response = match super::http::post_json(
        &gateway.client,
        &gateway.primary,
        PRODUCT_PATH,
        &payload,
        "avaliable_time_for_master_list",
    )
    .await
    {
        Ok(value) => value,
        Err(_) => return ok((AvailabilityList::SingleService(Vec::new()), Vec::new())),
    };

    if response.get("success").and_then(|v| v.as_bool()) != Some(true) {
        return ok((AvailabilityList::SingleService(Vec::new()), Vec::new()));
    }

    let result = response.get("result").cloned().unwrap_or(Value::Null);

    if let Some(staff) = result.get("service").and_then(|s| s.get("staff")).and_then(|v| v.as_array()) {
        let limit = count_slots.unwrap_or(DEFAULT_COUNT_SLOTS);
        let now = now_local(server_name);
        let mut slots = Vec::with_capacity(staff.len());
        for member in staff {
            let master_name = member.get("name").and_then(|v| v.as_str()).map(str::to_string);
            let master_id = member.get("id").and_then(|v| v.as_i64());
            let mut pairs: Vec<(chrono::DateTime<chrono_tz::Tz>, String)> = Vec::new();
            if let Some(dates) = member.get("dates").and_then(|v| v.as_array()) {
                for slot in dates {
                    let Some(slot) = slot.as_str() else { continue };
                    if let Ok(parsed) = parse_slot(server_name, slot) {
                        if parsed > now {
                            pairs.push((parsed, slot.to_string()));
                        }
                    }
                }
            }
            pairs.sort_by_key(|(dt, _)| *dt);
            slots.push(MasterSlots {
                master_name,
                master_id,
                master_slots: pairs.into_iter().take(limit).map(|(_, s)| s).collect(),
            });
        }
        let product_name = service_name.split(',').next().unwrap_or(service_name).trim();
        let filtered = filter_sequences_list(product_name, slots);
        return ok((AvailabilityList::SingleService(filtered), Vec::new()));
    }

    let substituted = substitute_sequence_masters(response);
    let sequences = substituted
        .get("result")
        .and_then(|r| r.get("avaliable_sequences"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let selectors = sequences
        .iter()
        .map(|seq| SequenceSelector {
            sequence_id: seq.get("sequence_id").cloned(),
            start_time: seq.get("total_start_time").cloned(),
        })
        .collect();
    let short = flatten_short(&sequences);

    ok((AvailabilityList::Sequences(selectors), short))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_master_matches_by_prefix() {
        assert_eq!(required_master_for("Прессотерапия, 30 минут"), Some("Прессотерапия"));
        assert_eq!(required_master_for("Массаж лица"), None);
    }

    #[test]
    fn substitution_table_has_the_four_hardcoded_ids() {
        let ids: Vec<_> = SEQUENCE_MASTER_SUBSTITUTION.iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids, vec!["2950601", "2950597", "2950609", "2950603"]);
    }

    #[test]
    fn flatten_short_prefixes_product_id_with_branch_seven() {
        let sequences = vec![json!({
            "sequence_id": "s1",
            "total_start_time": "2030-01-15 09:00",
            "steps": [{"service_id": "2950601", "master_id": "881127", "master_name": "Термотерапия", "start_time": "2030-01-15 09:00"}]
        })];
        let short = flatten_short(&sequences);
        assert_eq!(short[0].services[0].product_id, "7-2950601");
    }
}

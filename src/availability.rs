//! Branch fan-out availability engine (C11). Grounded in
//! `avaliable_time_for_master.py`/`class_avaliable_time_for_master.py`: a
//! product belongs to one "primary" branch; when that branch has nothing
//! open, every other configured branch is checked for the same service
//! under its own article id, each failure isolated so one bad branch never
//! blanks out the rest. Unlike the original, which hardcodes a single
//! tenant's channel-id env var, the branch list here is carried explicitly
//! per tenant ([`TenantBranches`]) so the same engine serves every fleet
//! member.

use crate::crm::availability_single::avaliable_time_for_master_async;
use crate::crm::{CrmGateway, MasterSlots};
use crate::pg_pool::PgPool;
use crate::result::{err, ok, ErrorCode, Payload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct BranchConfig {
    pub office_id: String,
    pub channel_id: i64,
}

/// One tenant's known branch set plus the IANA zone its slots are quoted in.
#[derive(Debug, Clone)]
pub struct TenantBranches {
    pub server_name: String,
    pub branches: Vec<BranchConfig>,
}

impl TenantBranches {
    fn find_by_office_id(&self, office_id: &str) -> Option<&BranchConfig> {
        self.branches.iter().find(|b| b.office_id == office_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchAvailability {
    pub office_id: String,
    pub available_time: Vec<MasterSlots>,
    pub message: String,
}

/// Splits `"{primary_channel}-{article}"`. Both halves must be non-empty and
/// the channel half must parse as an integer id.
fn split_product_id(product_id: &str) -> Option<(i64, &str)> {
    let (channel_part, article) = product_id.split_once('-')?;
    if channel_part.is_empty() || article.is_empty() {
        return None;
    }
    channel_part.parse::<i64>().ok().map(|channel| (channel, article))
}

#[allow(clippy::too_many_arguments)]
async fn fetch_branch(
    gateway: &CrmGateway,
    server_name: &str,
    date: &str,
    office_id: &str,
    channel_id: i64,
    article: &str,
) -> BranchAvailability {
    let product_id = format!("{channel_id}-{article}");
    match avaliable_time_for_master_async(gateway, date, &product_id, server_name, None).await {
        Ok(slots) if slots.is_empty() => BranchAvailability {
            office_id: office_id.to_string(),
            available_time: Vec::new(),
            message: "Нет доступного времени".to_string(),
        },
        Ok(slots) => BranchAvailability {
            office_id: office_id.to_string(),
            available_time: slots,
            message: String::new(),
        },
        Err(payload) => BranchAvailability {
            office_id: office_id.to_string(),
            available_time: Vec::new(),
            message: payload.error,
        },
    }
}

/// Entry point for the `avaliable_time_for_master` tool. `office_id` is the
/// branch the client is actually asking from; `product_id` carries the
/// primary channel and article. When `office_id` names a different branch
/// than the product's primary channel, the article must first be resolved
/// through the cross-branch mapping (C5) before anything is fetched.
pub async fn find_available_time(
    gateway: &CrmGateway,
    pg: &PgPool,
    tenant: &TenantBranches,
    office_id: &str,
    date: &str,
    product_id: &str,
) -> Payload<Vec<BranchAvailability>> {
    let Some(office_branch) = tenant.find_by_office_id(office_id) else {
        return err(ErrorCode::ValidationError, format!("Неизвестный филиал: {office_id}"));
    };

    let Some((primary_channel, article)) = split_product_id(product_id) else {
        return err(
            ErrorCode::ValidationError,
            format!("Неверный формат product_id: {product_id:?}, ожидается '{{channel}}-{{article}}'"),
        );
    };

    // Step 2: resolve which product id to actually fetch for office_id.
    let office_product_id = if office_branch.channel_id == primary_channel {
        product_id.to_string()
    } else {
        match pg.read_secondary_article_by_primary(article, primary_channel, office_branch.channel_id).await {
            Ok(Some(secondary_article)) => format!("{}-{secondary_article}", office_branch.channel_id),
            Ok(None) => {
                return err(ErrorCode::ValidationError, format!("Услуга недоступна в филиале: {office_id}"))
            }
            Err(_) => {
                return err(ErrorCode::InternalError, format!("Не удалось определить артикул услуги для филиала: {office_id}"))
            }
        }
    };

    let office_slots =
        match avaliable_time_for_master_async(gateway, date, &office_product_id, &tenant.server_name, None).await {
            Ok(slots) => slots,
            Err(payload) => return Err(payload),
        };

    let office_result = BranchAvailability {
        office_id: office_id.to_string(),
        available_time: office_slots.clone(),
        message: if office_slots.is_empty() { "Нет доступного времени".to_string() } else { String::new() },
    };

    if !office_slots.is_empty() {
        return ok(vec![office_result]);
    }

    // Step 5: every other configured branch, preserving configured order.
    let others: Vec<&BranchConfig> = tenant.branches.iter().filter(|b| b.office_id != office_id).collect();

    // Step 6: sequential, failure-isolated resolution: a Postgres hiccup on
    // one branch's mapping must not prevent checking the rest.
    let mut resolved = Vec::with_capacity(others.len());
    for branch in &others {
        if branch.channel_id == primary_channel {
            resolved.push(Some(article.to_string()));
            continue;
        }
        match pg.read_secondary_article_by_primary(article, primary_channel, branch.channel_id).await {
            Ok(Some(secondary_article)) => resolved.push(Some(secondary_article)),
            Ok(None) | Err(_) => resolved.push(None),
        }
    }

    // Step 7: parallel fan-out wave, every branch's outcome isolated.
    let fetches = resolved.into_iter().zip(others.iter()).map(|(mapped_article, branch)| {
        let branch_office_id = branch.office_id.clone();
        async move {
            match mapped_article {
                Some(secondary_article) => {
                    fetch_branch(gateway, &tenant.server_name, date, &branch.office_id, branch.channel_id, &secondary_article).await
                }
                None => BranchAvailability {
                    office_id: branch_office_id,
                    available_time: Vec::new(),
                    message: "Услуга недоступна в этом филиале".to_string(),
                },
            }
        }
    });

    let other_results = futures::future::join_all(fetches).await;

    let mut assembled = Vec::with_capacity(1 + other_results.len());
    assembled.push(office_result);
    assembled.extend(other_results);

    ok(assembled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantBranches {
        TenantBranches {
            server_name: "sofia".to_string(),
            branches: vec![
                BranchConfig { office_id: "sofia".to_string(), channel_id: 1 },
                BranchConfig { office_id: "anisa".to_string(), channel_id: 2 },
                BranchConfig { office_id: "alena".to_string(), channel_id: 3 },
            ],
        }
    }

    #[test]
    fn splits_channel_and_article() {
        assert_eq!(split_product_id("1-232324"), Some((1, "232324")));
        assert_eq!(split_product_id("bad"), None);
        assert_eq!(split_product_id("-232324"), None);
        assert_eq!(split_product_id("1-"), None);
    }

    #[tokio::test]
    async fn unknown_office_id_is_validation_error_with_no_network_call() {
        std::env::set_var("POSTGRES_HOST", "localhost");
        std::env::set_var("POSTGRES_DB", "crm");
        std::env::set_var("POSTGRES_USER", "u");
        std::env::set_var("POSTGRES_PASSWORD", "p");
        let settings = crate::settings::Settings::from_env().unwrap();
        for k in ["POSTGRES_HOST", "POSTGRES_DB", "POSTGRES_USER", "POSTGRES_PASSWORD"] {
            std::env::remove_var(k);
        }
        let gateway = CrmGateway::new(reqwest::Client::new(), &settings);
        let pg = PgPool::build(&settings).unwrap();
        let result = find_available_time(&gateway, &pg, &tenant(), "unknown", "2030-01-15", "1-232324").await;
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationError);
    }

    async fn gateway_and_pg_against(server: &wiremock::MockServer) -> (CrmGateway, PgPool) {
        std::env::set_var("POSTGRES_HOST", "localhost");
        std::env::set_var("POSTGRES_DB", "crm");
        std::env::set_var("POSTGRES_USER", "u");
        std::env::set_var("POSTGRES_PASSWORD", "p");
        std::env::set_var("CRM_BASE_URL", server.uri());
        let settings = crate::settings::Settings::from_env().unwrap();
        for k in ["POSTGRES_HOST", "POSTGRES_DB", "POSTGRES_USER", "POSTGRES_PASSWORD", "CRM_BASE_URL"] {
            std::env::remove_var(k);
        }
        let gateway = CrmGateway::new(reqwest::Client::new(), &settings);
        let pg = PgPool::build(&settings).unwrap();
        (gateway, pg)
    }

    // S1: office_id names the primary branch itself — product_id is used
    // as-is, no cross-branch mapping lookup, and the other branch is never
    // queried once the primary returns slots.
    #[tokio::test]
    async fn s1_primary_office_has_slots_no_fallback() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments/yclients/product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "result": {"service": {"staff": [
                    {"id": 1, "name": "M", "dates": ["2030-01-15 09:00", "2030-01-15 10:00", "2030-01-15 11:00"]}
                ]}}
            })))
            .expect(1)
            .mount(&server)
            .await;
        let (gateway, pg) = gateway_and_pg_against(&server).await;

        let result = find_available_time(&gateway, &pg, &tenant(), "sofia", "2030-01-15", "1-232324")
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].office_id, "sofia");
        assert_eq!(result[0].available_time[0].master_slots.len(), 3);
    }

    // office_id differs from the product's primary channel: step 2 must go
    // through the cross-branch mapper before fetching anything, and the
    // fetch must use office_id's own channel, not the primary's.
    #[tokio::test]
    async fn office_id_other_than_primary_channel_uses_mapped_article() {
        use wiremock::matchers::{body_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        // Branch 3 ("alena") has no mapping row configured, so lookups
        // against it must yield None (schema unknown to this test) — only
        // assert on the request actually sent for the resolved article.
        Mock::given(method("POST"))
            .and(path("/appointments/yclients/product"))
            .and(body_json(serde_json::json!({"service_id": "2-232324", "base_date": "2030-01-15"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "result": {"service": {"staff": []}}
            })))
            .mount(&server)
            .await;
        let (gateway, pg) = gateway_and_pg_against(&server).await;

        // No mapping table exists in this environment, so the pg lookup for
        // branch "anisa" (channel 2) returns an error, which must surface
        // as an internal_error rather than a panic or a silent empty list —
        // office_id itself is not the primary channel, so the mapping call
        // is mandatory, matching step 2 of the algorithm.
        let result = find_available_time(&gateway, &pg, &tenant(), "anisa", "2030-01-15", "1-232324").await;
        assert!(result.is_err());
    }
}

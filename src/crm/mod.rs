//! Typed wrappers over every CRM endpoint. Every operation here validates
//! inputs, builds its request lazily, calls through [`http::post_json`], and
//! normalizes the response into [`crate::result::Payload`] — never raising
//! across its boundary, per the distilled spec's §4.3/§7.

pub mod administrator;
pub mod availability_list;
pub mod availability_single;
pub mod client_records;
pub mod delete_record;
pub mod http;
pub mod masters;
pub mod record_time;
pub mod reschedule;
pub mod secondary;

use crate::retry::RetryPolicy;
use crate::settings::Settings;
use http::CrmConfig;
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct CrmGateway {
    pub client: Client,
    pub primary: CrmConfig,
    pub secondary: CrmConfig,
}

impl CrmGateway {
    pub fn new(client: Client, settings: &Settings) -> Self {
        let retry_policy = RetryPolicy::new(
            settings.crm_http_retries,
            settings.crm_retry_min_delay_s,
            settings.crm_retry_max_delay_s,
        );
        let timeout = Duration::from_secs_f64(settings.crm_http_timeout_s);
        Self {
            client,
            primary: CrmConfig {
                base_url: settings.crm_base_url.clone(),
                timeout,
                retry_policy,
            },
            secondary: CrmConfig {
                base_url: settings.crm_secondary_base_url.clone(),
                timeout,
                retry_policy,
            },
        }
    }
}

/// Master record as returned by the CRM staff listing (`crm_get_masters.py`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Master {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// One master's sorted, future-filtered slot list for a single branch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MasterSlots {
    pub master_name: Option<String>,
    pub master_id: Option<i64>,
    pub master_slots: Vec<String>,
}

/// A client's appointment record, exposed only when `status == "pending"`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClientRecord {
    pub record_id: String,
    pub record_date: Option<String>,
    pub office_id: Option<String>,
    pub master_id: Option<String>,
    pub master_name: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub status: String,
}

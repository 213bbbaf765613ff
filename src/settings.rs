//! Immutable process settings loaded once from the environment.
//!
//! Mirrors `settings.py`: every field is read through a small fail-fast
//! helper (`require_str`/`require_int`/`opt_*`) so a missing or malformed
//! value aborts process start with a one-line diagnostic naming the key,
//! instead of surfacing as a confusing error three calls deep.

use std::env;
use std::fmt;

#[derive(Debug)]
pub enum SettingsError {
    Missing(&'static str),
    BadInt(&'static str, String),
    BadFloat(&'static str, String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Missing(key) => write!(f, "missing required environment variable: {key}"),
            SettingsError::BadInt(key, raw) => {
                write!(f, "environment variable {key} is not a valid integer: {raw:?}")
            }
            SettingsError::BadFloat(key, raw) => {
                write!(f, "environment variable {key} is not a valid float: {raw:?}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

fn require_str(key: &'static str) -> Result<String, SettingsError> {
    env::var(key).map_err(|_| SettingsError::Missing(key))
}

fn opt_str(key: &'static str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn opt_int(key: &'static str, default: i64) -> Result<i64, SettingsError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| SettingsError::BadInt(key, raw)),
    }
}

fn opt_float(key: &'static str, default: f64) -> Result<f64, SettingsError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| SettingsError::BadFloat(key, raw)),
    }
}

/// Required integer env var with no default — used for per-tenant ports.
pub fn require_int(key: &'static str) -> Result<i64, SettingsError> {
    let raw = require_str(key)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SettingsError::BadInt(key, raw))
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env_label: String,
    pub log_level: String,

    pub crm_base_url: String,
    pub crm_http_timeout_s: f64,
    pub crm_http_retries: u32,
    pub crm_retry_min_delay_s: f64,
    pub crm_retry_max_delay_s: f64,

    pub crm_secondary_base_url: String,

    pub postgres_host: String,
    pub postgres_port: i64,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub pg_pool_min: usize,
    pub pg_pool_max: usize,
    pub pg_connect_timeout_s: u64,
    pub pg_statement_timeout_ms: u64,
    pub pg_query_timeout_s: u64,
    pub pg_ddl_timeout_s: u64,

    pub qdrant_url: String,
    pub qdrant_timeout: f64,
    pub qdrant_api_key: Option<String>,
    pub qdrant_collection_faq: String,
    pub qdrant_collection_services: String,
    pub qdrant_collection_products: String,
    pub qdrant_collection_temp: String,

    pub openai_api_key: Option<String>,
    pub openai_timeout_s: f64,
    pub openai_proxy_url: Option<String>,
    pub openai_model: String,
    pub openai_temperature: f64,
}

impl Settings {
    /// Build from the current process environment. Fails fast on the first
    /// missing or malformed required value.
    pub fn from_env() -> Result<Self, SettingsError> {
        let openai_timeout_s = match env::var("OPENAI_TIMEOUT_S") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| SettingsError::BadFloat("OPENAI_TIMEOUT_S", raw))?,
            Err(_) => opt_float("OPENAI_TIMEOUT", 60.0)?,
        };

        Ok(Settings {
            env_label: opt_str("ENV", "dev"),
            log_level: opt_str("LOG_LEVEL", "INFO"),

            crm_base_url: opt_str("CRM_BASE_URL", "https://httpservice.ai2b.pro"),
            crm_http_timeout_s: opt_float("CRM_HTTP_TIMEOUT_S", 180.0)?,
            crm_http_retries: opt_int("CRM_HTTP_RETRIES", 3)?.max(1) as u32,
            crm_retry_min_delay_s: opt_float("CRM_RETRY_MIN_DELAY_S", 1.0)?,
            crm_retry_max_delay_s: opt_float("CRM_RETRY_MAX_DELAY_S", 10.0)?,

            crm_secondary_base_url: opt_str("CRM_SECONDARY_BASE_URL", "https://go.ai2b.pro"),

            postgres_host: require_str("POSTGRES_HOST")?,
            postgres_port: opt_int("POSTGRES_PORT", 5432)?,
            postgres_db: require_str("POSTGRES_DB")?,
            postgres_user: require_str("POSTGRES_USER")?,
            postgres_password: require_str("POSTGRES_PASSWORD")?,
            pg_pool_min: opt_int("PG_POOL_MIN", 1)?.max(0) as usize,
            pg_pool_max: opt_int("PG_POOL_MAX", 10)?.max(1) as usize,
            pg_connect_timeout_s: opt_int("PG_CONNECT_TIMEOUT_S", 10)?.max(1) as u64,
            pg_statement_timeout_ms: opt_int("PG_STATEMENT_TIMEOUT_MS", 5000)?.max(0) as u64,
            pg_query_timeout_s: opt_int("PG_QUERY_TIMEOUT_S", 10)?.max(1) as u64,
            pg_ddl_timeout_s: opt_int("PG_DDL_TIMEOUT_S", 30)?.max(1) as u64,

            qdrant_url: opt_str("QDRANT_URL", "http://localhost:6333"),
            qdrant_timeout: opt_float("QDRANT_TIMEOUT", 120.0)?,
            qdrant_api_key: env::var("QDRANT_API_KEY").ok(),
            qdrant_collection_faq: opt_str("QDRANT_COLLECTION_FAQ", "faq"),
            qdrant_collection_services: opt_str("QDRANT_COLLECTION_SERVICES", "services"),
            qdrant_collection_products: opt_str("QDRANT_COLLECTION_PRODUCTS", "products"),
            qdrant_collection_temp: opt_str("QDRANT_COLLECTION_TEMP", "temp"),

            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_timeout_s,
            openai_proxy_url: env::var("OPENAI_PROXY_URL").ok(),
            openai_model: opt_str("OPENAI_MODEL", "gpt-4o-mini"),
            openai_temperature: opt_float("OPENAI_TEMPERATURE", 0.2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all() {
        for key in [
            "ENV", "LOG_LEVEL", "CRM_BASE_URL", "CRM_HTTP_TIMEOUT_S", "CRM_HTTP_RETRIES",
            "CRM_RETRY_MIN_DELAY_S", "CRM_RETRY_MAX_DELAY_S", "CRM_SECONDARY_BASE_URL",
            "POSTGRES_HOST", "POSTGRES_PORT", "POSTGRES_DB", "POSTGRES_USER",
            "POSTGRES_PASSWORD", "PG_POOL_MIN", "PG_POOL_MAX", "PG_CONNECT_TIMEOUT_S",
            "PG_STATEMENT_TIMEOUT_MS", "PG_QUERY_TIMEOUT_S", "PG_DDL_TIMEOUT_S",
            "QDRANT_URL", "QDRANT_TIMEOUT", "QDRANT_API_KEY", "OPENAI_API_KEY",
            "OPENAI_TIMEOUT_S", "OPENAI_TIMEOUT", "OPENAI_MODEL", "OPENAI_TEMPERATURE",
        ] {
            env::remove_var(key);
        }
    }

    fn set_required_postgres() {
        env::set_var("POSTGRES_HOST", "localhost");
        env::set_var("POSTGRES_DB", "crm");
        env::set_var("POSTGRES_USER", "crm_user");
        env::set_var("POSTGRES_PASSWORD", "secret");
    }

    #[test]
    fn missing_required_key_names_it() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, SettingsError::Missing("POSTGRES_HOST")));
        assert!(err.to_string().contains("POSTGRES_HOST"));
    }

    #[test]
    fn malformed_int_aborts_with_key_name() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required_postgres();
        env::set_var("PG_POOL_MAX", "not-a-number");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, SettingsError::BadInt("PG_POOL_MAX", _)));
        env::remove_var("PG_POOL_MAX");
    }

    #[test]
    fn defaults_match_original_source() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required_postgres();
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.crm_base_url, "https://httpservice.ai2b.pro");
        assert_eq!(settings.crm_http_timeout_s, 180.0);
        assert_eq!(settings.crm_http_retries, 3);
        assert_eq!(settings.pg_pool_min, 1);
        assert_eq!(settings.pg_pool_max, 10);
        assert_eq!(settings.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn openai_timeout_s_falls_back_to_openai_timeout() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required_postgres();
        env::set_var("OPENAI_TIMEOUT", "45");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.openai_timeout_s, 45.0);
        env::remove_var("OPENAI_TIMEOUT");
    }
}

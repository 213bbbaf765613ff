//! Shared Postgres pool: catalogue-key reads, cross-branch article mapping,
//! and the one write path the Non-goals permit (tool-choice recording).
//! Mirrors `db_pool.py`'s `init_pg_pool`/`get_pg_pool`/`close_pg_pool`, but
//! as an owned handle rather than a module global, and `postgres_util.py`'s
//! `insert_dialog_state` for the write path.

use crate::settings::Settings;
use deadpool_postgres::{Hook, HookError, Manager, ManagerConfig, Pool, RecyclingMethod};
use serde_json::Value;
use std::time::Duration;
use tokio_postgres::NoTls;

#[derive(Debug, thiserror::Error)]
pub enum PgError {
    #[error("failed to build postgres pool: {0}")]
    Build(String),
    #[error("postgres liveness probe failed: {0}")]
    Liveness(String),
    #[error("postgres query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
    #[error("failed to acquire pooled connection: {0}")]
    Pool(String),
}

#[derive(Debug, Clone, Default)]
pub struct CatalogueKeys {
    pub indications_key: Vec<String>,
    pub contraindications_key: Vec<String>,
    pub body_parts: Vec<String>,
}

/// Thin owned wrapper so call sites don't reach for `deadpool_postgres`
/// directly — keeps the pooling library an implementation detail of this
/// module, matching the original's single `db_pool.py` chokepoint.
#[derive(Clone)]
pub struct PgPool {
    pool: Pool,
}

impl PgPool {
    pub fn build(settings: &Settings) -> Result<Self, PgError> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = Some(settings.postgres_host.clone());
        cfg.port = Some(settings.postgres_port as u16);
        cfg.dbname = Some(settings.postgres_db.clone());
        cfg.user = Some(settings.postgres_user.clone());
        cfg.password = Some(settings.postgres_password.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let statement_timeout_ms = settings.pg_statement_timeout_ms;
        let manager = Manager::from_config(
            cfg.get_pg_config().map_err(|e| PgError::Build(e.to_string()))?,
            NoTls,
            cfg.manager.clone().unwrap_or_default(),
        );

        let mut builder = Pool::builder(manager)
            .max_size(settings.pg_pool_max.max(settings.pg_pool_min).max(1))
            .post_create(Hook::async_fn(move |client, _| {
                Box::pin(async move {
                    client
                        .batch_execute(&format!("SET statement_timeout = {statement_timeout_ms}"))
                        .await
                        .map_err(|e| HookError::Backend(e.into()))
                })
            }));
        builder = builder
            .create_timeout(Some(Duration::from_secs(settings.pg_connect_timeout_s)))
            .wait_timeout(Some(Duration::from_secs(settings.pg_connect_timeout_s)))
            .runtime(deadpool_postgres::Runtime::Tokio1);

        let pool = builder.build().map_err(|e| PgError::Build(e.to_string()))?;
        Ok(Self { pool })
    }

    /// `SELECT 1` with `PG_QUERY_TIMEOUT_S`. Called once at startup; failure
    /// aborts the process before any tenant is launched.
    pub async fn check_alive(&self, query_timeout: Duration) -> Result<(), PgError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| PgError::Liveness(e.to_string()))?;
        tokio::time::timeout(query_timeout, client.batch_execute("SELECT 1"))
            .await
            .map_err(|_| PgError::Liveness("timed out".to_string()))?
            .map_err(|e| PgError::Liveness(e.to_string()))?;
        Ok(())
    }

    /// No explicit teardown is required by `deadpool_postgres` beyond
    /// dropping the handle, but this gives the supervisor one call site to
    /// log against, matching the original's explicit `close_pg_pool`.
    pub fn close(&self) {
        self.pool.close();
    }

    pub async fn catalogue_keys(&self, branch_id: i64) -> Result<CatalogueKeys, PgError> {
        let client = self.pool.get().await.map_err(|e| PgError::Pool(e.to_string()))?;
        let row = client
            .query_opt(
                "SELECT indications_key, contraindications_key, body_parts \
                 FROM branch_catalogue_keys WHERE branch_id = $1",
                &[&branch_id],
            )
            .await?;

        Ok(match row {
            Some(row) => CatalogueKeys {
                indications_key: row.get::<_, Vec<String>>(0),
                contraindications_key: row.get::<_, Vec<String>>(1),
                body_parts: row.get::<_, Vec<String>>(2),
            },
            None => CatalogueKeys::default(),
        })
    }

    /// For a `(primary_article, primary_channel, secondary_channel)` triple,
    /// the article ID of the same logical service in the secondary branch.
    /// Grounded in `avaliable_time_for_master.py::_resolve_product_for_office`
    /// calling `read_secondary_article_by_primary`.
    pub async fn read_secondary_article_by_primary(
        &self,
        primary_article: &str,
        primary_channel: i64,
        secondary_channel: i64,
    ) -> Result<Option<String>, PgError> {
        let client = self.pool.get().await.map_err(|e| PgError::Pool(e.to_string()))?;
        let row = client
            .query_opt(
                "SELECT secondary_article FROM cross_branch_article_map \
                 WHERE primary_article = $1 AND primary_channel = $2 AND secondary_channel = $3",
                &[&primary_article, &primary_channel, &secondary_channel],
            )
            .await?;
        Ok(row.map(|r| r.get::<_, String>(0)))
    }

    /// Records a session's tool choice. The only persistence the Non-goals
    /// permit; write-only, mirrors `insert_dialog_state`'s dynamic JSON blob.
    pub async fn insert_dialog_state(&self, session_id: &str, data: &Value) -> Result<i64, PgError> {
        let client = self.pool.get().await.map_err(|e| PgError::Pool(e.to_string()))?;
        let row = client
            .query_one(
                "INSERT INTO dialog_state (session_id, data) VALUES ($1, $2) RETURNING id",
                &[&session_id, data],
            )
            .await?;
        Ok(row.get::<_, i64>(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for_test() -> Settings {
        std::env::set_var("POSTGRES_HOST", "localhost");
        std::env::set_var("POSTGRES_DB", "crm");
        std::env::set_var("POSTGRES_USER", "crm_user");
        std::env::set_var("POSTGRES_PASSWORD", "secret");
        let settings = Settings::from_env().unwrap();
        std::env::remove_var("POSTGRES_HOST");
        std::env::remove_var("POSTGRES_DB");
        std::env::remove_var("POSTGRES_USER");
        std::env::remove_var("POSTGRES_PASSWORD");
        settings
    }

    #[test]
    fn pool_builds_without_connecting() {
        // Pool construction is lazy; it must succeed even with no reachable
        // server, matching asyncpg's create_pool (which also defers the
        // first real connection attempt).
        let settings = settings_for_test();
        assert!(PgPool::build(&settings).is_ok());
    }
}

//! Fail-fast lifecycle supervisor (C12). Grounded in `main_v2.py::main`: load
//! env, bring up the shared Postgres pool with a liveness probe, spawn one
//! task per tenant, then race a shutdown signal against "any tenant task
//! finished" — a signal wins gracefully, anything else is a crash that takes
//! the whole process down so the container orchestrator restarts it.

use crate::crm::CrmGateway;
use crate::http_client::build_shared_client;
use crate::pg_pool::PgPool;
use crate::retrievers::RetrieverClient;
use crate::runtime_env::load_dotenv;
use crate::settings::{require_int, Settings};
use crate::tenants::{registry::tenant_specs, SharedResources};
use crate::{observability, server};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinSet;

pub async fn run() -> ExitCode {
    load_dotenv();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("fatal: failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    observability::init(&settings.log_level);
    tracing::info!(env = %settings.env_label, log_level = %settings.log_level, "runtime starting");

    tracing::info!("initializing postgres pool");
    let pg = match PgPool::build(&settings) {
        Ok(pg) => pg,
        Err(e) => {
            tracing::error!(error = %e, "failed to build postgres pool");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = pg.check_alive(Duration::from_secs(settings.pg_query_timeout_s)).await {
        tracing::error!(error = %e, "postgres is not responding on startup");
        return ExitCode::FAILURE;
    }

    let http_client = match build_shared_client() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build shared HTTP client");
            pg.close();
            return ExitCode::FAILURE;
        }
    };

    let shared = SharedResources {
        gateway: Arc::new(CrmGateway::new(http_client.clone(), &settings)),
        pg: Arc::new(pg),
        retriever: Arc::new(RetrieverClient::new(http_client, &settings)),
        settings: Arc::new(settings),
    };

    let mut tasks: JoinSet<(String, std::io::Result<()>)> = JoinSet::new();
    let mut tenant_names = Vec::new();

    for spec in tenant_specs() {
        let port = match require_int(spec.env_port) {
            Ok(port) => port as u16,
            Err(e) => {
                tracing::error!(tenant = spec.name, error = %e, "failed to resolve tenant port");
                shared.pg.close();
                return ExitCode::FAILURE;
            }
        };
        let channel_ids_csv = match std::env::var(spec.channels_env) {
            Ok(csv) => csv,
            Err(_) => {
                tracing::error!(tenant = spec.name, env = spec.channels_env, "missing channel ids for tenant");
                shared.pg.close();
                return ExitCode::FAILURE;
            }
        };
        let tenant_branches = crate::tenants::branches_for(spec.name, &channel_ids_csv);
        let Some(primary) = tenant_branches.branches.first().map(|b| b.channel_id) else {
            tracing::error!(tenant = spec.name, "no channel ids configured for tenant");
            shared.pg.close();
            return ExitCode::FAILURE;
        };

        // Best-effort: a missing catalogue-key row degrades to an empty
        // filter allowlist in the tool description rather than blocking
        // the whole tenant from starting.
        let catalogue_keys = shared.pg.catalogue_keys(primary).await.unwrap_or_else(|e| {
            tracing::warn!(tenant = spec.name, error = %e, "failed to load catalogue keys, using empty allowlist");
            Default::default()
        });

        let registry = (spec.build_tools)(&shared, &tenant_branches, primary, &catalogue_keys);
        let router = server::build_router(spec.name, registry);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let name = spec.name.to_string();

        tracing::info!(tenant = %name, port, "starting tenant server");
        tenant_names.push(name.clone());
        tasks.spawn(async move {
            let result = server::serve(addr, router).await;
            (name, result)
        });
    }

    tracing::info!(tenants = ?tenant_names, "all tenant server tasks scheduled");

    let shutdown = async {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(_) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    };
    tokio::pin!(shutdown);

    let exit_code = tokio::select! {
        _ = &mut shutdown => {
            tracing::info!("shutdown signal received, stopping all tenant servers");
            tasks.shutdown().await;
            ExitCode::SUCCESS
        }
        next = tasks.join_next() => {
            match next {
                Some(Ok((name, Ok(())))) => {
                    tracing::error!(tenant = %name, "tenant server exited without error — unexpected");
                }
                Some(Ok((name, Err(e)))) => {
                    tracing::error!(tenant = %name, error = %e, "tenant server crashed");
                }
                Some(Err(join_err)) => {
                    tracing::error!(error = %join_err, "tenant server task panicked");
                }
                None => {}
            }
            tracing::error!("one tenant server ended — fail-fast, stopping the rest");
            tasks.shutdown().await;
            ExitCode::FAILURE
        }
    };

    tracing::info!("closing postgres pool");
    shared.pg.close();
    exit_code
}

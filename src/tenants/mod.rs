//! Tenant builders (C9): per-tenant tool-registry assembly bound to the
//! process-wide shared resources. Grounded in `server_types.py::ServerSpec`
//! and `server_spec_factory.py::build_mcp_from_spec` — a tenant is just a
//! name, a port env var, a channel-id env var, and a pure function from
//! shared resources to a [`crate::tools::ToolRegistry`].

pub mod alena;
pub mod registry;
pub mod sofia;

use crate::availability::{BranchConfig, TenantBranches};
use crate::crm::CrmGateway;
use crate::pg_pool::{CatalogueKeys, PgPool};
use crate::retrievers::RetrieverClient;
use crate::settings::Settings;
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Process-wide resources every tenant builder closes over. Nothing here is
/// tenant-specific — only the wiring in each tenant module differs.
#[derive(Clone)]
pub struct SharedResources {
    pub gateway: Arc<CrmGateway>,
    pub pg: Arc<PgPool>,
    pub retriever: Arc<RetrieverClient>,
    pub settings: Arc<Settings>,
}

pub struct TenantSpec {
    pub name: &'static str,
    pub env_port: &'static str,
    pub channels_env: &'static str,
    pub build_tools: fn(&SharedResources, &TenantBranches, i64, &CatalogueKeys) -> ToolRegistry,
}

/// `CHANNEL_IDS_<NAME>` is a comma-separated list of numeric branch ids that
/// carries no accompanying names. Office ids are derived positionally: the
/// tenant's own name for the first (primary) id, `<tenant>_<channel_id>` for
/// the rest.
pub fn branches_for(tenant: &str, channel_ids_csv: &str) -> TenantBranches {
    let branches = channel_ids_csv
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|raw| raw.parse::<i64>().ok())
        .enumerate()
        .map(|(i, channel_id)| BranchConfig {
            office_id: if i == 0 { tenant.to_string() } else { format!("{tenant}_{channel_id}") },
            channel_id,
        })
        .collect();
    TenantBranches {
        server_name: tenant.to_string(),
        branches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_channel_id_becomes_the_tenant_named_office() {
        let tenant = branches_for("sofia", "1, 19");
        assert_eq!(tenant.branches[0].office_id, "sofia");
        assert_eq!(tenant.branches[0].channel_id, 1);
        assert_eq!(tenant.branches[1].office_id, "sofia_19");
    }

    #[test]
    fn blank_entries_are_skipped() {
        let tenant = branches_for("alena", "3,,");
        assert_eq!(tenant.branches.len(), 1);
    }
}

//! The tenant fleet itself. Grounded in `server_registry.py::SERVERS` — the
//! full eight-tenant inventory is named in the data model, but only `sofia`
//! (fully wired, since it is grounded in a completely read original module)
//! and `alena` (a narrower tenant, proving the registry is data-driven and
//! not per-tenant branching) are actually built out here.

use super::TenantSpec;

pub fn tenant_specs() -> Vec<TenantSpec> {
    vec![
        TenantSpec {
            name: "sofia",
            env_port: "MCP_PORT_SOFIA",
            channels_env: "CHANNEL_IDS_SOFIA",
            build_tools: super::sofia::build_tools,
        },
        TenantSpec {
            name: "alena",
            env_port: "MCP_PORT_ALENA",
            channels_env: "CHANNEL_IDS_ALENA",
            build_tools: super::alena::build_tools,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_has_two_distinct_named_tenants() {
        let specs = tenant_specs();
        let names: Vec<_> = specs.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["sofia", "alena"]);
    }
}

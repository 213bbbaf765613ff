//! Alena's narrower tool set: staff listing, records, escalation, and the
//! secondary-backend lesson family — no availability fan-out or search.
//! Demonstrates that the tenant registry is genuinely data-driven rather
//! than a single hardcoded tool list, and is the one registry entry that
//! enables the `go_*` secondary CRM family (§9's "only for tenants whose
//! registry entry enables it").

use super::SharedResources;
use crate::availability::TenantBranches;
use crate::pg_pool::CatalogueKeys;
use crate::tools::escalation::EscalationTool;
use crate::tools::masters_tool::MastersTool;
use crate::tools::records::ClientRecordsTool;
use crate::tools::secondary::{SecondaryLessonsTool, SecondaryStatisticsTool, SecondaryUpdateInfoTool, SecondaryUpdateLessonTool};
use crate::tools::{Tool, ToolRegistry};

pub fn build_tools(shared: &SharedResources, _tenant: &TenantBranches, primary_channel_id: i64, _catalogue_keys: &CatalogueKeys) -> ToolRegistry {
    let tools: Vec<Box<dyn Tool>> = vec![
        Box::new(MastersTool {
            gateway: shared.gateway.clone(),
            channel_id: primary_channel_id,
        }),
        Box::new(ClientRecordsTool { gateway: shared.gateway.clone() }),
        Box::new(EscalationTool {
            gateway: shared.gateway.clone(),
            channel_id: primary_channel_id.to_string(),
        }),
        Box::new(SecondaryLessonsTool { gateway: shared.gateway.clone() }),
        Box::new(SecondaryUpdateInfoTool { gateway: shared.gateway.clone() }),
        Box::new(SecondaryUpdateLessonTool { gateway: shared.gateway.clone() }),
        Box::new(SecondaryStatisticsTool { gateway: shared.gateway.clone() }),
    ];
    ToolRegistry::new(tools)
}

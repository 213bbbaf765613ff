//! Sofia's full tool set. Grounded in `tools_sofia.py::build_tools_sofia` /
//! `server_sse_sofia_v2.py::build_mcp_sofia`: FAQ and services search,
//! filtered product search, availability, booking (create/reschedule/
//! cancel), records, recommendations, the `remember_*` session-state
//! confirmations, and administrator escalation — fifteen tools, matching
//! the original's full list.

use super::SharedResources;
use crate::availability::TenantBranches;
use crate::pg_pool::CatalogueKeys;
use crate::tools::availability_tool::AvailabilityTool;
use crate::tools::booking::{CancelRecordTool, RecordTimeTool, RescheduleTool};
use crate::tools::escalation::EscalationTool;
use crate::tools::product_search::ProductSearchTool;
use crate::tools::records::ClientRecordsTool;
use crate::tools::recommendations::RecommendationsTool;
use crate::tools::remember::{RememberDesiredDateTool, RememberDesiredTimeTool, RememberMasterTool, RememberOfficeTool, RememberProductIdTool};
use crate::tools::search::{FaqSearchTool, ServicesSearchTool};
use crate::tools::{Tool, ToolRegistry};

pub fn build_tools(shared: &SharedResources, tenant: &TenantBranches, primary_channel_id: i64, catalogue_keys: &CatalogueKeys) -> ToolRegistry {
    let tools: Vec<Box<dyn Tool>> = vec![
        Box::new(FaqSearchTool {
            retriever: shared.retriever.clone(),
            settings: shared.settings.clone(),
            channel_id: primary_channel_id,
        }),
        Box::new(ServicesSearchTool {
            retriever: shared.retriever.clone(),
            settings: shared.settings.clone(),
            channel_id: primary_channel_id,
        }),
        Box::new(RecordTimeTool { gateway: shared.gateway.clone() }),
        Box::new(ClientRecordsTool { gateway: shared.gateway.clone() }),
        Box::new(CancelRecordTool { gateway: shared.gateway.clone() }),
        Box::new(RememberOfficeTool),
        Box::new(RememberMasterTool),
        Box::new(RecommendationsTool {
            retriever: shared.retriever.clone(),
            settings: shared.settings.clone(),
            channel_id: primary_channel_id,
        }),
        Box::new(RescheduleTool { gateway: shared.gateway.clone() }),
        Box::new(EscalationTool {
            gateway: shared.gateway.clone(),
            channel_id: primary_channel_id.to_string(),
        }),
        Box::new(RememberProductIdTool),
        Box::new(ProductSearchTool::new(
            shared.retriever.clone(),
            shared.settings.clone(),
            shared.pg.clone(),
            primary_channel_id,
            catalogue_keys,
        )),
        Box::new(RememberDesiredDateTool),
        Box::new(RememberDesiredTimeTool),
        Box::new(AvailabilityTool {
            gateway: shared.gateway.clone(),
            pg: shared.pg.clone(),
            tenant: tenant.clone(),
        }),
    ];
    ToolRegistry::new(tools)
}

//! Declarative tool registry (C8). Every tool is a pure descriptor —
//! `{name, description, input_schema, handler}` — composed per-tenant by
//! [`crate::tenants`]. Shape grounded in `web_search_tool.rs`'s
//! `Tool`/`ToolResult` pattern, generalized from a fixed web-search tool
//! into a registry of heterogeneous CRM-backed tools via `async_trait`.

pub mod availability_tool;
pub mod booking;
pub mod escalation;
pub mod masters_tool;
pub mod product_search;
pub mod records;
pub mod recommendations;
pub mod remember;
pub mod search;
pub mod secondary;

use async_trait::async_trait;
use serde_json::Value;

/// Uniform outcome every tool handler returns to the transport layer. Never
/// raises — failures are carried in `error`, matching C13's `ok`/`err`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: Value,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(output: Value) -> Self {
        Self { success: true, output, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, output: Value::Null, error: Some(message.into()) }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> ToolResult;
}

/// One tenant's bound tool set, keyed by its wire-visible name
/// (`zena_<tool>`, per the distilled spec's §6 namespacing).
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn get(&self, wire_name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| wire_name_for(t.name()) == wire_name)
            .map(|t| t.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }
}

pub fn wire_name_for(tool_name: &str) -> String {
    format!("zena_{tool_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes input"
        }
        fn parameters_schema(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(&self, args: Value) -> ToolResult {
            ToolResult::ok(args)
        }
    }

    #[test]
    fn wire_name_is_namespaced() {
        assert_eq!(wire_name_for("echo"), "zena_echo");
    }

    #[tokio::test]
    async fn registry_looks_up_by_wire_name() {
        let registry = ToolRegistry::new(vec![Box::new(Echo)]);
        assert!(registry.get("zena_echo").is_some());
        assert!(registry.get("echo").is_none());
    }
}

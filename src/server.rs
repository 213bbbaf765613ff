//! Server assembler (C10): pure composition binding one tenant's
//! [`crate::tools::ToolRegistry`] onto an HTTP/SSE host. Grounded in
//! `server_common.py::build_mcp` — "mount every tool under one namespace and
//! hand back a server object, nothing else" — generalized from FastMCP's
//! mount-based composition to an `axum` router exposing tool listing and
//! invocation plus an SSE handshake stream.

use crate::tools::{wire_name_for, ToolRegistry};
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct ServerState {
    tenant_name: Arc<str>,
    registry: Arc<ToolRegistry>,
}

/// Builds the router for one tenant. Never binds a socket itself — that is
/// [`serve`]'s job, kept separate so tests can exercise routing without a
/// live port.
pub fn build_router(tenant_name: &str, registry: ToolRegistry) -> Router {
    let state = ServerState {
        tenant_name: Arc::from(tenant_name),
        registry: Arc::new(registry),
    };
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/{name}/invoke", post(invoke_tool))
        .route("/sse", get(sse_handshake))
        .with_state(state)
}

async fn list_tools(State(state): State<ServerState>) -> Json<Value> {
    let tools: Vec<Value> = state
        .registry
        .iter()
        .map(|tool| {
            json!({
                "name": wire_name_for(tool.name()),
                "description": tool.description(),
                "input_schema": tool.parameters_schema(),
            })
        })
        .collect();
    Json(json!({"server": state.tenant_name.as_ref(), "tools": tools}))
}

async fn invoke_tool(State(state): State<ServerState>, Path(name): Path<String>, Json(args): Json<Value>) -> impl IntoResponse {
    match state.registry.get(&name) {
        Some(tool) => Json(serde_json::to_value(tool.execute(args).await).unwrap_or(Value::Null)),
        None => Json(json!({"success": false, "error": format!("unknown tool: {name}")})),
    }
}

/// Single-event handshake announcing the server is up, followed by an
/// indefinite keep-alive — the minimal SSE contract an MCP client needs to
/// confirm it is talking to the right tenant before invoking tools over the
/// parallel `/tools/{name}/invoke` path.
async fn sse_handshake(State(state): State<ServerState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let hello = Event::default().event("ready").data(state.tenant_name.to_string());
    Sse::new(stream::once(async move { Ok(hello) })).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolResult;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

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
            json!({"type": "object"})
        }
        async fn execute(&self, args: Value) -> ToolResult {
            ToolResult::ok(args)
        }
    }

    use crate::tools::Tool;

    #[tokio::test]
    async fn lists_tools_under_their_wire_name() {
        let router = build_router("sofia", ToolRegistry::new(vec![Box::new(Echo)]));
        let response = router
            .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["tools"][0]["name"], "zena_echo");
    }

    #[tokio::test]
    async fn invoking_an_unknown_tool_reports_failure_not_a_5xx() {
        let router = build_router("sofia", ToolRegistry::new(vec![Box::new(Echo)]));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tools/zena_missing/invoke")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
    }
}

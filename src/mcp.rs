use crate::router::ToolRouter;
use anyhow::Result;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// JSON-RPC front of the [`ToolRouter`], shared by the stdio and HTTP
/// transports.
#[derive(Clone)]
pub struct McpServer {
    router: Arc<ToolRouter>,
}

impl McpServer {
    pub fn new(router: Arc<ToolRouter>) -> Self {
        Self { router }
    }

    /// Newline-delimited JSON-RPC over stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            debug!("Received: {}", input);

            if let Some(resp) = self.handle_message(input).await {
                let out = serde_json::to_string(&resp)?;
                stdout.write_all(out.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handles one raw message. `None` means nothing should be sent back.
    pub async fn handle_message(&self, input: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(input) {
            Ok(req) => self.respond(req).await,
            Err(e) => {
                error!("Failed to parse JSON-RPC: {}", e);
                Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ))
            }
        }
    }

    pub async fn respond(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = req.id.clone();
        let method = req.method.clone();
        let resp = self.handle_request(req).await;

        match id {
            Some(req_id) => Some(match resp {
                Ok(result) => JsonRpcResponse::success(Some(req_id), result),
                Err(e) => JsonRpcResponse::failure(Some(req_id), e),
            }),
            None => {
                // Notification, no response expected
                if let Err(e) = resp {
                    error!("Error handling notification {}: {}", method, e.message);
                }
                None
            }
        }
    }

    pub async fn handle_request(&self, req: JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match req.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {}
                }
            })),
            "notifications/initialized" => {
                info!("Client initialized");
                Ok(Value::Null)
            }
            method if method.starts_with("notifications/") => {
                debug!("Ignoring notification {}", method);
                Ok(Value::Null)
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({
                "tools": self.router.list_all_tools()
            })),
            "tools/call" => {
                let params = req
                    .params
                    .ok_or_else(|| JsonRpcError::new(INVALID_PARAMS, "Missing params for tools/call"))?;
                let name = params
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or_else(|| JsonRpcError::new(INVALID_PARAMS, "Missing tool name"))?;
                let args = params.get("arguments").cloned().unwrap_or(Value::Null);

                let result = self.router.route(name, args).await;
                Ok(json!({
                    "content": [{ "type": "text", "text": result.to_pretty_json() }],
                    "isError": result.is_error()
                }))
            }
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxmox::{ConnectionSettings, ProxmoxGateway};

    fn server() -> McpServer {
        let settings = ConnectionSettings {
            host: "pve.example".to_string(),
            port: 8006,
            user: "root@pam".to_string(),
            token_name: None,
            token_value: None,
            verify_ssl: false,
        };
        let gateway = Arc::new(ProxmoxGateway::new(settings));
        McpServer::new(Arc::new(ToolRouter::new(gateway)))
    }

    #[tokio::test]
    async fn test_initialize() {
        let resp = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "pve-mcp");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 30);
        assert_eq!(tools[0]["name"], "pve_node_list");
        assert_eq!(tools[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool_is_tool_level_error() {
        let resp = server()
            .handle_message(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"pve_foo_bar","arguments":{}}}"#,
            )
            .await
            .unwrap();
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload, json!({ "error": "Unknown tool: pve_foo_bar" }));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let resp = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let srv = server();

        let resp = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);

        let resp = srv
            .handle_message(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);

        let resp = srv.handle_message("{not json").await.unwrap();
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }
}

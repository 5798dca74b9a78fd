/// MCP Protocol Types and Request Routing
///
/// JSON-RPC 2.0 request/response structures, the tool result envelope, and
/// the method router shared by every transport. Transports only move bytes;
/// all protocol decisions happen in `McpServer::handle`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::core::registry::ToolRegistry;

/// MCP protocol revision reported from `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 request structure for MCP protocol.
///
/// An absent `id` marks a notification, which never gets a response. An
/// explicit `"id": null` is kept as `Some(Value::Null)` and is answered.
#[derive(Deserialize, Debug, Clone)]
pub struct MCPRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Only runs when the field is present, so `null` becomes `Some(Value::Null)`.
fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 response structure for MCP protocol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MCPResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MCPError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl MCPResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(MCPError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Tool descriptor as advertised by `tools/list`.
#[derive(Serialize, Debug, Clone)]
pub struct MCPTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One segment of a tool result. Only text content is produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Content::Text { text } => text,
        }
    }
}

/// Envelope returned for every `tools/call`, successful or not.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl CallToolResult {
    /// Successful result holding a single text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    /// Error envelope: one segment of the form `Error: <message>`.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![Content::text(format!("Error: {}", message))],
            is_error: true,
        }
    }

    /// All text segments joined by newlines.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parameters of a `tools/call` request.
#[derive(Deserialize, Debug)]
struct CallToolParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// Server identity reported from `initialize`.
#[derive(Serialize, Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Protocol endpoint: server identity plus the tool registry it serves.
///
/// Cloning is cheap; the registry is shared.
#[derive(Clone)]
pub struct McpServer {
    info: ServerInfo,
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(info: ServerInfo, registry: ToolRegistry) -> Self {
        Self {
            info,
            registry: Arc::new(registry),
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Route a request to its method handler.
    ///
    /// Returns `None` for notifications.
    pub async fn handle(&self, req: MCPRequest) -> Option<MCPResponse> {
        if req.id.is_none() {
            tracing::debug!(method = %req.method, "notification received");
            return None;
        }

        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(req.id),
            "ping" => MCPResponse::success(req.id, serde_json::json!({})),
            "tools/list" => self.handle_tools_list(req.id),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            _ => MCPResponse::error(
                req.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            ),
        };
        Some(response)
    }

    /// Parse one line of input and handle it.
    ///
    /// Malformed input yields a parse error response only when an `id` can be
    /// recovered from it.
    pub async fn handle_line(&self, line: &str) -> Option<MCPResponse> {
        match serde_json::from_str::<MCPRequest>(line) {
            Ok(req) => self.handle(req).await,
            Err(e) => {
                tracing::warn!(error = %e, "parse error");
                let id = serde_json::from_str::<Value>(line)
                    .ok()
                    .and_then(|partial| partial.get("id").cloned())?;
                Some(MCPResponse::error(
                    Some(id),
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ))
            }
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> MCPResponse {
        MCPResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": self.info
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> MCPResponse {
        MCPResponse::success(
            id,
            serde_json::json!({
                "tools": self.registry.tools()
            }),
        )
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> MCPResponse {
        let Some(params) = params else {
            return MCPResponse::error(id, INVALID_PARAMS, "Invalid params");
        };
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return MCPResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e));
            }
        };

        let arguments = params.arguments.unwrap_or_else(|| serde_json::json!({}));
        let result = self.registry.call(&params.name, arguments).await;

        match serde_json::to_value(&result) {
            Ok(value) => MCPResponse::success(id, value),
            Err(e) => MCPResponse::error(id, INTERNAL_ERROR, format!("Internal error: {}", e)),
        }
    }
}

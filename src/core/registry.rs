/// Tool Registry and Dispatcher
///
/// The registry keeps the advertised tool descriptors and their handlers
/// side by side, so the set of names returned by `tools/list` is exactly the
/// set `call` can dispatch. `call` is the single place where a failed tool
/// invocation is turned into an error envelope.

use futures_util::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;

use crate::core::error::ToolError;
use crate::core::protocol::{CallToolResult, MCPTool};
use crate::core::schema::{ObjectSchema, parse_args};

/// Future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, ToolError>>;

/// Tool handler function type definition.
///
/// Handlers take the raw JSON arguments and resolve to either a result
/// envelope or a `ToolError`. They must be Send + Sync so the registry can
/// be shared across HTTP worker threads.
pub type ToolHandler = Box<dyn Fn(Value) -> ToolFuture + Send + Sync>;

/// Registry of available MCP tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<MCPTool>,
    handlers: HashMap<String, ToolHandler>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with a raw handler.
    ///
    /// Registering a name twice replaces the earlier descriptor and handler
    /// while keeping its position in the listing.
    pub fn register(&mut self, tool: MCPTool, handler: ToolHandler) {
        let name = tool.name.clone();
        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
        self.handlers.insert(name, handler);
    }

    /// Register a tool whose arguments are validated against `schema` and
    /// deserialized into `A` before `handler` runs.
    pub fn register_typed<A, F, Fut>(
        &mut self,
        name: &str,
        description: &str,
        schema: ObjectSchema,
        handler: F,
    ) where
        A: DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
    {
        let tool = MCPTool {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: schema.to_json(),
        };

        let handler: ToolHandler = Box::new(move |args: Value| -> ToolFuture {
            match parse_args::<A>(&schema, &args) {
                Ok(parsed) => handler(parsed).boxed(),
                Err(e) => async move { Err::<CallToolResult, ToolError>(e) }.boxed(),
            }
        });

        self.register(tool, handler);
    }

    /// Descriptors in registration order.
    pub fn tools(&self) -> &[MCPTool] {
        &self.tools
    }

    /// Names the dispatcher recognizes.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Invoke a tool by name, always producing an envelope.
    pub async fn call(&self, name: &str, arguments: Value) -> CallToolResult {
        let outcome = match self.handlers.get(name) {
            Some(handler) => handler(arguments).await,
            None => Err(ToolError::UnknownTool(name.to_string())),
        };

        match outcome {
            Ok(result) => {
                tracing::debug!(tool = name, "tool call succeeded");
                result
            }
            Err(e) => {
                tracing::info!(tool = name, error = %e, "tool call failed");
                CallToolResult::error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldKind;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct ShoutArgs {
        word: String,
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register_typed(
            "shout",
            "Uppercase a word",
            ObjectSchema::new().required("word", FieldKind::String { exact_len: None }, "Word"),
            |args: ShoutArgs| async move {
                if args.word.is_empty() {
                    return Err(ToolError::domain("nothing to shout"));
                }
                Ok(CallToolResult::text(args.word.to_uppercase()))
            },
        );
        registry
    }

    #[tokio::test]
    async fn dispatches_to_handler() {
        let result = registry().call("shout", json!({ "word": "hey" })).await;
        assert!(!result.is_error);
        assert_eq!(result.joined_text(), "HEY");
    }

    #[tokio::test]
    async fn validation_failure_becomes_error_envelope() {
        let result = registry().call("shout", json!({ "word": 3 })).await;
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Error: Invalid arguments: word: expected string, got number");
    }

    #[tokio::test]
    async fn handler_failure_becomes_error_envelope() {
        let result = registry().call("shout", json!({ "word": "" })).await;
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Error: nothing to shout");
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_envelope() {
        let result = registry().call("whisper", json!({})).await;
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Error: Unknown tool: whisper");
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = registry();
        registry.register(
            MCPTool {
                name: "shout".to_string(),
                description: "Louder".to_string(),
                input_schema: json!({ "type": "object", "properties": {} }),
            },
            Box::new(|_: Value| -> ToolFuture { async { Ok(CallToolResult::text("!")) }.boxed() }),
        );
        assert_eq!(registry.tools().len(), 1);
        assert_eq!(registry.tools()[0].description, "Louder");
        assert_eq!(registry.names(), vec!["shout"]);
    }
}

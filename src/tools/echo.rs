/// Echo Tool Implementation
///
/// Returns the caller's message verbatim behind a fixed prefix.

use serde::Deserialize;

use crate::core::error::ToolError;
use crate::core::protocol::CallToolResult;
use crate::core::registry::ToolRegistry;
use crate::core::schema::{FieldKind, ObjectSchema};

pub const NAME: &str = "echo";

#[derive(Debug, Deserialize)]
struct EchoArgs {
    message: String,
}

pub fn schema() -> ObjectSchema {
    ObjectSchema::new().required(
        "message",
        FieldKind::String { exact_len: None },
        "The message to echo back",
    )
}

async fn echo(args: EchoArgs) -> Result<CallToolResult, ToolError> {
    Ok(CallToolResult::text(format!("Echo: {}", args.message)))
}

/// Register the echo tool with the tool registry.
pub fn register(registry: &mut ToolRegistry) {
    registry.register_typed(NAME, "Echo back the provided message", schema(), echo);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        register(&mut registry);
        registry
    }

    #[tokio::test]
    async fn echoes_message() {
        let result = registry().call(NAME, json!({ "message": "hello world" })).await;
        assert!(!result.is_error);
        assert_eq!(result.joined_text(), "Echo: hello world");
    }

    #[tokio::test]
    async fn keeps_message_verbatim() {
        let message = "  tabs\tand \"quotes\" and ünïcode  ";
        let result = registry().call(NAME, json!({ "message": message })).await;
        assert!(result.joined_text().contains(message));
    }

    #[tokio::test]
    async fn rejects_non_string_message() {
        let result = registry().call(NAME, json!({ "message": 42 })).await;
        assert!(result.is_error);
    }
}

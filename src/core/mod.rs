/// Core Server Framework Module
///
/// - config.rs: environment-driven configuration
/// - error.rs: tool-call and startup error types
/// - logging.rs: stderr tracing setup
/// - protocol.rs: JSON-RPC types and method routing
/// - registry.rs: tool registry and dispatcher
/// - schema.rs: argument schemas and validation
/// - server.rs: STDIO/HTTP transports and process lifecycle

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod server;

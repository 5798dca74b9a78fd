/// Error Types
///
/// Two families of errors exist. `ToolError` covers everything that can go
/// wrong inside a single tool call; it never escapes the dispatcher and is
/// always rendered into an error envelope. `ServerError` covers startup and
/// transport failures, which are fatal to the process.

use thiserror::Error;

/// Failure of a single tool call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Caller-supplied arguments do not match the tool's declared shape.
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// No tool with this name is registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Business-rule violation raised by a handler (e.g. division by zero).
    #[error("{0}")]
    Domain(String),
}

impl ToolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }
}

/// Fatal failure while starting or running a transport.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid configuration taken from the environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading stdin, writing stdout or binding a socket failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The outbound HTTP client could not be built.
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

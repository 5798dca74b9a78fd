/// MCP Server Transports and Lifecycle
///
/// This module wires an `McpServer` to the outside world:
/// - STDIO transport: newline-delimited JSON-RPC on stdin/stdout
/// - HTTP transport (optional): JSON-RPC over POST with Actix Web
/// - Process lifecycle: startup, signal-driven shutdown and exit codes
///
/// All diagnostics go to stderr; stdout is reserved for protocol frames.

use actix_web::{
    App, HttpResponse, HttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;
use std::borrow::Cow;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, Stdin, Stdout,
};
use tokio::runtime::Runtime;

use crate::core::config::{HttpConfig, ServerConfig, TransportMode};
use crate::core::error::ServerError;
use crate::core::logging;
use crate::core::protocol::{MCPRequest, MCPResponse, McpServer};
use crate::core::registry::ToolRegistry;

/// Line-oriented transport over a reader/writer pair.
///
/// In production this owns stdin and stdout. The transport is the single
/// handle to the connection: `serve` drives it and `close` tears it down.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: BufWriter<W>,
}

impl StdioTransport<Stdin, Stdout> {
    /// Open the process's standard streams with 8KB buffers.
    pub fn open() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::with_capacity(8192, reader),
            writer: BufWriter::with_capacity(8192, writer),
        }
    }

    /// Process requests one at a time until EOF or until `shutdown` resolves.
    ///
    /// A request that is already being handled runs to completion before the
    /// shutdown is observed. Lines that are not valid UTF-8 are decoded lossily
    /// and answered like any other malformed input.
    pub async fn serve<S>(&mut self, server: &McpServer, shutdown: S) -> std::io::Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received");
                    break;
                }
                read = self.reader.read_until(b'\n', &mut buf) => read?,
            };

            if read == 0 {
                tracing::info!("stdin closed");
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                tracing::warn!("input line is not valid UTF-8");
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(response) = server.handle_line(line).await else {
                continue;
            };
            if let Err(e) = self.send(&response).await {
                // The client is gone; nothing left to answer.
                tracing::error!(error = %e, "error writing to stdout");
                break;
            }
        }

        Ok(())
    }

    async fn send(&mut self, response: &MCPResponse) -> std::io::Result<()> {
        let json = match serde_json::to_string(response) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "error serializing response");
                return Ok(());
            }
        };
        // One response per line, flushed immediately
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Flush pending output and release the streams.
    pub async fn close(mut self) -> std::io::Result<W> {
        self.writer.flush().await?;
        Ok(self.writer.into_inner())
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Run the MCP server in STDIO mode until EOF or a termination signal.
pub async fn run_server_stdio(server: McpServer) -> Result<(), ServerError> {
    let mut transport = StdioTransport::open();
    tracing::info!(
        name = %server.info().name,
        version = %server.info().version,
        "{} running on stdio",
        server.info().name
    );

    transport.serve(&server, shutdown_signal()).await?;
    transport.close().await?;

    tracing::info!("stdio transport closed");
    Ok(())
}

/// Health check endpoint handler.
async fn health(server: web::Data<McpServer>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": server.info().name
    }))
}

/// MCP JSON-RPC request handler for HTTP mode.
///
/// Notifications are acknowledged with `202 Accepted` and an empty body.
async fn mcp_handler(server: web::Data<McpServer>, req: web::Json<MCPRequest>) -> HttpResponse {
    match server.handle(req.into_inner()).await {
        Some(response) => HttpResponse::Ok().json(response),
        None => HttpResponse::Accepted().finish(),
    }
}

/// Register the HTTP routes. The app must carry `web::Data<McpServer>`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/mcp", web::post().to(mcp_handler))
        .route("/", web::post().to(mcp_handler))
        .route("/", web::get().to(health));
}

/// Run the MCP server in HTTP mode.
///
/// Actix Web installs its own SIGINT/SIGTERM handling and drains in-flight
/// requests before returning.
pub async fn run_server_http(server: McpServer, config: &HttpConfig) -> Result<(), ServerError> {
    let bind_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        name = %server.info().name,
        bind = %bind_addr,
        workers = config.workers,
        "{} running on http",
        server.info().name
    );

    let data = web::Data::new(server);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY")),
            )
            .wrap(Logger::new("%r %s %Dms"))
            .configure(configure_routes)
    })
    .workers(config.workers)
    .max_connections(10000)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}

/// Serve `server` on the transports selected by `config`.
pub async fn run(config: &ServerConfig, server: McpServer) -> Result<(), ServerError> {
    match config.transport {
        TransportMode::Stdio => run_server_stdio(server).await,
        TransportMode::Http => run_server_http(server, &config.http).await,
        TransportMode::Both => {
            let stdio_server = server.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = run_server_stdio(stdio_server).await {
                    tracing::error!(error = %e, "stdio server error");
                }
            });

            let http_result = run_server_http(server, &config.http).await;

            // If HTTP server exits, stop serving stdio as well
            stdio_handle.abort();

            http_result
        }
    }
}

/// Blocking entry point for the server binaries.
///
/// Builds the multi-threaded runtime, runs [`main_entry`] on it, then shuts
/// the runtime down without waiting for blocking tasks. The stdin reader is
/// parked in a blocking read that cannot be cancelled.
pub fn run_main<F>(default_name: &str, default_version: &str, build_registry: F) -> ExitCode
where
    F: FnOnce(&ServerConfig) -> Result<ToolRegistry, ServerError>,
{
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            logging::init_tracing();
            tracing::error!(error = %e, "failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(main_entry(default_name, default_version, build_registry));
    runtime.shutdown_background();
    code
}

fn build_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Async body shared by every server variant.
///
/// Loads configuration, builds the registry, and serves until shutdown.
/// Any startup or transport failure is logged and mapped to exit code 1.
pub async fn main_entry<F>(default_name: &str, default_version: &str, build_registry: F) -> ExitCode
where
    F: FnOnce(&ServerConfig) -> Result<ToolRegistry, ServerError>,
{
    logging::init_tracing();

    let result = async {
        let config = ServerConfig::from_env(default_name, default_version)?;
        let registry = build_registry(&config)?;
        let server = McpServer::new(config.info.clone(), registry);
        run(&config, server).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error in main");
            ExitCode::FAILURE
        }
    }
}

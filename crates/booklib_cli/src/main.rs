//! `booklib` entry point.
//!
//! Starts the book library MCP server on the chosen transport and runs until
//! the transport closes or the process receives Ctrl-C.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use booklib_core::{default_log_level, init_logging, GatewayConfig, LibraryGateway};
use booklib_mcp::{serve_stdio, McpHandler, SseServer};
use clap::{Parser, ValueEnum};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ServerType {
    Sse,
    Stdio,
}

impl ServerType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Sse => "sse",
            Self::Stdio => "stdio",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "booklib", version, about = "Book library tools over MCP, backed by SQLite")]
struct Cli {
    /// Transport to serve on.
    #[arg(long = "server-type", alias = "server_type", value_enum, default_value_t = ServerType::Sse)]
    server_type: ServerType,

    /// Store file; overrides BOOKLIB_DB_PATH.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Address the SSE transport listens on.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    #[arg(long, default_value_t = 8000)]
    port: u16,

    #[arg(long)]
    log_level: Option<String>,

    /// Write rotating log files here instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the stdio transport.
    eprintln!("📚 Starting Book Library MCP server...");

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = cli.log_dir.as_deref().map(absolute_dir).transpose()?;
    let log_dir = log_dir
        .as_deref()
        .map(|dir| {
            dir.to_str()
                .ok_or_else(|| anyhow!("log dir is not valid UTF-8: {}", dir.display()))
        })
        .transpose()?;
    init_logging(level, log_dir).map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    let server_type = cli.server_type;
    let addr = SocketAddr::new(cli.host, cli.port);
    let mut config = GatewayConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    info!(
        "event=cli_start module=cli transport={} db_path={} busy_timeout_ms={}",
        server_type.as_str(),
        config.db_path.display(),
        config.busy_timeout.as_millis()
    );
    let handler = McpHandler::library(LibraryGateway::new(config));

    let served = async move {
        match server_type {
            ServerType::Stdio => serve_stdio(handler).await.context("stdio transport failed"),
            ServerType::Sse => SseServer::new(handler, addr)
                .run()
                .await
                .context("sse transport failed"),
        }
    };

    tokio::select! {
        result = served => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("event=cli_stop module=cli reason=ctrl_c");
        }
    }

    Ok(())
}

fn absolute_dir(dir: &std::path::Path) -> anyhow::Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(dir))
}

//! Toolhost MCP Server
//!
//! Run with: toolhost-server

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use toolhost::config::{DEFAULT_MAX_COMMAND_TIMEOUT_SECS, DEFAULT_SERVER_NAME, DEFAULT_SHELL};
use toolhost::mcp::{McpServer, ToolhostHandler};
use toolhost::{build_registry, Dispatcher, ServerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "toolhost-server", version)]
#[command(about = "MCP server exposing local tools, resources and prompts over stdio")]
struct Args {
    /// Server name reported to clients
    #[arg(long, env = "TOOLHOST_SERVER_NAME", default_value = DEFAULT_SERVER_NAME)]
    name: String,

    /// Shell used by execute_command
    #[arg(long, env = "TOOLHOST_SHELL", default_value = DEFAULT_SHELL)]
    shell: String,

    /// Upper bound for execute_command timeouts, in seconds
    #[arg(long, env = "TOOLHOST_MAX_COMMAND_TIMEOUT", default_value_t = DEFAULT_MAX_COMMAND_TIMEOUT_SECS)]
    max_command_timeout: f64,

    /// Do not expose execute_command
    #[arg(long, env = "TOOLHOST_DISABLE_EXEC")]
    disable_exec: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "TOOLHOST_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            server_name: self.name.clone(),
            shell: self.shell.clone(),
            max_command_timeout_secs: self.max_command_timeout,
            enable_exec: !self.disable_exec,
        }
    }
}

fn init_logging(format: LogFormat) {
    // stdout is reserved for the protocol
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);

    let config = args.server_config();
    let registry = build_registry(&config).context("failed to build capability registry")?;

    let handler = ToolhostHandler::new(Dispatcher::new(registry), config);
    let server = McpServer::new(handler);

    tracing::info!("Toolhost MCP server starting...");
    server.run().context("transport failure")?;
    tracing::info!("Toolhost MCP server stopped");

    Ok(())
}

//! btt-mcp - MCP server for BetterTouchTool
//!
//! This binary serves BetterTouchTool tools over stdio to MCP clients such as
//! Claude Desktop.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use btt_mcp::config::{ConnectionConfig, DEFAULT_BTT_HOST, DEFAULT_BTT_PORT};
use btt_mcp::reference::{default_docs_dir, ReferenceIndex};
use btt_mcp::{Dispatcher, McpServer, ToolContext, ToolRegistry};

/// MCP server for BetterTouchTool automation.
#[derive(Parser, Debug)]
#[command(name = "btt-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// BTT webserver host.
    #[arg(long, env = "BTT_HOST", default_value = DEFAULT_BTT_HOST)]
    host: String,

    /// BTT webserver port.
    #[arg(long, env = "BTT_PORT", default_value_t = DEFAULT_BTT_PORT,
          value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Shared secret configured in BTT's webserver settings.
    #[arg(long, env = "BTT_SHARED_SECRET", hide_env_values = true)]
    shared_secret: Option<String>,

    /// Talk to BTT through bttcli instead of the webserver.
    #[arg(long, env = "BTT_USE_CLI")]
    use_cli: bool,

    /// Path to the bttcli executable.
    #[arg(long, env = "BTT_CLI_PATH")]
    bttcli_path: Option<PathBuf>,

    /// Directory holding the reference docs.
    #[arg(long, env = "BTT_MCP_DOCS_DIR")]
    docs_dir: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Log output file (default: stderr).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Never stdout: it carries the protocol.
    let (writer, ansi) = match &args.log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if args.log_json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
    Ok(())
}

fn build_server(args: Args) -> anyhow::Result<McpServer> {
    let connection = ConnectionConfig {
        host: args.host.trim().to_string(),
        port: args.port,
        shared_secret: args.shared_secret,
        use_cli: args.use_cli,
    };

    let mut dispatcher = Dispatcher::new();
    if let Some(path) = args.bttcli_path {
        dispatcher = dispatcher.with_bttcli_path(path);
    }

    let docs_dir = args.docs_dir.unwrap_or_else(default_docs_dir);
    let reference = ReferenceIndex::new(docs_dir.clone())
        .with_context(|| format!("building reference index for {}", docs_dir.display()))?;
    if !reference.docs_dir().is_dir() {
        tracing::warn!(
            "Reference docs directory {} does not exist; lookups will return the catalog only",
            reference.docs_dir().display()
        );
    }

    if connection.use_cli {
        tracing::info!("Using bttcli transport");
    } else {
        tracing::info!("Using BTT webserver at {}", connection.address());
    }
    tracing::info!("Reference docs: {}", reference.docs_dir().display());

    let tools = ToolRegistry::new(ToolContext::new(connection, dispatcher, reference));
    tracing::info!("Registered {} tools", tools.len());

    Ok(McpServer::new(tools))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("btt-mcp: {:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        "Starting {} v{}",
        btt_mcp::server::SERVER_NAME,
        btt_mcp::server::SERVER_VERSION
    );

    let server = match build_server(args) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match server.run_stdio().await {
        Ok(()) => {
            tracing::info!("Server exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Gemini Image MCP Server
//!
//! MCP server for image generation, editing and description using Gemini image models.

use anyhow::Result;
use clap::Parser;
use gemini_image_mcp::ImageServer;
use gemini_image_mcp_common::{Config, McpServerBuilder, TransportArgs};

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "gemini-image-mcp")]
#[command(about = "MCP server for image generation and editing using Gemini image models")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    gemini_image_mcp_common::tracing::init_tracing(
        gemini_image_mcp_common::tracing::DEFAULT_LOG_LEVEL,
    );

    tracing::info!("gemini-image-mcp server starting...");

    let args = Args::parse();

    // A missing API key is fatal
    let config = Config::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        "Configuration loaded"
    );

    let server = ImageServer::new(config);
    let bind_ip = args.transport.host;

    McpServerBuilder::new(server)
        .with_bind_ip(bind_ip)
        .with_transport(args.transport.into_transport())
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

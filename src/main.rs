//! Gmail MCP server binary
//!
//! Speaks MCP over stdio. The OAuth2 access token comes from the external
//! credential provider via GMAIL_ACCESS_TOKEN; this process never acquires
//! or refreshes tokens itself.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gmail_mcp::config::{Config, TOKEN_ENV_VAR};
use gmail_mcp::gmail::registry::Registry;
use gmail_mcp::gmail::transport::HttpTransport;
use gmail_mcp::mcp::dispatch::Dispatcher;
use gmail_mcp::mcp::server::McpServer;

/// Gmail MCP server
#[derive(Parser)]
#[command(name = "gmail-mcp")]
#[command(author, version, about = "MCP server exposing the Gmail REST API as callable tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tool surface and exit
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), gmail_mcp::error::ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let registry = Registry::new();

    if let Some(Commands::Tools) = cli.command {
        for descriptor in registry.iter() {
            println!(
                "{:<24} {:<6} {}",
                descriptor.name, descriptor.method, descriptor.path
            );
        }
        return Ok(());
    }

    if config.bearer_token().is_none() {
        tracing::warn!(
            "{} is not set; tool calls will fail until the credential provider supplies a token",
            TOKEN_ENV_VAR
        );
    }

    let transport = match HttpTransport::new(&config) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            eprintln!("Error: failed to build HTTP transport: {e}");
            std::process::exit(1);
        }
    };

    let dispatcher = Dispatcher::new(registry, transport);
    let server = McpServer::new(dispatcher, config);
    server.run_stdio().await?;

    Ok(())
}

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{error, info, warn};
use pve_mcp::cli::{Args, Commands};
use pve_mcp::http;
use pve_mcp::logging::{self, LogOptions};
use pve_mcp::mcp::McpServer;
use pve_mcp::proxmox::ProxmoxGateway;
use pve_mcp::router::ToolRouter;
use pve_mcp::settings::{ServerType, Settings};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(Commands::Completions { shell }) = &args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let _guard = match LogOptions::from_args(&args).and_then(|opts| logging::init(&opts)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut settings =
        Settings::new(args.config.as_deref()).context("Failed to load configuration")?;
    settings.apply_args(&args);
    settings
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Configuration error")?;

    let connection = settings.connection();
    info!(
        "Proxmox endpoint {}:{} as {}",
        connection.host, connection.port, connection.user
    );
    if !settings.has_api_token() {
        warn!("No API token configured; tool calls will fail until PROXMOX_TOKEN_NAME and PROXMOX_TOKEN_VALUE are set");
    }

    // The backend connection opens on the first tool call.
    let gateway = Arc::new(ProxmoxGateway::new(connection));
    let router = Arc::new(ToolRouter::new(gateway));
    info!("Registered {} tools", router.list_all_tools().len());
    let server = McpServer::new(router);

    let server_type = settings.server_type().map_err(anyhow::Error::msg)?;
    info!("Starting MCP Server ({} transport)...", server_type);
    match server_type {
        ServerType::Stdio => server.run_stdio().await,
        ServerType::Http => {
            http::serve(server, &settings.http_addr(), settings.http_auth_token()).await
        }
    }
}

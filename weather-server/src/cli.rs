use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use weather_core::{Config, WeatherService};
use weather_server::{AppState, build_app, routes::missing_frontend};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather proxy server")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Address to bind; overrides HOST.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on; overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Interactively store the OpenWeather API key and port in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve {
            host: None,
            port: None,
        }) {
            Command::Serve { host, port } => serve(self.config, host, port).await,
            Command::Configure => configure(self.config),
        }
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    if !config.has_api_key() {
        warn!("OPENWEATHER_API_KEY not set. Run `weather-server configure` or export it.");
    }
    let weather = WeatherService::from_config(&config)?;

    info!(static_dir = %config.server.static_dir.display(), "Static files path");
    if let Some(index) = missing_frontend(&config.server.static_dir) {
        warn!(
            index = %index.display(),
            "Frontend not found; non-API paths will return 404. Set STATIC_DIR to the public/ directory."
        );
    }
    info!(
        environment = if config.server.production { "production" } else { "development" },
        "Environment"
    );

    let state = AppState::new(weather, !config.server.production);
    let app = build_app(state, &config.server.static_dir, &config.allowed_origins());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Weather server running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Process terminated");
    Ok(())
}

fn configure(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::load(config_path.as_deref())?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let port = CustomType::<u16>::new("Port to listen on:")
        .with_default(config.server.port)
        .prompt()
        .context("Failed to read port")?;

    config.openweather.api_key = api_key.trim().to_string();
    config.server.port = port;

    let path = config.save(config_path.as_deref())?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received. Shutting down gracefully..."),
        () = terminate => info!("SIGTERM received. Shutting down gracefully..."),
    }
}

mod auth;
mod config;
mod converters;
mod gemini_client;
mod logging;
mod models;
mod recognition;
mod request_id;
mod router;

use clap::Parser;
use config::Config;
use notify::{EventKind, RecursiveMode, Watcher};
use router::AppState;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "gemini-relay")]
#[command(about = "Chat-to-Gemini function adapter")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Path to YAML config file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Also write logs to this file (capped at 10 MiB)
    #[arg(long)]
    log_file: Option<String>,

    /// socks and http proxy, example: socks5://192.168.0.2:10080
    #[arg(long)]
    proxy: Option<String>,
}

/// Swap in the config at `config_path`; a file that fails to load leaves the current one in place.
async fn reload_config(config_path: &str, config: &RwLock<Arc<Config>>) -> bool {
    match Config::from_file(config_path) {
        Ok(new_config) => {
            *config.write().await = Arc::new(new_config);
            info!("Configuration reloaded successfully");
            true
        }
        Err(e) => {
            error!("Failed to reload configuration, keeping previous: {}", e);
            false
        }
    }
}

async fn watch_config_file(config_path: &str, config: &Arc<RwLock<Arc<Config>>>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel(100);

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            if let Err(e) = tx.blocking_send(event) {
                eprintln!("Failed to send event: {}", e);
            }
        }
    })?;

    watcher.watch(Path::new(config_path), RecursiveMode::NonRecursive)?;

    while let Some(event) = rx.recv().await {
        if let EventKind::Modify(_) = event.kind {
            info!("Config file modified, attempting to reload");
            reload_config(config_path, config).await;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    logging::init_logging(log_level, args.log_file.as_deref());

    let initial_config = match &args.config {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!("Configuration loaded successfully from: {}", path);
            config
        }
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };
    if initial_config.speech.is_some() {
        info!("Speech transcription enabled");
    }
    if initial_config.vision.is_some() {
        info!("Image labeling enabled");
    }
    let config = Arc::new(RwLock::new(Arc::new(initial_config)));

    if let Some(path) = args.config.clone() {
        let config_for_watcher = config.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_config_file(&path, &config_for_watcher).await {
                warn!("Config file watcher error: {}", e);
            }
        });
    }

    let client_builder = reqwest::Client::builder();
    let client_builder = match &args.proxy {
        Some(proxy) => client_builder.proxy(reqwest::Proxy::all(proxy)?),
        None => client_builder,
    };
    let http_client = Arc::new(client_builder.build()?);

    let app_state = AppState {
        config,
        gemini_client: Arc::new(gemini_client::GeminiClient::new(http_client)),
    };

    let app = router::app(app_state);

    let bind_address = format!("{}:{}", args.ip, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server started on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

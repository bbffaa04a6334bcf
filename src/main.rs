//! Storefront edge (v1)
//!
//! Sits in front of the storefront renderer and decides, per request,
//! whether to redirect to login, redirect to a locale-prefixed path, answer
//! 404, or render.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ request id ─▶ trace ─▶ edge middleware ─┬─▶ 307 /{locale}/login
//!                                           │               ├─▶ 307 /{locale}{path}
//!                                           │               ├─▶ 404
//!                                           ▼               │
//!                                     auth gate             └─▶ render ─▶ upstream renderer
//!                                     locale resolver                     (or page descriptor)
//!
//!   config file ─▶ watcher ─▶ validated EdgeConfig ─▶ atomic router swap
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use storefront_edge::config::loader::load_config;
use storefront_edge::config::watcher::ConfigWatcher;
use storefront_edge::lifecycle::wait_for_signal;
use storefront_edge::observability::{logging, metrics};
use storefront_edge::{EdgeConfig, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "storefront-edge")]
#[command(about = "Locale and session gate for the storefront", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the configuration file when it changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("storefront-edge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        locales = ?config.locales.supported,
        default_locale = %config.locales.default,
        protected = ?config.auth.protected_prefixes,
        upstream = ?config.upstream.url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signals = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signals.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

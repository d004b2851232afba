//! NetSentinel HTTP Server
//!
//! Main entry point for the safe-search API server.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use application::{
    HealthService, HistoryPort, ImageProcessingPort, MediaFetchPort, MediaProxyService,
    ModerationGate, NudityDetectorPort, SearchProviderPort, SearchService, SettingsPort,
};
use axum::http::{HeaderValue, Method};
use clap::Parser;
use infrastructure::{
    AppConfig, CensorImageProcessor, ConfigSettingsStore, HttpMediaFetcher, InMemoryHistoryStore,
    LazyNudityDetector, WebSearchAdapter, init_telemetry,
};
use presentation_http::{
    ReloadableConfig, error::set_expose_internal_errors, routes, spawn_config_reload_handler,
    state::AppState,
};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Safe-search mediation server
#[derive(Debug, Parser)]
#[command(name = "netsentinel-server", version, about)]
struct Cli {
    /// Configuration file (default: ./config.* when present)
    #[arg(short, long, env = "NETSENTINEL_CONFIG_FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_validated(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_telemetry(&config.telemetry())?;
    set_expose_internal_errors(!config.is_production());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        provider = %config.search.provider,
        detector = %config.moderation.vision.backend,
        default_mode = %config.safe_search.default_mode,
        "NetSentinel starting"
    );

    let settings = Arc::new(ConfigSettingsStore::from_config(&config.safe_search));
    let reloadable = spawn_config_reload_handler(
        ReloadableConfig::new(config.clone(), Arc::clone(&settings)).with_path(cli.config.clone()),
    );
    let state = build_state(&config, settings, reloadable)?;

    let app = routes::create_router(state)
        .layer(RequestBodyLimitLayer::new(
            config.server.max_body_size_json_bytes,
        ))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));
    info!(timeout = ?shutdown_timeout, "Draining connections");
    shutdown_tx.send(()).ok();

    match tokio::time::timeout(shutdown_timeout, &mut server).await {
        Ok(result) => result??,
        Err(_) => warn!("Connections still open after shutdown timeout, exiting"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wire adapters into services
fn build_state(
    config: &AppConfig,
    settings: Arc<ConfigSettingsStore>,
    reloadable: ReloadableConfig,
) -> anyhow::Result<AppState> {
    let provider: Arc<dyn SearchProviderPort> = Arc::new(
        WebSearchAdapter::new(config.search.clone())
            .context("Failed to initialize search provider")?,
    );
    let history: Arc<dyn HistoryPort> = Arc::new(InMemoryHistoryStore::new());
    let detector: Arc<dyn NudityDetectorPort> =
        Arc::new(LazyNudityDetector::new(config.moderation.vision.clone()));
    let processor: Arc<dyn ImageProcessingPort> =
        Arc::new(CensorImageProcessor::from_config(&config.moderation.vision));
    let fetcher: Arc<dyn MediaFetchPort> = Arc::new(
        HttpMediaFetcher::new(&config.media).context("Failed to initialize media fetcher")?,
    );
    let settings: Arc<dyn SettingsPort> = settings;

    let gate = Arc::new(ModerationGate::new(
        Arc::clone(&detector),
        Arc::clone(&processor),
        config.moderation.thresholds()?,
    ));

    Ok(AppState {
        search_service: Arc::new(SearchService::new(
            Arc::clone(&provider),
            Arc::clone(&settings),
            history,
        )),
        media_proxy: Arc::new(MediaProxyService::new(
            fetcher,
            settings,
            processor,
            gate,
        )),
        health_service: Arc::new(HealthService::new(provider, detector)),
        config: reloadable,
    })
}

/// CORS from `server.allowed_origins`
///
/// An empty list allows any origin in development and none in production.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.server.allowed_origins;
    if origins.is_empty() && !config.is_production() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

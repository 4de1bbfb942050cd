/// Server setup and initialization
///
/// Wires together all components: listing cache, API gateway, uploader, notification log,
/// form registries and HTTP routes. Provides the main application factory for the Axum app.

use crate::{
    api::{create_admin_routes, AppState},
    cache::ListingCache,
    config::Config,
    form::{FormContext, FormRegistry},
    gateway::ApiGateway,
    notify::NotificationLog,
    upload::HttpObjectStorage,
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Builds the shared HTTP client, the gateway (revalidating the listing cache after
/// mutations), the object storage uploader and one form registry per record kind.
pub fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🗂️ Initializing admin listing cache");
    let cache = Arc::new(ListingCache::new());

    tracing::info!("🌐 Initializing API gateway for {}", config.api.base_url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    let gateway = ApiGateway::with_client(client.clone(), &config.api.base_url, cache.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize API gateway: {}", e))?;

    tracing::info!("📦 Initializing object storage uploader: {}", config.storage.upload_url);
    let uploader = HttpObjectStorage::new(client, &config.storage.upload_url)
        .map_err(|e| anyhow::anyhow!("Failed to initialize uploader: {}", e))?;

    let notifications = Arc::new(NotificationLog::new());
    let ctx = FormContext {
        gateway: gateway.clone(),
        uploader: Arc::new(uploader),
        notifier: notifications.clone(),
    };

    tracing::info!("📝 Creating form registries");
    let app_state = AppState {
        gateway,
        cache,
        notifications,
        blogs: Arc::new(FormRegistry::new(ctx.clone())),
        categories: Arc::new(FormRegistry::new(ctx.clone())),
        projects: Arc::new(FormRegistry::new(ctx)),
    };

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Admin reads and form actions
        .merge(create_admin_routes().with_state(app_state));

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting folio admin server...");

    let app = create_app(config.clone())?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}

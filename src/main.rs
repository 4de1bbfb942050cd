/// folio-admin: content-management service for a personal portfolio
///
/// Main entry point. Initializes configuration and starts the HTTP server exposing the
/// admin actions (cached reads, form submissions, image uploads, deletions).

use folio_admin::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Admin data reads at /admin/{blog,categories,projects}[/{id}]
/// - Form actions (PATCH/POST/DELETE) on the same paths
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (FOLIO_* environment variables, local defaults otherwise)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}

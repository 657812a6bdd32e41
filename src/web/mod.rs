//! Web server, REST API, and WebSocket endpoints.

pub mod config;
pub mod handlers;
pub mod router;
pub mod websocket;

// Re-export commonly used items
pub use config::ServerConfig;
pub use router::create_app;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::exec::{CommandExecutor, ProcessExecutor};
use crate::gpio::{self, PinDriver};

/// Shared providers handed to every handler.
///
/// The executor and pin driver are process-wide singletons; neither layer
/// serializes access on its own.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn CommandExecutor>,
    pub pins: Arc<dyn PinDriver>,
}

impl AppState {
    /// State backed by the real subprocess executor and the best available
    /// pin driver.
    pub fn new() -> Self {
        Self::with_providers(Arc::new(ProcessExecutor), gpio::default_driver())
    }

    /// State with explicit providers, used by tests and embedders.
    pub fn with_providers(executor: Arc<dyn CommandExecutor>, pins: Arc<dyn PinDriver>) -> Self {
        Self { executor, pins }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the web server with the provided configuration and state.
pub async fn start_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_app(&config, state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!("Starting Pi Vitals server on http://{}", addr);
    info!("REST endpoint: http://{}/system", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Web application router and middleware setup.

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::config::ServerConfig;
use crate::web::{handlers, websocket, AppState};

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &ServerConfig, state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        // Telemetry routes
        .route("/system", get(handlers::get_system))
        .route("/system/platform", get(handlers::get_platform))
        .route("/system/temperature", get(handlers::get_temperature))
        .route("/system/throttle", get(handlers::get_throttle))
        .route("/system/uptime", get(handlers::get_uptime))
        .route("/system/frequency", get(handlers::get_frequency))
        .route("/system/memory", get(handlers::get_memory))
        // Pin routes
        .route("/pins", get(handlers::get_pin_configurations))
        .route(
            "/pins/:bcm_id",
            get(handlers::get_pin_configuration).put(handlers::put_pin_configuration),
        )
        // WebSocket route
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::{health, readings};
use crate::api::handlers::readings::ReadingService;
use crate::config::ApiConfig;
use crate::openapi::configure_swagger_routes;
use bp_tracker_domain::health::HealthServiceTrait;
use std::sync::Arc;

/// Create the application router with the default services
pub fn create_app(config: &ApiConfig) -> Router {
    let service = readings::create_service(config.backup_path.clone());
    let health_service = health::create_health_service();

    create_router(service, health_service, config.enable_cors)
}

/// Build the router around the given services
pub fn create_router(
    service: ReadingService,
    health_service: Arc<dyn HealthServiceTrait + Send + Sync>,
    enable_cors: bool,
) -> Router {
    debug!("Creating application router");

    // Fixed paths come before the parametrized one
    let api_routes = Router::new()
        .route(
            "/readings",
            get(readings::list_readings)
                .post(readings::create_reading)
                .delete(readings::clear_readings),
        )
        .route("/readings/sort", post(readings::sort_readings))
        .route("/readings/aggregated", get(readings::get_aggregated_readings))
        .route("/readings/statistics", get(readings::get_statistics))
        .route("/readings/export/json", get(readings::export_json))
        .route("/readings/export/text", get(readings::export_text))
        .route("/readings/import/json", post(readings::import_json))
        .route("/readings/import/text", post(readings::import_text))
        .route(
            "/readings/:id",
            get(readings::get_reading).delete(readings::delete_reading),
        )
        .with_state(service);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .merge(configure_swagger_routes())
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        debug!("Permissive CORS enabled");
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

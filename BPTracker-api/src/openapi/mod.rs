use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_check,

        crate::api::handlers::readings::list_readings,
        crate::api::handlers::readings::create_reading,
        crate::api::handlers::readings::clear_readings,
        crate::api::handlers::readings::get_reading,
        crate::api::handlers::readings::delete_reading,
        crate::api::handlers::readings::sort_readings,
        crate::api::handlers::readings::get_aggregated_readings,
        crate::api::handlers::readings::get_statistics,

        crate::api::handlers::readings::export_json,
        crate::api::handlers::readings::export_text,
        crate::api::handlers::readings::import_json,
        crate::api::handlers::readings::import_text
    ),
    components(
        schemas(
            crate::entities::reading::ReadingResponse,
            crate::entities::reading::ListQueryParams,
            crate::entities::aggregate::AggregateGroupResponse,
            crate::entities::aggregate::StatisticsResponse,
            crate::entities::common::ErrorResponse,
            crate::entities::common::CountResponse,

            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            bp_tracker_domain::entities::CreateReadingRequest,
            bp_tracker_domain::entities::BloodPressureCategory,
            bp_tracker_domain::entities::PulseCategory,
            bp_tracker_domain::entities::TimeBucket,
            bp_tracker_domain::services::readings::ImportSummary
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "readings", description = "Blood pressure and pulse readings"),
        (name = "transfer", description = "JSON and tab-separated import and export")
    ),
    info(
        title = "BPTracker API",
        version = "0.1.0",
        description = "Record blood pressure and pulse readings, classify them and average them by time of day",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

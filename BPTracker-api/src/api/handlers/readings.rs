use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::Local;
use serde_json::json;
use tracing::{info, instrument, warn};

use bp_tracker_data::transfer::suggested_file_name;
use bp_tracker_domain::entities::CreateReadingRequest;
use bp_tracker_domain::services::readings::{ImportSummary, ReadingServiceError};
use bp_tracker_domain::services::sorting::TimeOrder;
use bp_tracker_domain::services::{create_default_reading_service, ReadingServiceTrait};

use crate::entities::aggregate::{AggregateGroupResponse, StatisticsResponse};
use crate::entities::common::{CountResponse, ErrorResponse, INVALID_INPUT_MESSAGE};
use crate::entities::reading::{ListQueryParams, ReadingResponse};

/// Service type for dependency injection
pub type ReadingService = Arc<dyn ReadingServiceTrait + Send + Sync>;

/// Create the default service, optionally backing up to a JSON file
pub fn create_service(backup_path: Option<std::path::PathBuf>) -> ReadingService {
    Arc::new(create_default_reading_service(backup_path))
}

fn to_responses(readings: Vec<bp_tracker_domain::entities::Reading>) -> Vec<ReadingResponse> {
    readings.into_iter().map(ReadingResponse::from).collect()
}

fn attachment(content_type: &str, extension: &str, body: String) -> impl IntoResponse {
    let file_name = suggested_file_name(Local::now().date_naive(), extension);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        body,
    )
}

/// List readings by date, most recent day first
#[utoipa::path(
    get,
    path = "/api/v1/readings",
    params(ListQueryParams),
    responses(
        (status = 200, description = "Readings retrieved", body = [ReadingResponse]),
        (status = 400, description = "Invalid sort order", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn list_readings(
    State(service): State<ReadingService>,
    Query(params): Query<ListQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let order = match params.sort.as_deref() {
        Some(sort) => sort
            .parse::<TimeOrder>()
            .map_err(|e| ErrorResponse::bad_request(&e))?,
        None => TimeOrder::default(),
    };

    let readings = service.get_sorted_readings(order).await?;
    info!("Listing {} readings ({})", readings.len(), order);

    Ok(Json(to_responses(readings)))
}

/// Record a new reading
#[utoipa::path(
    post,
    path = "/api/v1/readings",
    request_body = CreateReadingRequest,
    responses(
        (status = 201, description = "Reading created", body = ReadingResponse),
        (status = 400, description = "Missing or invalid values", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service, payload))]
pub async fn create_reading(
    State(service): State<ReadingService>,
    payload: Result<Json<CreateReadingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected reading body: {}", rejection.body_text());
        ErrorResponse::validation_error(INVALID_INPUT_MESSAGE, Some(json!(rejection.body_text())))
    })?;

    let reading = service.create_reading(request).await.map_err(|e| match e {
        ReadingServiceError::ValidationError(msg) => {
            warn!("Invalid reading values: {}", msg);
            ErrorResponse::validation_error(INVALID_INPUT_MESSAGE, Some(json!(msg)))
        }
        other => ErrorResponse::from(other),
    })?;

    info!("Reading created with ID: {}", reading.id);
    Ok((StatusCode::CREATED, Json(ReadingResponse::from(reading))))
}

/// Get a single reading by ID
#[utoipa::path(
    get,
    path = "/api/v1/readings/{id}",
    params(("id" = String, Path, description = "Reading ID")),
    responses(
        (status = 200, description = "Reading found", body = ReadingResponse),
        (status = 404, description = "Reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn get_reading(
    State(service): State<ReadingService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let reading = service.get_reading_by_id(&id).await?;
    Ok(Json(ReadingResponse::from(reading)))
}

/// Delete a single reading
#[utoipa::path(
    delete,
    path = "/api/v1/readings/{id}",
    params(("id" = String, Path, description = "Reading ID")),
    responses(
        (status = 204, description = "Reading deleted"),
        (status = 404, description = "Reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn delete_reading(
    State(service): State<ReadingService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    service.delete_reading(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every reading
#[utoipa::path(
    delete,
    path = "/api/v1/readings",
    responses(
        (status = 200, description = "All readings deleted", body = CountResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn clear_readings(State(service): State<ReadingService>) -> Result<impl IntoResponse, ErrorResponse> {
    let count = service.clear_all_readings().await?;
    Ok(Json(CountResponse { count }))
}

/// Reorder the stored readings by date, earliest time first within a day
#[utoipa::path(
    post,
    path = "/api/v1/readings/sort",
    responses(
        (status = 200, description = "Readings sorted", body = [ReadingResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn sort_readings(State(service): State<ReadingService>) -> Result<impl IntoResponse, ErrorResponse> {
    let readings = service.sort_stored_readings().await?;
    Ok(Json(to_responses(readings)))
}

/// Readings averaged per date and time of day
#[utoipa::path(
    get,
    path = "/api/v1/readings/aggregated",
    responses(
        (status = 200, description = "Aggregated readings", body = [AggregateGroupResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn get_aggregated_readings(
    State(service): State<ReadingService>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let groups = service.get_aggregated_readings().await?;
    info!("Aggregated readings into {} groups", groups.len());

    let response: Vec<AggregateGroupResponse> = groups.into_iter().map(AggregateGroupResponse::from).collect();
    Ok(Json(response))
}

/// Summary statistics over all readings
#[utoipa::path(
    get,
    path = "/api/v1/readings/statistics",
    responses(
        (status = 200, description = "Statistics computed", body = StatisticsResponse),
        (status = 404, description = "No readings recorded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn get_statistics(State(service): State<ReadingService>) -> Result<impl IntoResponse, ErrorResponse> {
    let stats = service.get_statistics().await?;
    Ok(Json(StatisticsResponse::from(stats)))
}

/// Download all readings as a JSON document
#[utoipa::path(
    get,
    path = "/api/v1/readings/export/json",
    responses(
        (status = 200, description = "JSON document", content_type = "application/json", body = String),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "transfer"
)]
#[instrument(skip(service))]
pub async fn export_json(State(service): State<ReadingService>) -> Result<impl IntoResponse, ErrorResponse> {
    let document = service.export_json_document().await?;
    Ok(attachment("application/json", "json", document))
}

/// Download all readings as tab-separated text
#[utoipa::path(
    get,
    path = "/api/v1/readings/export/text",
    responses(
        (status = 200, description = "Tab-separated document", content_type = "text/plain", body = String),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "transfer"
)]
#[instrument(skip(service))]
pub async fn export_text(State(service): State<ReadingService>) -> Result<impl IntoResponse, ErrorResponse> {
    let document = service.export_tab_separated().await?;
    Ok(attachment("text/plain; charset=utf-8", "txt", document))
}

/// Replace all readings with a JSON document
#[utoipa::path(
    post,
    path = "/api/v1/readings/import/json",
    request_body(content = String, content_type = "application/json", description = "JSON array of readings"),
    responses(
        (status = 200, description = "Readings loaded", body = ImportSummary),
        (status = 400, description = "Document could not be parsed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "transfer"
)]
#[instrument(skip(service, body))]
pub async fn import_json(
    State(service): State<ReadingService>,
    body: String,
) -> Result<impl IntoResponse, ErrorResponse> {
    let summary = service.load_json_document(&body).await?;
    Ok(Json(summary))
}

/// Append readings from a tab-separated document
#[utoipa::path(
    post,
    path = "/api/v1/readings/import/text",
    request_body(content = String, content_type = "text/plain", description = "Tab-separated readings"),
    responses(
        (status = 200, description = "Readings imported", body = ImportSummary),
        (status = 400, description = "No valid readings found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "transfer"
)]
#[instrument(skip(service, body))]
pub async fn import_text(
    State(service): State<ReadingService>,
    body: String,
) -> Result<impl IntoResponse, ErrorResponse> {
    let summary: ImportSummary = service.import_tab_separated(&body).await.map_err(|e| match e {
        ReadingServiceError::InsufficientData(msg) => ErrorResponse::validation_error(&msg, None),
        other => ErrorResponse::from(other),
    })?;

    if !summary.rejected_lines.is_empty() {
        warn!("Skipped malformed lines {:?}", summary.rejected_lines);
    }

    Ok(Json(summary))
}

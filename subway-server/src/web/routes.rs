//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{
    Distance, DomainError, InvalidDistance, Line, LineId, StationId, StationIdsExhausted,
};
use crate::lines::{LineServiceError, NewLine};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/:id", get(show_station))
        .route("/lines", get(list_lines).post(create_line))
        .route(
            "/lines/:id",
            get(show_line).put(modify_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(register_section).delete(delete_section),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "rejected JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn created(location: String, body: impl serde::Serialize) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

/// Render a line with station names from the registry.
async fn line_response(state: &AppState, line: &Line) -> LineResponse {
    let directory = state.stations.read().await;
    LineResponse::from_line(line, &directory)
}

/// Register a station.
async fn create_station(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: CreateStationRequest = parse_json(&body)?;
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "name must not be blank".to_string(),
        });
    }

    let station = state.stations.register(req.name).await?;
    Ok(created(
        format!("/stations/{}", station.id),
        StationResponse::from(station),
    ))
}

/// List all stations.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.stations.list().await;
    Json(stations.into_iter().map(StationResponse::from).collect())
}

/// Show one station.
async fn show_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StationResponse>, AppError> {
    let station = state
        .stations
        .get(StationId(id))
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("station {id} does not exist"),
        })?;
    Ok(Json(station.into()))
}

/// Create a line together with its first section.
async fn create_line(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: CreateLineRequest = parse_json(&body)?;
    validate_label("name", &req.name).map_err(AppError::bad_request)?;
    validate_label("color", &req.color).map_err(AppError::bad_request)?;
    let distance = Distance::new(req.distance)?;

    let line = state
        .lines
        .create_line(NewLine {
            name: req.name,
            color: req.color,
            up_station: req.up_station_id,
            down_station: req.down_station_id,
            distance,
        })
        .await?;

    let response = line_response(&state, &line).await;
    let location = match line.id() {
        Some(id) => format!("/lines/{id}"),
        None => "/lines".to_string(),
    };
    Ok(created(location, response))
}

/// List all lines.
async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let lines = state.lines.find_all_lines().await?;
    let directory = state.stations.read().await;
    Ok(Json(
        lines
            .iter()
            .map(|line| LineResponse::from_line(line, &directory))
            .collect(),
    ))
}

/// Show one line.
async fn show_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state.lines.find_line(LineId(id)).await?;
    Ok(Json(line_response(&state, &line).await))
}

/// Rename and recolour a line.
async fn modify_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let req: ModifyLineRequest = parse_json(&body)?;
    validate_label("name", &req.name).map_err(AppError::bad_request)?;
    validate_label("color", &req.color).map_err(AppError::bad_request)?;

    let line = state
        .lines
        .modify_line(LineId(id), req.name, req.color)
        .await?;
    Ok(Json(line_response(&state, &line).await))
}

/// Delete a line and its sections.
async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.lines.delete_line(LineId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a section at the line's terminal station.
async fn register_section(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: SectionRequest = parse_json(&body)?;
    let distance = Distance::new(req.distance)?;

    let line = state
        .lines
        .register_section(LineId(id), req.up_station_id, req.down_station_id, distance)
        .await?;

    let response = line_response(&state, &line).await;
    Ok(created(format!("/lines/{id}"), response))
}

/// Remove the line's terminal station.
async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteSectionQuery>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state
        .lines
        .delete_section(LineId(id), query.station_id)
        .await?;
    Ok(Json(line_response(&state, &line).await))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn bad_request(message: String) -> Self {
        AppError::BadRequest { message }
    }
}

impl From<InvalidDistance> for AppError {
    fn from(e: InvalidDistance) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StationIdsExhausted> for AppError {
    fn from(e: StationIdsExhausted) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<LineServiceError> for AppError {
    fn from(e: LineServiceError) -> Self {
        let message = e.to_string();
        match e {
            LineServiceError::LineNotFound(_)
            | LineServiceError::Domain(DomainError::UnknownStation(_)) => {
                AppError::NotFound { message }
            }
            LineServiceError::Corrupted { .. } => AppError::Internal { message },
            LineServiceError::Domain(ref d) if d.is_invariant_violation() => {
                AppError::Internal { message }
            }
            LineServiceError::Domain(_) | LineServiceError::InvalidSection(_) => {
                AppError::BadRequest { message }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

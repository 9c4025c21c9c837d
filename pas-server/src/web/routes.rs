//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::{Cep, UnitId};
use crate::geocoding::Lookup;
use crate::units::UnitApiError;

use super::dto::*;
use super::state::AppState;

/// Browsers and proxies may keep a resolved postal code for a day.
const GEOCODE_CACHE_CONTROL: &str = "public, max-age=86400";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/geocoding", get(geocode))
        .route("/api/unidades/buscar", post(search_units))
        .route("/api/unidades/mapa", post(map_units))
        .route("/api/unidades/busca", get(search_by_name))
        .route("/api/unidades/:id", get(unit_detail))
        .route("/api/categorias", get(categories))
        .route("/api/especialidades", get(specialties))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Resolve a postal code to coordinates.
async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodingQuery>,
) -> Result<Response, AppError> {
    let raw = query
        .cep
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "cep is required".to_string(),
        })?;

    let cep = Cep::parse(raw).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    match state.geocoding.lookup(&cep).await {
        Lookup::Resolved { coords, cache } => Ok((
            [
                (header::CACHE_CONTROL, GEOCODE_CACHE_CONTROL),
                (HeaderName::from_static("x-cache"), cache.as_header()),
            ],
            Json(coords),
        )
            .into_response()),
        Lookup::NotFound => Err(AppError::NotFound {
            message: format!("no coordinates found for postal code {cep}"),
        }),
        Lookup::Failed => Err(AppError::Internal {
            message: "geocoding provider unavailable".to_string(),
        }),
    }
}

/// Parse a search body. An empty body means "no filters".
fn parse_search(body: &Bytes) -> Result<SearchUnitsRequest, AppError> {
    if body.is_empty() {
        return Ok(SearchUnitsRequest::default());
    }

    // Parse JSON manually so a bad radius or availability is a 400 with a
    // readable message.
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(body), "invalid search body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn parse_unit_id(raw: &str) -> Result<UnitId, AppError> {
    raw.trim().parse().map_err(|_| AppError::BadRequest {
        message: format!("invalid unit id: {raw:?}"),
    })
}

/// Run the filter pipeline.
async fn search_units(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchUnitsResponse>, AppError> {
    let req = parse_search(&body)?;
    let output = state.pipeline.run(&req.filtros, req.localizacao).await;
    Ok(Json(output.into()))
}

/// Run the filter pipeline and place the result on the map.
async fn map_units(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MapResponse>, AppError> {
    let req = parse_search(&body)?;
    let output = state.pipeline.run(&req.filtros, req.localizacao).await;

    let distances = output.distances;
    let markers = state
        .pipeline
        .locate(output.records)
        .await
        .into_iter()
        .map(|located| {
            let distance = distances.get(&located.unit.id).copied();
            MapMarker::new(located, distance)
        })
        .collect();

    Ok(Json(MapResponse { markers }))
}

/// One unit with its map position.
async fn unit_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UnitDetailResponse>, AppError> {
    let id = parse_unit_id(&id)?;
    let unit = state.pipeline.unit_detail(id).await?;
    let coords = state.pipeline.locate_unit(&unit).await;
    Ok(Json(UnitDetailResponse { unit, coords }))
}

/// Search units by name.
async fn search_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameSearchQuery>,
) -> Json<NameSearchResponse> {
    let units = state.units.search_by_name(&query.q).await;
    Json(NameSearchResponse { units })
}

async fn categories(State(state): State<AppState>) -> Json<CatalogResponse> {
    let items = state.units.categories().await.as_ref().clone();
    Json(CatalogResponse { items })
}

async fn specialties(State(state): State<AppState>) -> Json<CatalogResponse> {
    let items = state.units.specialties().await.as_ref().clone();
    Json(CatalogResponse { items })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<UnitApiError> for AppError {
    fn from(e: UnitApiError) -> Self {
        match e {
            UnitApiError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
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

//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::domain::{
    BusService, BusStop, BusStopCode, Direction, GeoPoint, Journey, ServiceNo, ServiceRating,
    ServiceStop,
};
use crate::geo::{BoundingBox, nearby_stops};
use crate::opposite::pair_opposite_stops;
use crate::planner::{PlanError, Planner};
use crate::store::{BusStore, StoreError};

use super::dto::*;
use super::state::AppState;

/// Longest comment accepted with a rating, in characters.
const MAX_COMMENT_CHARS: usize = 500;

/// Create the application router.
pub fn create_router<S: BusStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/bus-stops/:BusStopCode", get(get_bus_stop::<S>))
        .route("/bus-services/:ServiceNo/:Direction", get(get_bus_service::<S>))
        .route(
            "/bus-services/:ServiceNo/:Direction/bus-stops",
            get(get_bus_service_stops::<S>),
        )
        .route(
            "/bus-services/:ServiceNo/:Direction/rating",
            get(get_bus_service_rating::<S>).post(submit_bus_service_rating::<S>),
        )
        .route(
            "/nearby-bus-stops/:Latitude/:Longitude",
            get(get_nearby_bus_stops::<S>),
        )
        .route(
            "/roads/:RoadName/opposite-bus-stops",
            get(get_opposite_bus_stops::<S>),
        )
        .route(
            "/journey/:OriginStopCode/:DestinationStopCode",
            get(get_journey::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_stop_code(raw: &str) -> Result<BusStopCode, AppError> {
    BusStopCode::parse(raw).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn parse_service(raw_service_no: &str, raw_direction: &str) -> Result<(ServiceNo, Direction), AppError> {
    let service_no = ServiceNo::parse(raw_service_no).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;
    let direction = Direction::parse(raw_direction).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;
    Ok((service_no, direction))
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim().parse().map_err(|_| AppError::BadRequest {
        message: format!("Invalid {name}: {raw}"),
    })
}

/// Get a single bus stop.
async fn get_bus_stop<S: BusStore>(
    State(state): State<AppState<S>>,
    Path(bus_stop_code): Path<String>,
) -> Result<Json<BusStop>, AppError> {
    let code = parse_stop_code(&bus_stop_code)?;

    let stop = state
        .store
        .find_stop(&code)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Json(stop))
}

/// Get a bus service in one direction.
async fn get_bus_service<S: BusStore>(
    State(state): State<AppState<S>>,
    Path((service_no, direction)): Path<(String, String)>,
) -> Result<Json<BusService>, AppError> {
    let (service_no, direction) = parse_service(&service_no, &direction)?;

    let service = state
        .store
        .find_service(&service_no, direction)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Json(service))
}

/// List the stops along a service's route, in order.
async fn get_bus_service_stops<S: BusStore>(
    State(state): State<AppState<S>>,
    Path((service_no, direction)): Path<(String, String)>,
) -> Result<Json<Vec<ServiceStop>>, AppError> {
    let (service_no, direction) = parse_service(&service_no, &direction)?;

    let stops = state.store.service_stops(&service_no, direction).await?;
    if stops.is_empty() {
        return Err(AppError::not_found());
    }

    Ok(Json(stops))
}

/// Find stops within a radius of a point, nearest first.
async fn get_nearby_bus_stops<S: BusStore>(
    State(state): State<AppState<S>>,
    Path((latitude, longitude)): Path<(String, String)>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<Vec<NearbyStopResult>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let lat = parse_coordinate("latitude", &latitude)?;
    let lng = parse_coordinate("longitude", &longitude)?;
    let point = GeoPoint::new(lat, lng).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let radius_km = query.radius_km.unwrap_or(state.nearby.default_radius_km);
    if !(radius_km > 0.0 && radius_km <= state.nearby.max_radius_km) {
        return Err(AppError::BadRequest {
            message: format!(
                "radius_km must be greater than 0 and at most {}",
                state.nearby.max_radius_km
            ),
        });
    }

    let bbox = BoundingBox::around(point, radius_km);
    let candidates = state.store.stops_in_box(&bbox).await?;
    let candidate_count = candidates.len();

    let results: Vec<NearbyStopResult> = nearby_stops(candidates, point, radius_km)
        .into_iter()
        .map(NearbyStopResult::from)
        .collect();

    debug!(
        lat,
        lng,
        radius_km,
        candidate_count,
        found = results.len(),
        "nearby stop search"
    );

    Ok(Json(results))
}

/// Rating statistics for a service.
async fn get_bus_service_rating<S: BusStore>(
    State(state): State<AppState<S>>,
    Path((service_no, direction)): Path<(String, String)>,
) -> Result<Json<RatingSummaryResponse>, AppError> {
    let (service_no, direction) = parse_service(&service_no, &direction)?;

    state
        .store
        .find_service(&service_no, direction)
        .await?
        .ok_or_else(AppError::not_found)?;

    let summary = state.store.rating_summary(&service_no, direction).await?;

    Ok(Json(RatingSummaryResponse::new(service_no, direction, summary)))
}

/// Submit a rating for a service.
async fn submit_bus_service_rating<S: BusStore>(
    State(state): State<AppState<S>>,
    Path((service_no, direction)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<ServiceRating>), AppError> {
    let (service_no, direction) = parse_service(&service_no, &direction)?;

    // Parse JSON manually so rejections use the JSON error body
    let req: SubmitRatingRequest = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid rating: {e}"),
    })?;

    let comment = req
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if comment
        .as_ref()
        .is_some_and(|c| c.chars().count() > MAX_COMMENT_CHARS)
    {
        return Err(AppError::BadRequest {
            message: format!("Comment must be at most {MAX_COMMENT_CHARS} characters"),
        });
    }

    state
        .store
        .find_service(&service_no, direction)
        .await?
        .ok_or_else(AppError::not_found)?;

    let rating = ServiceRating {
        service_no,
        direction,
        rating: req.rating,
        comment,
        created_at: Utc::now(),
    };
    state.store.insert_rating(&rating).await?;

    info!(
        service_no = %rating.service_no,
        direction = %rating.direction,
        rating = rating.rating.value(),
        "rating submitted"
    );

    Ok((StatusCode::CREATED, Json(rating)))
}

/// List pairs of stops facing each other on a road.
async fn get_opposite_bus_stops<S: BusStore>(
    State(state): State<AppState<S>>,
    Path(road_name): Path<String>,
) -> Result<Json<Vec<(BusStop, BusStop)>>, AppError> {
    let stops = state.store.stops_on_road(road_name.trim()).await?;
    let pairs = pair_opposite_stops(&stops);

    if pairs.is_empty() {
        return Err(AppError::not_found());
    }

    Ok(Json(pairs))
}

/// Plan a journey between two stops.
async fn get_journey<S: BusStore>(
    State(state): State<AppState<S>>,
    Path((origin, destination)): Path<(String, String)>,
) -> Result<Json<Journey>, AppError> {
    let origin = parse_stop_code(&origin)?;
    let destination = parse_stop_code(&destination)?;

    if origin == destination {
        return Err(PlanError::SameStop.into());
    }

    let known = state.store.find_stops(&[origin, destination]).await?;
    for code in [origin, destination] {
        if !known.iter().any(|s| s.bus_stop_code == code) {
            return Err(AppError::NotFound {
                message: format!("Bus stop {code} not found"),
            });
        }
    }

    let network = state.network.get_or_load(state.store.as_ref()).await?;
    let journey = Planner::new(&network, &state.journey).plan(origin, destination)?;

    Ok(Json(journey))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn not_found() -> Self {
        AppError::NotFound {
            message: "Not found".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<Arc<StoreError>> for AppError {
    fn from(e: Arc<StoreError>) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::SameStop => AppError::BadRequest {
                message: e.to_string(),
            },
            PlanError::NotServed(_) | PlanError::NoRoute { .. } => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            debug!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

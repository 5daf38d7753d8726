pub mod amenities;
pub mod candidates;
pub mod conditions;
pub mod config;
pub mod error;
pub mod geomath;
pub mod gpx_export;
pub mod models;
pub mod parking;
pub mod providers;
pub mod render;
pub mod selector;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use shared::{
    ApiError, CreateSessionRequest, CurrentConditions, Distance, GpxResponse, RoutePlanView,
    RouteView, SelectParkingRequest, SessionSnapshot, SetDistanceRequest, SetPreferenceRequest,
    ShowAlternativeRequest,
};

use crate::conditions::ConditionsApi;
use crate::error::PlanError;
use crate::models::{RankedRouteSet, RouteCandidate};
use crate::providers::geocode::resolve_location;
use crate::providers::{DirectionsApi, GeocodeApi, GeocodeError, PlacesApi};
use crate::render::GeoJsonRenderer;
use crate::session::RoutePlanningSession;

type PlanSession<D, P> = RoutePlanningSession<D, P, GeoJsonRenderer>;

pub struct AppState<D, P, G, W> {
    directions: Arc<D>,
    places: Arc<P>,
    geocoder: Arc<G>,
    conditions: Option<Arc<W>>,
    sessions: Arc<Mutex<HashMap<Uuid, PlanSession<D, P>>>>,
}

impl<D, P, G, W> Clone for AppState<D, P, G, W> {
    fn clone(&self) -> Self {
        Self {
            directions: Arc::clone(&self.directions),
            places: Arc::clone(&self.places),
            geocoder: Arc::clone(&self.geocoder),
            conditions: self.conditions.as_ref().map(Arc::clone),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<D, P, G, W> AppState<D, P, G, W> {
    pub fn new(
        directions: Arc<D>,
        places: Arc<P>,
        geocoder: Arc<G>,
        conditions: Option<Arc<W>>,
    ) -> Self {
        Self {
            directions,
            places,
            geocoder,
            conditions,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

pub fn create_router<D, P, G, W>(state: AppState<D, P, G, W>) -> Router
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    Router::new()
        .route("/api/sessions", post(create_session::<D, P, G, W>))
        .route("/api/sessions/:id", get(get_session::<D, P, G, W>))
        .route(
            "/api/sessions/:id/location",
            put(set_location::<D, P, G, W>),
        )
        .route(
            "/api/sessions/:id/distance",
            put(set_distance::<D, P, G, W>),
        )
        .route(
            "/api/sessions/:id/preference",
            put(set_preference::<D, P, G, W>),
        )
        .route("/api/sessions/:id/parking", put(select_parking::<D, P, G, W>))
        .route(
            "/api/sessions/:id/alternative",
            post(show_alternative::<D, P, G, W>),
        )
        .route("/api/sessions/:id/gpx", get(get_gpx::<D, P, G, W>))
        .route("/api/conditions", get(get_conditions::<D, P, G, W>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ErrorResponse = (StatusCode, Json<ApiError>);

async fn create_session<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let location = resolve_location(state.geocoder.as_ref(), &req.location)
        .await
        .map_err(geocode_error_response)?;

    let mut session = RoutePlanningSession::new(
        Arc::clone(&state.directions),
        Arc::clone(&state.places),
        GeoJsonRenderer::new(),
    );
    // No starting point exists yet, so these set parameters without
    // triggering generation; the location arrival below runs the cycle.
    session
        .set_target_distance(Distance::miles(req.target_distance_miles))
        .await
        .map_err(plan_error_response)?;
    session.set_elevation_preference(req.elevation_preference).await;
    session
        .set_user_location(location)
        .await
        .map_err(plan_error_response)?;

    let id = Uuid::new_v4();
    let body = snapshot(id, &session);
    state.sessions.lock().await.insert(id, session);

    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_session<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let sessions = state.sessions.lock().await;
    let session = sessions.get(&id).ok_or_else(session_not_found)?;
    Ok(Json(snapshot(id, session)))
}

#[derive(Debug, Deserialize)]
struct SetLocationRequest {
    location: String,
}

async fn set_location<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetLocationRequest>,
) -> Result<Json<SessionSnapshot>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let location = resolve_location(state.geocoder.as_ref(), &req.location)
        .await
        .map_err(geocode_error_response)?;

    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    session
        .set_user_location(location)
        .await
        .map_err(plan_error_response)?;
    Ok(Json(snapshot(id, session)))
}

async fn set_distance<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetDistanceRequest>,
) -> Result<Json<SessionSnapshot>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    session
        .set_target_distance(Distance::miles(req.target_distance_miles))
        .await
        .map_err(plan_error_response)?;
    Ok(Json(snapshot(id, session)))
}

async fn set_preference<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetPreferenceRequest>,
) -> Result<Json<SessionSnapshot>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    session
        .set_elevation_preference(req.elevation_preference)
        .await;
    Ok(Json(snapshot(id, session)))
}

async fn select_parking<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectParkingRequest>,
) -> Result<Json<SessionSnapshot>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    session
        .select_parking_lot(&req.lot_id)
        .await
        .map_err(plan_error_response)?;
    Ok(Json(snapshot(id, session)))
}

async fn show_alternative<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ShowAlternativeRequest>,
) -> Result<Json<SessionSnapshot>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(&id).ok_or_else(session_not_found)?;
    session.show_route(req.index).map_err(plan_error_response)?;
    Ok(Json(snapshot(id, session)))
}

async fn get_gpx<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GpxResponse>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    let sessions = state.sessions.lock().await;
    let session = sessions.get(&id).ok_or_else(session_not_found)?;
    let route_set = session.route_set().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                message: "no route available".into(),
            }),
        )
    })?;

    let gpx_base64 = gpx_export::encode_route_as_gpx(&route_set.primary).map_err(|err| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                message: err.to_string(),
            }),
        )
    })?;
    Ok(Json(GpxResponse { gpx_base64 }))
}

#[derive(Debug, Deserialize)]
struct ConditionsQuery {
    lat: f64,
    lon: f64,
}

async fn get_conditions<D, P, G, W>(
    State(state): State<AppState<D, P, G, W>>,
    Query(query): Query<ConditionsQuery>,
) -> Result<Json<CurrentConditions>, ErrorResponse>
where
    D: DirectionsApi + 'static,
    P: PlacesApi + 'static,
    G: GeocodeApi + 'static,
    W: ConditionsApi + 'static,
{
    if !geomath::is_valid_coordinate(query.lon, query.lat) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                message: "coordinates out of valid range".into(),
            }),
        ));
    }

    let Some(conditions) = state.conditions.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError {
                message: "weather provider not configured".into(),
            }),
        ));
    };

    let current = conditions
        .current(shared::Coordinate {
            lat: query.lat,
            lon: query.lon,
        })
        .await
        .map_err(|err| {
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError {
                    message: err.to_string(),
                }),
            )
        })?;
    Ok(Json(current))
}

fn snapshot<D, P>(id: Uuid, session: &PlanSession<D, P>) -> SessionSnapshot
where
    D: DirectionsApi,
    P: PlacesApi,
{
    SessionSnapshot {
        session_id: id.to_string(),
        phase: session.phase(),
        loading: session.is_loading(),
        error: session.error_message().map(str::to_string),
        target_distance_miles: session.target_distance().as_miles(),
        elevation_preference: session.elevation_preference(),
        parking_lots: session.parking_lots().to_vec(),
        selected_lot_id: session.selected_lot_id().map(str::to_string),
        routes: session.route_set().map(route_plan_view),
        water_fountains: session.water_fountains().to_vec(),
        render: session.renderer().document().clone(),
    }
}

fn route_plan_view(set: &RankedRouteSet) -> RoutePlanView {
    RoutePlanView {
        primary: route_view(&set.primary),
        alternatives: set.alternatives.iter().map(route_view).collect(),
    }
}

fn route_view(route: &RouteCandidate) -> RouteView {
    let one_way_miles = route.path_distance.as_miles();
    RouteView {
        geometry: route.geometry.clone(),
        distance_miles: one_way_miles,
        total_distance_miles: one_way_miles * 2.0,
        elevation_gain_m: route.elevation_gain,
    }
}

fn plan_error_response(err: PlanError) -> ErrorResponse {
    let status = match &err {
        PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PlanError::EmptyCandidateSet | PlanError::NoParkingFound => StatusCode::NOT_FOUND,
        PlanError::Provider(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}

fn geocode_error_response(err: GeocodeError) -> ErrorResponse {
    let status = match &err {
        GeocodeError::NotFound => StatusCode::NOT_FOUND,
        GeocodeError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
        GeocodeError::Provider(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}

fn session_not_found() -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            message: "unknown session".into(),
        }),
    )
}

// REST API with Axum
//
//   GET    /rest/ships          filtered, ordered, paged listing
//   GET    /rest/ships/count    count for the same filters
//   POST   /rest/ships          create
//   GET    /rest/ships/:id      fetch
//   POST   /rest/ships/:id      partial update
//   DELETE /rest/ships/:id      delete

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::errors::{ErrorKind, ShipError};
use crate::filter::{ListParams, ShipFilter};
use crate::service;
use crate::ship::{Ship, ShipInput};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database connection poisoned".to_string()))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let ships = Router::new()
        .route("/ships", get(list_ships).post(create_ship))
        .route("/ships/count", get(count_ships))
        .route("/ships/:id", get(get_ship).post(update_ship).delete(delete_ship));

    Router::new()
        .route("/health", get(health_check))
        .nest("/rest", ships)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

/// GET /rest/ships
async fn list_ships(
    State(state): State<AppState>,
    Query(filter): Query<ShipFilter>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Ship>>, AppError> {
    let conn = state.conn()?;
    let ships = service::list_ships(&conn, &filter, &params)?;
    Ok(Json(ships))
}

/// GET /rest/ships/count
async fn count_ships(
    State(state): State<AppState>,
    Query(filter): Query<ShipFilter>,
) -> Result<Json<i64>, AppError> {
    let conn = state.conn()?;
    let count = service::count_ships(&conn, &filter)?;
    Ok(Json(count))
}

/// POST /rest/ships
async fn create_ship(
    State(state): State<AppState>,
    body: Result<Json<ShipInput>, JsonRejection>,
) -> Result<Json<Ship>, AppError> {
    let Json(input) = body?;
    let conn = state.conn()?;
    let ship = service::create_ship(&conn, &input)?;
    Ok(Json(ship))
}

/// GET /rest/ships/:id
async fn get_ship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ship>, AppError> {
    let conn = state.conn()?;
    let ship = service::get_ship(&conn, id)?;
    Ok(Json(ship))
}

/// POST /rest/ships/:id
async fn update_ship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<ShipInput>, JsonRejection>,
) -> Result<Json<Ship>, AppError> {
    let conn = state.conn()?;
    // resolve first: an unknown id is 404 even when the body is bad
    let existing = service::get_ship(&conn, id)?;

    let Json(patch) = body?;
    let ship = service::apply_update(&conn, existing, &patch)?;
    Ok(Json(ship))
}

/// DELETE /rest/ships/:id
async fn delete_ship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let conn = state.conn()?;
    service::delete_ship(&conn, id)?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ShipError> for AppError {
    fn from(err: ShipError) -> Self {
        if let ShipError::Store(source) = &err {
            return AppError::Internal(format!("{:#}", source));
        }

        let message = err.to_string();
        match err.kind() {
            ErrorKind::BadRequest => AppError::BadRequest(message),
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::Internal => AppError::Internal(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

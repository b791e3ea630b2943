//! HTTP routing for the dashboard server.

use crate::api::{AuthResponse, Credentials, MessageResponse, ServiceInfo, SyncResponse};
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;
use crate::params::RawQuery;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pisync_core::{DeviceRecord, LogEntry, Page, QueryParams};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{error, warn, Level};

const REGISTER_FAILED: &str = "Server error during registration";
const LOGIN_FAILED: &str = "Server error during login";
const SYNC_FAILED: &str = "Server error while syncing device";
const INTERNAL_FAILURE: &str = "Internal server error";

#[derive(Clone)]
struct AppState {
    handler: Arc<RequestHandler>,
}

/// Builds the router for all dashboard routes.
///
/// Device and log routes require a bearer token. Unknown paths and methods
/// answer 404 with `{"message": "Route not found"}`.
pub fn router(handler: Arc<RequestHandler>) -> Router {
    let state = AppState { handler };

    let protected = Router::new()
        .route("/pisync/devices", get(list_devices).fallback(route_not_found))
        .route("/pisync/devices/:id", get(sync_device).fallback(route_not_found))
        .route("/pisync/logs", get(list_logs).fallback(route_not_found))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri()
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .route("/", get(service_info).fallback(route_not_found))
        .route("/pisync/auth/register", post(register).fallback(route_not_found))
        .route("/pisync/auth/login", post(login).fallback(route_not_found))
        .merge(protected)
        .fallback(route_not_found)
        .with_state(state)
        .layer(trace)
        .layer(CorsLayer::permissive())
}

/// Serves `router` on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, router: Router) -> ServerResult<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}

/// A [`ServerError`] plus the message shown when it is a server error.
struct ApiError {
    error: ServerError,
    fallback: &'static str,
}

impl ApiError {
    fn during(fallback: &'static str) -> impl Fn(ServerError) -> Self {
        move |error| Self { error, fallback }
    }
}

impl From<ServerError> for ApiError {
    fn from(error: ServerError) -> Self {
        Self {
            error,
            fallback: INTERNAL_FAILURE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match self.error.public_message() {
            Some(message) => message,
            None => {
                error!(error = %self.error, "{}", self.fallback);
                self.fallback.to_string()
            }
        };
        (status, Json(MessageResponse::new(message))).into_response()
    }
}

async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    match state.handler.authenticate(header) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::from(ServerError::RouteNotFound(uri.path().to_string()))
}

async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(credentials) = body.map_err(bad_body)?;
    let handler = state.handler.clone();

    let response = run_blocking(move || handler.handle_register(credentials))
        .await
        .map_err(ApiError::during(REGISTER_FAILED))?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(credentials) = body.map_err(bad_body)?;
    let handler = state.handler.clone();

    let response = run_blocking(move || handler.handle_login(credentials))
        .await
        .map_err(ApiError::during(LOGIN_FAILED))?;
    Ok(Json(response))
}

async fn list_devices(
    State(state): State<AppState>,
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Json<Page<DeviceRecord>> {
    Json(state.handler.handle_list_devices(&raw_params(query)))
}

async fn sync_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<(StatusCode, Json<SyncResponse>), ApiError> {
    let response = state
        .handler
        .handle_sync_device(&device_id)
        .map_err(ApiError::during(SYNC_FAILED))?;

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(response)))
}

async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<RawQuery>, QueryRejection>,
) -> Json<Page<LogEntry>> {
    Json(state.handler.handle_list_logs(&raw_params(query)))
}

fn raw_params(query: Result<Query<RawQuery>, QueryRejection>) -> QueryParams {
    match query {
        Ok(Query(raw)) => raw.into_params(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable query string, using defaults");
            RawQuery::default().into_params()
        }
    }
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::from(ServerError::InvalidRequest(rejection.body_text()))
}

/// Runs CPU-bound work (password hashing) off the async executor.
async fn run_blocking<T, F>(work: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ServerResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ServerError::Internal(format!("blocking task failed: {err}")))?
}

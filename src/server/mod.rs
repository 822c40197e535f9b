//! HTTP surface for the monitor: a welcome route and the air quality query
//! endpoint, backed by [`AirQualityService`].

use crate::core::monitor::AirQualityService;
use crate::domain::model::AirQualityReport;
use crate::domain::ports::AirQualityApi;
use crate::utils::error::{MonitorError, Result};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState<A: AirQualityApi> {
    service: Arc<AirQualityService<A>>,
}

impl<A: AirQualityApi> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Builds the application router.
///
/// CORS is left permissive: the API is meant to be queried directly by
/// whatever front-end sits in front of it.
pub fn router<A: AirQualityApi + 'static>(service: AirQualityService<A>) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/", get(welcome))
        .route("/air-quality", get(get_air_quality::<A>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the HTTP server until the process is stopped.
pub async fn serve<A: AirQualityApi + 'static>(
    service: AirQualityService<A>,
    port: u16,
) -> Result<()> {
    let app = router(service);

    let bind_address = format!("0.0.0.0:{}", port);
    tracing::info!("Starting air quality server on {}", bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Welcome to the Air Quality Monitor"}))
}

#[derive(Debug, Deserialize)]
struct AirQualityQuery {
    location: String,
}

async fn get_air_quality<A: AirQualityApi>(
    State(state): State<AppState<A>>,
    Query(query): Query<AirQualityQuery>,
) -> std::result::Result<Json<AirQualityReport>, ApiError> {
    let report = state.service.check(&query.location).await?;
    Ok(Json(report))
}

/// Wrapper mapping [`MonitorError`] onto HTTP responses with an
/// `{"error": ...}` body.
struct ApiError(MonitorError);

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({"error": self.0.user_friendly_message()}));

        match &self.0 {
            MonitorError::LocationNotFound { .. } => {
                (StatusCode::NOT_FOUND, body).into_response()
            }
            MonitorError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            MonitorError::InvalidConfigValue { .. } | MonitorError::MissingConfig { .. } => {
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            _ => {
                tracing::error!("❌ Upstream failure: {}", self.0);
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
        }
    }
}

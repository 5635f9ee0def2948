mod runs;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use promocheck_core::ErrorKind;
use promocheck_scraper::{Harness, SCREENSHOT_URL_PREFIX};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub harness: Arc<Harness>,
}

/// Directories served next to the API.
#[derive(Debug, Clone)]
pub struct StaticDirs {
    pub screenshots: PathBuf,
    /// Built UI; served for every path the API does not claim.
    pub frontend: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

/// Body returned whenever a run cannot produce a result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub request_id: String,
}

/// A [`FailureBody`] paired with its HTTP status.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: FailureBody,
}

impl ApiFailure {
    pub fn new(
        status: StatusCode,
        request_id: impl Into<String>,
        message: impl Into<String>,
        error: impl Into<String>,
        error_kind: Option<ErrorKind>,
    ) -> Self {
        Self {
            status,
            body: FailureBody {
                success: false,
                message: message.into(),
                error: error.into(),
                error_kind,
                request_id: request_id.into(),
            },
        }
    }

    pub fn bad_request(request_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            request_id,
            "invalid request",
            error,
            Some(ErrorKind::InvalidInput),
        )
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/run-test", post(runs::run_test))
        .route("/run-batch", post(runs::run_batch))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

pub fn build_app(state: AppState, dirs: &StaticDirs) -> Router {
    let mut app = Router::new()
        .merge(api_router(state))
        .nest_service(SCREENSHOT_URL_PREFIX, ServeDir::new(&dirs.screenshots));

    if let Some(frontend) = &dirs.frontend {
        app = app.fallback_service(
            ServeDir::new(frontend)
                .append_index_html_on_directories(true)
                .fallback(ServeFile::new(frontend.join("index.html"))),
        );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors())
            .layer(axum::middleware::from_fn(request_id)),
    )
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use axum::{routing::get, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::handle_404;
use crate::server::{app_response::ApiResponse, AppRouter};

pub(super) fn router() -> AppRouter {
    Router::new().route("/health", get(health).fallback(handle_404))
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: String,
}

async fn health() -> ApiResponse<HealthStatus> {
    HealthStatus {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
    .into()
}

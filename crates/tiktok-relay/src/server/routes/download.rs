use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::handle_404;
use crate::{
    normalizer::{self, NormalizedPost, NormalizedResponse},
    server::{
        app_response::{error::RelayError, ApiResponse},
        AppRouter, AppState,
    },
};

pub(super) fn router() -> AppRouter {
    Router::new().route("/download", get(download).fallback(handle_404))
}

#[derive(Debug, Serialize)]
struct DownloadResponse {
    success: bool,
    data: NormalizedPost,
}

async fn download(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<Vec<(String, String)>>, RelayError>,
) -> Result<ApiResponse<DownloadResponse>, RelayError> {
    let url = match first_url(query) {
        Some(url) => url,
        None => {
            return Err(RelayError::MissingUrl {
                example: state.example_url(),
            });
        }
    };

    debug!(%url, provider = state.provider.name(), "Extracting post");

    let normalized = state
        .provider
        .download(&url)
        .await
        .and_then(normalizer::normalize)
        .map_err(|e| {
            error!(err = ?e, %url, "Failed to extract post");
            RelayError::from(e)
        })?;

    match normalized {
        NormalizedResponse::Success(data) => Ok(DownloadResponse {
            success: true,
            data,
        }
        .into()),
        NormalizedResponse::Failure(details) => {
            warn!(?details, %url, "Provider failed to process post");
            Err(RelayError::ProviderFailure(details))
        }
    }
}

/// A repeated `url` parameter resolves to its first non-empty value
fn first_url(query: Vec<(String, String)>) -> Option<String> {
    query
        .into_iter()
        .find(|(key, value)| key == "url" && !value.is_empty())
        .map(|(_, value)| value)
}

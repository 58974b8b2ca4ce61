use std::any::Any;

use axum::{
    extract::OriginalUri,
    http::Method,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, error};

use super::{app_response::error::RelayError, AppRouter};

mod download;
mod index;

pub(super) fn router() -> AppRouter {
    Router::new()
        .merge(index::router())
        .merge(download::router())
        .fallback(handle_404)
        .layer(CatchPanicLayer::custom(
            |err: Box<dyn Any + Send + 'static>| -> Response<_> {
                let details = err.downcast_ref::<String>().map_or_else(
                    || {
                        err.downcast_ref::<&str>().map_or_else(
                            || "Unknown panic message".to_string(),
                            |s| (*s).to_string(),
                        )
                    },
                    std::clone::Clone::clone,
                );

                error!(%details, "Request handler panicked");

                RelayError::Panic.into_response()
            },
        ))
}

async fn handle_404(method: Method, OriginalUri(uri): OriginalUri) -> RelayError {
    debug!("Unknown route: [{method:?}] {uri:?}");

    RelayError::NotFound
}

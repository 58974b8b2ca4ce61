use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub mod error;

/// A JSON body paired with the status code it is sent with
#[derive(Debug)]
pub struct ApiResponse<TBody> {
    pub status_code: StatusCode,
    pub body: TBody,
}

impl<TBody: Serialize> ApiResponse<TBody> {
    pub const fn new(status_code: StatusCode, body: TBody) -> Self {
        Self { status_code, body }
    }
}

impl<TBody> IntoResponse for ApiResponse<TBody>
where
    TBody: Serialize + Send,
{
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}

impl<TBody> From<TBody> for ApiResponse<TBody>
where
    TBody: Serialize + Send,
{
    fn from(body: TBody) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

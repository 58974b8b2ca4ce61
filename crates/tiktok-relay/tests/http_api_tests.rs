//! Router tests driving the full middleware stack against stub providers.

use std::sync::{Arc, Mutex};

use app_config::Config;
use app_provider::{ExtractionProvider, ProviderError, ProviderResult};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use chrono::DateTime;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tiktok_relay::{build_router, AppState};
use tower::ServiceExt;

/// Answers every call with a fixed JSON payload and remembers the URLs it saw
struct FixedProvider {
    response: Value,
    calls: Mutex<Vec<String>>,
}

impl FixedProvider {
    fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: Mutex::default(),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ExtractionProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn description(&self) -> &'static str {
        "Returns a canned result"
    }

    async fn download(&self, url: &str) -> Result<ProviderResult, ProviderError> {
        self.calls.lock().unwrap().push(url.to_string());
        ProviderResult::from_value(self.response.clone())
    }
}

struct FailingProvider;

#[async_trait::async_trait]
impl ExtractionProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn description(&self) -> &'static str {
        "Always errors"
    }

    async fn download(&self, _url: &str) -> Result<ProviderResult, ProviderError> {
        Err(ProviderError::Parse("upstream exploded".to_string()))
    }
}

struct PanickingProvider;

#[async_trait::async_trait]
impl ExtractionProvider for PanickingProvider {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn description(&self) -> &'static str {
        "Always panics"
    }

    async fn download(&self, _url: &str) -> Result<ProviderResult, ProviderError> {
        panic!("provider bug");
    }
}

fn test_config() -> Config {
    Config::try_parse_from([
        "tiktok-relay",
        "--port",
        "3000",
        "--host",
        "127.0.0.1",
        "--public-url",
        "http://localhost:3000",
        "--cors-allow-origin",
        "*",
        "--cors-allow-headers",
        "Origin, X-Requested-With, Content-Type, Accept",
    ])
    .unwrap()
}

async fn send(provider: Arc<dyn ExtractionProvider>, method: Method, uri: &str) -> Response {
    let app = build_router(AppState::new(test_config(), provider)).unwrap();

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(provider: Arc<dyn ExtractionProvider>, uri: &str) -> Response {
    send(provider, Method::GET, uri).await
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    serde_json::from_slice(&bytes).unwrap()
}

fn video_result() -> Value {
    json!({
        "status": true,
        "creator": "alice",
        "result": {
            "title": "t",
            "image": "i.jpg",
            "dl_link": {
                "download_mp4_1": "a.mp4",
                "download_mp4_hd": "b.mp4",
                "download_mp3": "c.mp3",
            },
        },
    })
}

#[tokio::test]
async fn health_reports_healthy_with_timestamp() {
    let response = get(FixedProvider::new(video_result()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(timestamp.ends_with('Z'));
}

#[tokio::test]
async fn video_post_is_normalized() {
    let provider = FixedProvider::new(video_result());

    let response = get(
        provider.clone(),
        "/download?url=https://vt.tiktok.com/ZS2vSs5fL/",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "success": true,
            "data": {
                "creator": "alice",
                "title": "t",
                "image": "i.jpg",
                "type": "video",
                "downloads": { "mp4": "a.mp4", "mp4_hd": "b.mp4", "mp3": "c.mp3" },
            },
        })
    );
    assert_eq!(provider.calls(), vec!["https://vt.tiktok.com/ZS2vSs5fL/"]);
}

#[tokio::test]
async fn carousel_post_passes_images_through() {
    let images = json!(["https://cdn/1.jpg", "https://cdn/2.jpg"]);
    let provider = FixedProvider::new(json!({
        "status": true,
        "creator": "bob",
        "result": { "title": "pics", "image": "cover.jpg", "dl_link": { "images": images.clone() } },
    }));

    let response = get(provider, "/download?url=https%3A%2F%2Fvt.tiktok.com%2Fabc%2F").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["type"], "images");
    assert_eq!(body["data"]["downloads"], images);
    assert_eq!(body["data"]["creator"], "bob");
    assert_eq!(body["data"]["title"], "pics");
    assert_eq!(body["data"]["image"], "cover.jpg");
}

#[tokio::test]
async fn query_url_is_percent_decoded() {
    let provider = FixedProvider::new(video_result());

    get(
        provider.clone(),
        "/download?url=https%3A%2F%2Fwww.tiktok.com%2F%40user%2Fvideo%2F1",
    )
    .await;

    assert_eq!(
        provider.calls(),
        vec!["https://www.tiktok.com/@user/video/1"]
    );
}

#[tokio::test]
async fn missing_url_is_a_bad_request() {
    for uri in ["/download", "/download?url=", "/download?other=1"] {
        let provider = FixedProvider::new(video_result());

        let response = get(provider.clone(), uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            json_body(response).await,
            json!({
                "error": "TikTok URL is required",
                "example": "http://localhost:3000/download?url=https://vt.tiktok.com/ZS2vSs5fL/",
            })
        );
        assert!(provider.calls().is_empty());
    }
}

#[tokio::test]
async fn repeated_url_parameter_uses_first_value() {
    for (uri, expected) in [
        ("/download?url=a&url=b", "a"),
        ("/download?url=&url=b", "b"),
    ] {
        let provider = FixedProvider::new(video_result());

        let response = get(provider.clone(), uri).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(provider.calls(), vec![expected], "{uri}");
    }
}

#[tokio::test]
async fn paths_ignore_trailing_slash_and_case() {
    for uri in ["/health/", "/HEALTH", "/Health/"] {
        let response = get(FixedProvider::new(video_result()), uri).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(json_body(response).await["status"], "healthy", "{uri}");
    }

    for uri in ["/download/?url=x", "/DOWNLOAD?url=x"] {
        let provider = FixedProvider::new(video_result());

        let response = get(provider.clone(), uri).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(provider.calls(), vec!["x"], "{uri}");
    }
}

#[tokio::test]
async fn provider_values_are_forwarded_untouched() {
    let cases = [
        json!([{ "url": "1.jpg" }, { "url": "2.jpg" }]),
        json!("1.jpg"),
    ];

    for images in cases {
        let provider = FixedProvider::new(json!({
            "status": true,
            "creator": null,
            "result": { "title": 5, "image": null, "dl_link": { "images": images.clone() } },
        }));

        let response = get(provider, "/download?url=x").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "data": {
                    "creator": null,
                    "title": 5,
                    "image": null,
                    "type": "images",
                    "downloads": images,
                },
            })
        );
    }
}

#[tokio::test]
async fn provider_failure_forwards_raw_result() {
    let raw = json!({ "status": false, "message": "Video is private", "code": 403 });

    let response = get(FixedProvider::new(raw.clone()), "/download?url=x").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Failed to process TikTok URL", "details": raw })
    );
}

#[tokio::test]
async fn provider_error_is_an_internal_error() {
    let response = get(Arc::new(FailingProvider), "/download?url=x").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("upstream exploded"));
}

#[tokio::test]
async fn malformed_success_is_an_internal_error() {
    let provider = FixedProvider::new(json!({ "status": true, "creator": "alice" }));

    let response = get(provider, "/download?url=x").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn panics_become_generic_errors() {
    let response = get(Arc::new(PanickingProvider), "/download?url=x").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Something went wrong!" })
    );
}

#[tokio::test]
async fn unknown_routes_are_not_found_for_any_method() {
    let cases = [
        (Method::GET, "/"),
        (Method::GET, "/nope"),
        (Method::POST, "/download"),
        (Method::DELETE, "/health"),
        (Method::PUT, "/v1/download"),
    ];

    for (method, uri) in cases {
        let response = send(
            FixedProvider::new(video_result()),
            method.clone(),
            uri,
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Endpoint not found" })
        );
    }
}

#[tokio::test]
async fn cors_headers_are_on_every_response() {
    for uri in ["/health", "/download", "/missing"] {
        let response = get(FixedProvider::new(video_result()), uri).await;
        let headers = response.headers();

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*", "{uri}");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Origin, X-Requested-With, Content-Type, Accept",
            "{uri}"
        );
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let response = get(FixedProvider::new(video_result()), "/health").await;

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 26);
}

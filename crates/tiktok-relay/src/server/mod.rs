use std::{fmt, net::SocketAddr, sync::Arc};

use anyhow::Context;
use app_config::{server::CorsConfig, Config};
use app_provider::handlers::ProviderEntry;
use axum::{
    extract::ConnectInfo,
    http::{header, uri::PathAndQuery, HeaderValue, Request, Uri},
    response::Response,
};
use listenfd::ListenFd;
use tokio::net::TcpListener;
use tower::{util::MapRequest, Layer, ServiceBuilder};
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, field, info, trace, Span};

mod app_response;
mod routes;

pub const EXAMPLE_POST_URL: &str = "https://vt.tiktok.com/ZS2vSs5fL/";

pub async fn run(config: Config, provider: ProviderEntry) -> anyhow::Result<()> {
    info!("Starting server...");
    let state = AppState::new(config, provider);
    trace!(state = ?state, "Created app state");

    let router = build_router(state.clone())?;

    trace!("Finished building app router");

    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener).context("Failed to create listener")?
        }
        None => {
            let host = state.config.server.host.as_str();
            let port = state.config.server.port;

            TcpListener::bind((host, port))
                .await
                .with_context(|| format!("Failed to bind to {host}:{port}"))?
        }
    };

    let local_addr = listener.local_addr()?;
    info!("Server running on port {}", local_addr.port());
    debug!("Server listening on http://{}", local_addr);

    axum::serve(
        listener,
        axum::ServiceExt::<axum::extract::Request>::into_make_service_with_connect_info::<
            SocketAddr,
        >(router),
    )
    .await?;
    Ok(())
}

/// Routes match without regard to a trailing slash or letter case
pub type RelayService =
    NormalizePath<MapRequest<axum::Router, fn(axum::extract::Request) -> axum::extract::Request>>;

/// The full application: routes, CORS headers, request ids and tracing
pub fn build_router(state: AppState) -> anyhow::Result<RelayService> {
    let cors = CorsHeaders::from_config(&state.config.cors)?;
    let router = add_middlewares(routes::router(), cors).with_state(state);

    let lowercase: fn(axum::extract::Request) -> axum::extract::Request = lowercase_path;
    let service = MapRequest::new(router, lowercase);

    Ok(NormalizePathLayer::trim_trailing_slash().layer(service))
}

fn lowercase_path(mut request: axum::extract::Request) -> axum::extract::Request {
    let uri = request.uri();
    if !uri.path().bytes().any(|b| b.is_ascii_uppercase()) {
        return request;
    }

    let path = uri.path().to_ascii_lowercase();
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let Ok(path_and_query) = path_and_query.parse::<PathAndQuery>() else {
        return request;
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);

    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }

    request
}

#[derive(Clone)]
struct MakeRequestUlid;
impl MakeRequestId for MakeRequestUlid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let mut id = ulid::Ulid::new().to_string();
        id.make_ascii_lowercase();
        let val = HeaderValue::from_str(&id).ok()?;

        Some(RequestId::new(val))
    }
}

type AppRouter = axum::Router<AppState>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: ProviderEntry,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, provider: ProviderEntry) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    #[must_use]
    pub fn example_url(&self) -> String {
        format!(
            "{}/download?url={EXAMPLE_POST_URL}",
            self.config.public_url()
        )
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsHeaders {
    fn from_config(config: &CorsConfig) -> anyhow::Result<Self> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(&config.allow_origin)
                .context("Invalid CORS allow origin")?,
            allow_headers: HeaderValue::from_str(&config.allow_headers)
                .context("Invalid CORS allow headers")?,
        })
    }
}

fn add_middlewares<T>(router: axum::Router<T>, cors: CorsHeaders) -> axum::Router<T>
where
    T: std::clone::Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUlid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<_>| {
                        let m = request.method();
                        let p = request.uri().path();
                        let id = request
                            .extensions()
                            .get::<RequestId>()
                            .and_then(|id| id.header_value().to_str().ok())
                            .unwrap_or("-");
                        let dur = field::Empty;

                        tracing::info_span!("", %id, %m, ?p, dur)
                    })
                    .on_request(|request: &Request<_>, _span: &Span| {
                        let headers = request.headers();
                        let peer = request
                            .extensions()
                            .get::<ConnectInfo<SocketAddr>>()
                            .map_or_else(|| "-".to_string(), |ConnectInfo(addr)| addr.to_string());

                        info!(
                            target: "request",
                            "START \"{method} {uri} {http_type:?}\" {user_agent:?} {ip:?}",
                            http_type = request.version(),
                            method = request.method(),
                            uri = request.uri(),
                            user_agent = headers
                                .get(header::USER_AGENT)
                                .map_or("-", |x| x.to_str().unwrap_or("-")),
                            ip = headers
                                .get("x-forwarded-for")
                                .and_then(|x| x.to_str().ok())
                                .map_or(peer, ToString::to_string),
                        );
                    })
                    .on_response(|response: &Response<_>, latency, span: &Span| {
                        span.record("dur", field::debug(latency));
                        debug!(
                            target: "request",
                            "END {status}",
                            status = response.status().as_u16(),
                        );
                    })
                    .on_body_chunk(())
                    .on_failure(|error, latency, span: &Span| {
                        span.record("dur", field::debug(latency));
                        debug!(
                            target: "request",
                            err = ?error,
                            "ERR: something went wrong",
                        );
                    }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                cors.allow_origin,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                cors.allow_headers,
            )),
    )
}

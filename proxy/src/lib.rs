//! Same-origin rewrite proxy for the CRM API.
//!
//! # Overview
//! Any request to `/api/nationbuilder/{*path}` is forwarded to
//! `{upstream}/{path}` with the incoming query string kept and the access
//! token appended, so browser-side callers never hold the token. Upstream
//! status and body come back unchanged.

pub mod error;

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{OriginalUri, RawQuery, State},
    http::{header, HeaderMap, Method, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

pub use error::ProxyError;

/// Path prefix served by the proxy.
pub const PREFIX: &str = "/api/nationbuilder";

/// Proxy settings, from flags or the environment.
#[derive(Debug, Clone, clap::Parser)]
#[command(author, version, about = "Rewrite proxy for the NationBuilder API")]
pub struct Config {
    /// Nation slug; the upstream becomes https://{slug}.nationbuilder.com/api/v2
    #[clap(long, env = "NB_SLUG")]
    pub slug: Option<String>,

    /// Full upstream API base URL, overriding the one derived from the slug
    #[clap(long, env = "NB_UPSTREAM")]
    pub upstream: Option<String>,

    /// API access token appended to every forwarded request
    #[clap(long, env = "NB_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Port to listen on
    #[clap(long, env = "PROXY_PORT", default_value = "3000")]
    pub port: u16,
}

impl Config {
    pub fn upstream_url(&self) -> Result<String, ProxyError> {
        if let Some(upstream) = &self.upstream {
            return Ok(upstream.trim_end_matches('/').to_string());
        }
        self.slug
            .as_deref()
            .map(|slug| format!("https://{slug}.nationbuilder.com/api/v2"))
            .ok_or(ProxyError::MissingUpstream)
    }
}

#[derive(Clone)]
struct ProxyState {
    upstream: Arc<str>,
    access_token: Arc<str>,
    http: reqwest::Client,
}

pub fn app(config: &Config) -> Result<Router, ProxyError> {
    let state = ProxyState {
        upstream: config.upstream_url()?.into(),
        access_token: config.access_token.as_str().into(),
        http: reqwest::Client::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route(&format!("{PREFIX}/{{*path}}"), any(forward))
        .layer(cors)
        .with_state(state))
}

pub async fn run(listener: TcpListener, config: &Config) -> color_eyre::Result<()> {
    axum::serve(listener, app(config)?).await?;
    Ok(())
}

/// Still-escaped request path below [`PREFIX`], so `a%2Fb` stays one
/// segment upstream.
pub fn upstream_path(request_path: &str) -> &str {
    request_path
        .strip_prefix(PREFIX)
        .unwrap_or(request_path)
        .trim_start_matches('/')
}

/// Upstream URL for `path` and the raw incoming query.
pub fn target_url(upstream: &str, path: &str, query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{upstream}/{path}?{query}"),
        None => format!("{upstream}/{path}"),
    }
}

async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response<Body>, ProxyError> {
    let url = target_url(&state.upstream, upstream_path(uri.path()), query.as_deref());
    debug!(%method, %url, "forwarding");

    let mut request = state
        .http
        .request(method, &url)
        .query(&[("access_token", state.access_token.as_ref())]);
    for name in [header::CONTENT_TYPE, header::ACCEPT] {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value.clone());
        }
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = request.send().await.inspect_err(|e| {
        warn!(%url, error = %e, "upstream unreachable");
    })?;

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await?;

    let mut response = Response::builder().status(status);
    if let Some(content_type) = content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }
    response
        .body(Body::from(bytes))
        .map_err(|e| ProxyError::InvalidResponse(e.to_string()))
}

//! Local development reverse proxy.
//!
//! Serves `/api/*` on the application port and forwards it to the backend
//! so the browser sees a single origin. Cookies the backend sets are
//! rewritten to stick to that origin: no `Domain`, `Path=/`, no `Secure`,
//! and `SameSite=None` downgraded to `Lax`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::any,
};
use clap::Args;
use cookie::{Cookie, SameSite};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use reqwest::redirect::Policy;
use shared::config::ClientConfig;
use tracing::{debug, info, warn};
use url::Url;

/// Largest request body forwarded upstream.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Args, Debug)]
pub struct ProxyArgs {
    /// Port to listen on (defaults to the configured proxy port)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Backend to forward to (defaults to the configured API URL)
    #[arg(long, short)]
    pub target: Option<String>,
}

#[derive(Debug)]
struct ProxyState {
    client: reqwest::Client,
    target: Url,
}

/// Upstream failure, answered with 502.
#[derive(Debug)]
struct ProxyError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ProxyError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "proxy request failed");
        (StatusCode::BAD_GATEWAY, format!("proxy error: {}", self.0)).into_response()
    }
}

pub async fn serve(config: ClientConfig, args: ProxyArgs) -> Result<()> {
    let target = args.target.unwrap_or_else(|| config.api_url.clone());
    let target = Url::parse(&target).with_context(|| format!("invalid proxy target {target}"))?;
    let port = args.port.unwrap_or(config.proxy_port);

    let app = build_router(target.clone())?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, %target, "development proxy listening");
    println!("Proxying http://{addr}/api -> {target}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Router forwarding `/api/*` to `target`.
pub fn build_router(target: Url) -> Result<Router> {
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .context("failed to build proxy HTTP client")?;
    let state = Arc::new(ProxyState { client, target });

    Ok(Router::new()
        .route("/api", any(forward))
        .route("/api/{*path}", any(forward))
        .fallback(|| async { (StatusCode::NOT_FOUND, "only /api is proxied") })
        .with_state(state))
}

async fn forward(
    State(state): State<Arc<ProxyState>>,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", |value| value.as_str());
    let url = state.target.join(path_and_query)?;
    debug!(method = %parts.method, %url, "forwarding");

    let body = to_bytes(body, MAX_BODY_BYTES).await?;
    let upstream = state
        .client
        .request(parts.method, url)
        .headers(forwarded_headers(&parts.headers))
        .body(body)
        .send()
        .await?;

    let mut response = Response::builder().status(upstream.status());
    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name) {
            continue;
        }
        if name == header::SET_COOKIE {
            let rewritten = value
                .to_str()
                .ok()
                .and_then(|raw| HeaderValue::from_str(&rewrite_set_cookie(raw)).ok())
                .unwrap_or_else(|| value.clone());
            response = response.header(name, rewritten);
        } else {
            response = response.header(name, value);
        }
    }
    Ok(response.body(Body::from_stream(upstream.bytes_stream()))?)
}

fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    incoming
        .iter()
        .filter(|(name, _)| *name != header::HOST && !is_hop_by_hop(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "content-length"
    )
}

/// Rewrites a `Set-Cookie` value so the browser stores it for the proxy
/// origin. Unparseable values pass through untouched.
pub fn rewrite_set_cookie(raw: &str) -> String {
    let Ok(mut cookie) = Cookie::parse(raw.to_string()) else {
        return raw.to_string();
    };
    cookie.unset_domain();
    cookie.set_path("/");
    cookie.set_secure(None);
    if cookie.same_site() == Some(SameSite::None) {
        cookie.set_same_site(SameSite::Lax);
    }
    cookie.to_string()
}

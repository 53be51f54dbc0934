//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Match incoming URLs against the inbound rule table
//! - Expand the matched rule target and forward upstream
//! - Rewrite upstream redirects through the outbound rule table
//! - Observability (metrics, correlation IDs)
//!
//! # Data Flow
//! request URL -> parse literal -> inbound match -> expand target ->
//! forward -> rewrite Location -> response

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{request_id, RequestIdLayer, X_REQUEST_ID};
use crate::http::response::rewrite_location;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::RuleRegistry;
use crate::urltemplate::expander;
use crate::urltemplate::params::{BasicParams, ChainedParams};
use crate::urltemplate::parser::parse_literal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RuleRegistry>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the rewriting gateway.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Create a new server over a shared rule registry.
    pub fn new(config: &GatewayConfig, registry: Arc<RuleRegistry>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState { registry, client };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_connections,
            ))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, mut shutdown: Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
            })
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}

/// Main gateway handler. Matches the request URL against the inbound rule
/// table, expands the matched rule target and forwards the request.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let method_str = method.to_string();

    let input_url = reconstruct_url(&request);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %input_url,
        "Gateway request"
    );

    // The table Arc is held for the life of the request, so a config reload
    // mid-flight never changes which rule set this request sees.
    let table = state.registry.table();

    let input = parse_literal(&input_url);
    let (rule, params) = match table.match_inbound(&input) {
        Some(matched) => (matched.value().clone(), matched.into_params()),
        None => {
            tracing::warn!(request_id = %request_id, url = %input_url, "No rewrite rule matched");
            metrics::record_request(&method_str, 404, "none", start_time);
            return (StatusCode::NOT_FOUND, "No matching rewrite rule").into_response();
        }
    };

    let query_params = query_params(request.uri());
    let chained = ChainedParams::new(&params, Some(&query_params));
    let upstream_url =
        match expander::expand(&rule.target, &chained, Some(table.functions())) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, rule = %rule.name, error = %e, "Target expansion failed");
                metrics::record_request(&method_str, 500, &rule.name, start_time);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Rewrite failed").into_response();
            }
        };

    tracing::debug!(
        request_id = %request_id,
        rule = %rule.name,
        upstream = %upstream_url,
        "Forwarding request"
    );

    let (parts, body) = request.into_parts();
    let mut upstream = Request::builder().method(method).uri(upstream_url);
    if let Some(headers) = upstream.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if name != header::HOST {
                headers.insert(name.clone(), value.clone());
            }
        }
        if let Ok(value) = header::HeaderValue::from_str(&request_id) {
            headers.insert(X_REQUEST_ID, value);
        }
    }
    let upstream = match upstream.body(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream request");
            metrics::record_request(&method_str, 500, &rule.name, start_time);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Rewrite failed").into_response();
        }
    };

    match state.client.request(upstream).await {
        Ok(response) => {
            let status = response.status();
            let (mut parts, body) = response.into_parts();
            if let Some(applied) = rewrite_location(&table, table.functions(), &mut parts.headers) {
                tracing::debug!(request_id = %request_id, rule = %applied, "Rewrote Location header");
            }
            metrics::record_request(&method_str, status.as_u16(), &rule.name, start_time);
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, rule = %rule.name, error = %e, "Upstream error");
            metrics::record_request(&method_str, 502, &rule.name, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Rebuilds the full request URL so host-qualified rules can match. Axum
/// hands the handler only the origin form.
fn reconstruct_url(request: &Request<Body>) -> String {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("http://{host}{path_and_query}")
}

/// Request query parameters as a fallback resolver, so rule targets can
/// reference query names the source template did not bind.
fn query_params(uri: &Uri) -> BasicParams {
    let mut params = BasicParams::new();
    if let Some(query) = uri.query() {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((name, value)) => params.add(name, Some(value.to_string())),
                None => params.add(pair, None),
            }
        }
    }
    params
}

//! Refabry Storefront library.
//!
//! Server-rendered storefront for the Refabry catalog: a product listing, a
//! product detail page, and a cash-on-delivery order form. Exposed as a
//! library so the router can be driven from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod order;
pub mod routes;
pub mod state;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Directory static assets are served from, relative to this crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the full storefront application.
///
/// Layers, outermost first: Sentry hub, Sentry transaction, tracing, request
/// ID, security headers.
pub fn app(state: AppState) -> Router {
    let debug = state.config().environment.is_development();
    let csp = middleware::content_security_policy(state.image_base_url());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(debug))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(sentry_tower::NewSentryLayer::new_from_top())
                .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = tracing::field::Empty,
                        )
                    }),
                )
                .layer(from_fn(middleware::request_id_middleware))
                .layer(from_fn_with_state(csp, middleware::security_headers_middleware)),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the upstream API.
async fn health() -> &'static str {
    "ok"
}

//! Integration tests for the Refabry storefront.
//!
//! Each test boots the full storefront router on an ephemeral port, pointed
//! at an `httpmock` server standing in for the Refabry API, and drives it over
//! HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p refabry-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr};

use httpmock::MockServer;
use refabry_storefront::{
    app,
    config::{Environment, RefabryApiConfig, StorefrontConfig},
    state::AppState,
};
use reqwest::{Client, redirect::Policy};

/// Image host the storefront is configured with.
pub const IMAGE_BASE_URL: &str = "https://images.refabry.test/product";

/// A running storefront and its mocked upstream.
pub struct TestContext {
    /// Stand-in for the Refabry API.
    pub upstream: MockServer,
    /// Client that does not follow redirects.
    pub client: Client,
    base_url: String,
}

impl TestContext {
    /// Start a development-mode storefront against a fresh mock upstream.
    ///
    /// # Panics
    ///
    /// Panics if the server can not be started.
    pub async fn start() -> Self {
        let upstream = MockServer::start_async().await;

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            environment: Environment::Development,
            api: RefabryApiConfig {
                base_url: upstream.base_url(),
                image_base_url: IMAGE_BASE_URL.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let addr = config.socket_addr();
        let state = AppState::new(config).expect("Failed to build application state");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind test listener");
        let local = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            upstream,
            client,
            base_url: format!("http://{local}"),
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

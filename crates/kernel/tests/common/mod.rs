//! Shared helpers for kernel integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use showcase_kernel::config::Config;
use showcase_kernel::content::{ContentClient, ContentConfig};
use showcase_kernel::routes;
use showcase_kernel::state::AppState;
use tower::ServiceExt;

/// Address nothing listens on (the discard port).
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub const SITE_URL: &str = "https://showcase.test";

/// Configuration pointing at `content_api_url`.
pub fn test_config(content_api_url: &str) -> Config {
    let vars = [
        ("CONTENT_API_URL", content_api_url.to_string()),
        ("CONTENT_TIMEOUT_MS", "1000".to_string()),
        ("SITE_URL", SITE_URL.to_string()),
        ("SITE_NAME", "Showcase".to_string()),
    ];
    Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test configuration is valid")
}

/// A content client with a short timeout.
pub fn test_client(base_url: &str, timeout: Duration) -> ContentClient {
    ContentClient::new(ContentConfig::new(base_url).with_timeout(timeout))
}

/// The application router wired to a content service at `content_api_url`.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(content_api_url: &str) -> Self {
        let config = test_config(content_api_url);
        let client = ContentClient::new(config.content_config());
        let state = AppState::with_source(&config, Arc::new(client), content_api_url)
            .expect("application state builds");
        Self {
            router: routes::app(state),
        }
    }

    /// Send a GET request to the application.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("valid request"))
            .await
            .expect("Failed to send request")
    }
}

/// Collect a response body as a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}

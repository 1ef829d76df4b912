#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use diet_tracker_api::config::{
    DeepSeekConfig, DietConfig, Environment, UpstreamConfig, UsdaConfig,
};
use diet_tracker_api::{build_router, AppState};
use http_body_util::BodyExt;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::MockServer;

pub const TEST_DEEPSEEK_KEY: &str = "test-deepseek-key";
pub const TEST_USDA_KEY: &str = "test-usda-key";
pub const TEST_MODEL: &str = "deepseek-chat";

/// Router wired to two mock upstreams.
pub struct TestApp {
    pub router: Router,
    pub llm: MockServer,
    pub usda: MockServer,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("response body should be UTF-8")
    }
}

pub fn test_config(llm_base_url: String, usda_base_url: String) -> DietConfig {
    DietConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        environment: Environment::Dev,
        log_level: "error".to_string(),
        otlp_endpoint: None,
        deepseek: DeepSeekConfig {
            api_key: Secret::new(TEST_DEEPSEEK_KEY.to_string()),
            base_url: llm_base_url,
            model: TEST_MODEL.to_string(),
        },
        usda: UsdaConfig {
            api_key: Secret::new(TEST_USDA_KEY.to_string()),
            base_url: usda_base_url,
        },
        upstream: UpstreamConfig {
            timeout: Duration::from_secs(5),
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a config tweak applied after the mock URLs are filled in.
    pub async fn spawn_with(tweak: impl FnOnce(&mut DietConfig)) -> Self {
        let llm = MockServer::start().await;
        let usda = MockServer::start().await;

        let mut config = test_config(llm.uri(), usda.uri());
        tweak(&mut config);

        let state = AppState::from_config(config).expect("Failed to build app state");

        Self {
            router: build_router(state),
            llm,
            usda,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(post_json(uri, body)).await
    }
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// Shared helpers: spin the gateway up on an ephemeral port

#![allow(dead_code)]

use previewgate_core::config::{Environment, PreviewConfig};
use previewgate_core::{AppState, router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use url::Url;
use wiremock::MockServer;

pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn base_config() -> PreviewConfig {
    PreviewConfig::default().with_environment(Environment::Test)
}

pub fn graphql_endpoint(server: &MockServer) -> Url {
    Url::parse(&format!("{}/graphql", server.uri())).unwrap()
}

pub async fn spawn_gateway(config: PreviewConfig) -> TestGateway {
    let state = AppState::new(config).expect("valid test configuration");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestGateway { addr, client }
}

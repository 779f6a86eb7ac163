//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use reqwest::redirect::Policy;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use wiremock::MockServer;

use loadout_bungie::BungieClient;
use loadout_config::{BungieSection, Credentials};
use loadout_server::{Server, ServerConfig};

pub const CLIENT_ID: &str = "12345";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const API_KEY: &str = "test-api-key";

/// A relay server running in the background against a stubbed Bungie.net.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client that does not follow redirects.
    pub client: Client,
    /// Stand-in for Bungie.net.
    pub vendor: MockServer,
    shutdown: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start with default server configuration.
    pub async fn start() -> Result<Self> {
        Self::start_with(|config| config).await
    }

    /// Start with a tweaked server configuration.
    pub async fn start_with(configure: impl FnOnce(ServerConfig) -> ServerConfig) -> Result<Self> {
        let vendor = MockServer::start().await;

        let endpoints = BungieSection {
            authorize_url: format!("{}/en/OAuth/Authorize", vendor.uri()),
            token_url: format!("{}/platform/app/oauth/token/", vendor.uri()),
            api_base_url: format!("{}/Platform", vendor.uri()),
            timeout_secs: 1,
        };
        let bungie = BungieClient::new(
            endpoints,
            Credentials::new(CLIENT_ID, CLIENT_SECRET, API_KEY),
        )?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = configure(
            ServerConfig::new()
                .with_bind_address(addr)
                .with_request_logging(false),
        );
        let server = Server::new(bungie, config);

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await;
        });

        let client = Client::builder().redirect(Policy::none()).build()?;
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            vendor,
            shutdown: Some(tx),
            _handle: handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url(), path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{}", self.base_url(), path))
    }

    /// Number of requests the stubbed vendor has seen.
    pub async fn vendor_calls(&self) -> usize {
        self.vendor
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}

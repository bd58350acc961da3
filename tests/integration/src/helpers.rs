//! Test helpers for integration tests
//!
//! Provides the server handle, authenticated request shortcuts, and
//! status assertions.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use forum_api::{create_app, create_app_state};
use forum_common::AppConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Server under test
pub struct TestServer {
    base_url: String,
    pub client: Client,
    _handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Connect to `TEST_SERVER_URL` or start a server in-process.
    ///
    /// Returns `None` (and the calling test skips) when neither a reachable
    /// server nor a database/Redis/JWT environment is available.
    pub async fn start() -> Option<Self> {
        dotenvy::dotenv().ok();

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .ok()?;

        if let Ok(base_url) = std::env::var("TEST_SERVER_URL") {
            let base_url = base_url.trim_end_matches('/').to_string();
            return match client.get(format!("{base_url}/health")).send().await {
                Ok(response) if response.status().is_success() => Some(Self {
                    base_url,
                    client,
                    _handle: None,
                }),
                _ => {
                    eprintln!("Skipping test: {base_url} is not reachable");
                    None
                }
            };
        }

        if !check_test_env() {
            return None;
        }

        match Self::spawn(client).await {
            Ok(server) => Some(server),
            Err(e) => {
                eprintln!("Skipping test: failed to start server: {e}");
                None
            }
        }
    }

    async fn spawn(client: Client) -> Result<Self> {
        let config = test_config()?;
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            client,
            _handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an `/api/v1` path
    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authed(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET a path outside `/api/v1`, e.g. the health checks
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let builder = self.client.get(self.api(path));
        Ok(Self::authed(builder, token).send().await?)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        let builder = self.client.post(self.api(path)).json(body);
        Ok(Self::authed(builder, token).send().await?)
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .patch(self.api(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .put(self.api(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.api(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}

/// Environment configuration with limits raised for bursty tests
pub fn test_config() -> Result<AppConfig> {
    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.requests_per_second = 10_000;
    config.rate_limit.burst = 10_000;
    config.database.run_migrations = true;
    Ok(config)
}

/// Whether the in-process server can be started
pub fn check_test_env() -> bool {
    for key in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(key).is_err() {
            eprintln!("Skipping test: {key} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

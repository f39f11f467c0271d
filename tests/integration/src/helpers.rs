//! Test helpers for integration tests
//!
//! Spawns an in-process server on an ephemeral port and wraps the HTTP calls
//! the tests make against it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use poker_common::{AppConfig, JwtService};
use poker_gateway::{create_app, create_gateway_state};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{CreateRoomRequest, GuestJoinRequest, GuestSession, RoomView};

/// Secret shared by the test server and the tokens the tests sign
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with default settings and in-memory history
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with extra configuration variables
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
            ("PERSISTENCE_BASE_DELAY_MS".to_string(), "10".to_string()),
        ]);
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }

        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

        let state = create_gateway_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            poker_gateway::server::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            jwt: JwtService::new(TEST_JWT_SECRET),
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get base URL for WebSocket routes
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Sign a token the server accepts
    pub fn token_for(&self, user_id: &str, username: &str) -> String {
        self.jwt
            .issue_token(user_id, Some(username), 3600)
            .unwrap_or_default()
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Create a room as an authenticated user
    pub async fn create_room(&self, token: &str, name: &str) -> Result<RoomView> {
        let response = self
            .post_auth("/rooms", token, &CreateRoomRequest::named(name))
            .await?;
        assert_json(response, StatusCode::CREATED).await
    }

    /// Join a room as a guest by invite code
    pub async fn guest_join(&self, username: &str, room_code: &str) -> Result<GuestSession> {
        let request = GuestJoinRequest {
            username: username.to_string(),
            room_code: room_code.to_string(),
        };
        let response = self.post("/guest/join", &request).await?;
        assert_json(response, StatusCode::OK).await
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
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

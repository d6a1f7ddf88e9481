//! Shared infrastructure for API tests
//!
//! Each [`TestContext`] owns a fresh in-memory store, so tests are
//! independent and need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use taskflow_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskflow_shared::store::MemoryStore;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing the router under test
pub struct TestContext {
    pub app: Router,
    pub config: Config,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Vec<String>,
    pub body: Value,
}

/// A registered user and their bearer token
pub struct Session {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("memory://".to_string()),
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let state = AppState::new(Arc::new(MemoryStore::new()), config.clone());

        Self {
            app: build_router(state),
            config,
        }
    }

    /// Sends a request; `body` is sent as JSON when present
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.dispatch(request).await
    }

    /// Sends a pre-built request
    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.expect("response");

        let status = response.status();
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            set_cookie,
            body,
        }
    }

    /// Registers `username` with a derived email and password `secret1`
    pub async fn register(&self, username: &str) -> Session {
        let email = format!("{}@example.com", username);
        let response = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": email,
                    "password": "secret1",
                })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        Session {
            id: response.body["user"]["id"]
                .as_str()
                .expect("user id")
                .to_string(),
            email,
            token: response.body["token"]
                .as_str()
                .expect("token")
                .to_string(),
        }
    }

    /// Creates a project owned by `owner` and returns its id
    pub async fn create_project(&self, owner: &Session, title: &str) -> String {
        let response = self
            .send(
                "POST",
                "/api/projects",
                Some(&owner.token),
                Some(json!({ "title": title, "description": "Test project" })),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("project id")
            .to_string()
    }
}

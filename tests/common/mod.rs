//! Common test utilities and helpers
//!
//! `TestApp` drives the real router over an in-memory database. It keeps a
//! cookie jar between requests like a browser would, and points the email
//! API and Google tokeninfo endpoint at local mock servers.

#![allow(dead_code)]

use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE, USER_AGENT};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warden::backend::server::init::create_app;
use warden::shared::Config;

pub const GOOGLE_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";
pub const APP_ORIGIN: &str = "http://localhost:5173";
/// Port 9 (discard) has no listener on test machines
const UNREACHABLE_TOKENINFO_URL: &str = "http://127.0.0.1:9/tokeninfo";

/// A response with its body parsed as JSON (`Null` when empty)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub body: Value,
}

impl TestResponse {
    /// The `Set-Cookie` header for `name`, if the response sent one
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}=");
        self.set_cookies
            .iter()
            .find(|c| c.starts_with(&prefix))
            .map(String::as_str)
    }
}

pub struct TestApp {
    router: Router,
    cookies: HashMap<String, String>,
    pub mail: MockServer,
    pub google: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::start(200, None).await
    }

    /// An app whose email API answers every send with `status`
    pub async fn with_mail_status(status: u16) -> Self {
        Self::start(status, None).await
    }

    /// An app whose Google tokeninfo endpoint refuses connections
    pub async fn with_unreachable_google() -> Self {
        Self::start(200, Some(UNREACHABLE_TOKENINFO_URL.to_string())).await
    }

    async fn start(mail_status: u16, tokeninfo_url: Option<String>) -> Self {
        let mail = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(
                ResponseTemplate::new(mail_status).set_body_json(json!({ "id": "email-1" })),
            )
            .mount(&mail)
            .await;

        let google = MockServer::start().await;
        let tokeninfo_url =
            tokeninfo_url.unwrap_or_else(|| format!("{}/tokeninfo", google.uri()));

        let config = Config::builder()
            .database_url("sqlite::memory:")
            .app_origin(APP_ORIGIN)
            .jwt_secret("integration-access-secret")
            .jwt_refresh_secret("integration-refresh-secret")
            .google_client_id(GOOGLE_CLIENT_ID)
            .google_tokeninfo_url(tokeninfo_url)
            .email_api_url(format!("{}/emails", mail.uri()))
            .email_api_key("test-key")
            .cookie_secure(false)
            .bcrypt_cost(4)
            .build()
            .expect("test config");

        let router = create_app(config).await.expect("app");

        Self {
            router,
            cookies: HashMap::new(),
            mail,
            google,
        }
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_AGENT, "warden-tests");

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request = request.header(COOKIE, cookie);
        }

        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        for header in &set_cookies {
            self.store_cookie(header);
        }

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            set_cookies,
            body,
        }
    }

    fn store_cookie(&mut self, header: &str) {
        let pair = header.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        if value.is_empty() || header.contains("Max-Age=0") {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie_value(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn clear_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn register(&mut self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/register",
            json!({ "email": email, "password": password, "confirmPassword": password }),
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post("/auth/login", json!({ "email": email, "password": password }))
            .await
    }

    /// JSON bodies of every email sent so far
    pub async fn sent_emails(&self) -> Vec<Value> {
        self.mail
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// Text body of the most recent email to `to`
    pub async fn last_email_to(&self, to: &str) -> Option<String> {
        self.sent_emails()
            .await
            .into_iter()
            .filter(|email| email["to"][0] == to)
            .last()
            .and_then(|email| email["text"].as_str().map(str::to_string))
    }

    /// Make the mocked tokeninfo endpoint vouch for `email`
    pub async fn mount_google_identity(&self, email: &str) {
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aud": GOOGLE_CLIENT_ID,
                "iss": "https://accounts.google.com",
                "email": email,
                "email_verified": "true",
                "name": "Test User",
                "picture": "https://example.com/avatar.png"
            })))
            .mount(&self.google)
            .await;
    }
}

/// Verification code from the link in a verification email
pub fn verification_code(text: &str) -> Option<String> {
    let (_, rest) = text.split_once("/email/verify/")?;
    rest.split_whitespace().next().map(str::to_string)
}

/// Reset code from the link in a password reset email
pub fn reset_code(text: &str) -> Option<String> {
    let (_, rest) = text.split_once("code=")?;
    rest.split('&').next().map(str::to_string)
}

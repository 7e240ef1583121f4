//! Integration tests for the Tessera server.
//!
//! These tests drive the complete router in-process: settings are loaded
//! from a TOML file, providers from a password file, and resources are
//! served from a temporary document root.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use tessera_api::AppState;
use tessera_auth::{AuthEngine, ProviderRegistry};
use tessera_config::Settings;
use tessera_crypto::password::hash_password;
use tessera_token::FixedClock;

/// Instant the test clock starts at.
pub const START: i64 = 1_700_000_000;

/// Expiry delay configured server-wide.
pub const EXPIRY_DELAY: i64 = 60;

/// Known user and password.
pub const USER: &str = "alice";
/// Password of [`USER`].
pub const PASSWORD: &str = "wonderland";

// ============================================================================
// Test Application
// ============================================================================

/// A router over its own document root, password file and clock.
pub struct TestApp {
    router: Router,
    pub clock: Arc<FixedClock>,
    _dir: TempDir,
}

impl TestApp {
    /// Writes the fixture files and builds the router.
    pub fn start() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        write_fixtures(dir.path())?;

        let settings = Settings::load(dir.path().join("tessera.toml"))?;
        let registry = ProviderRegistry::from_specs(&settings.providers)?;
        let clock = Arc::new(FixedClock::new(START));
        let state = AppState::new(settings, &registry, AuthEngine::new(clock.clone()))?;

        Ok(Self {
            router: tessera_api::router(state),
            clock,
            _dir: dir,
        })
    }

    /// Sends one request through the router.
    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    /// Posts the login form to `path`.
    pub async fn login(
        &self,
        path: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Response> {
        let mut fields = Vec::new();
        if let Some(user) = user {
            fields.push(format!("user={}", user));
        }
        if let Some(password) = password {
            fields.push(format!("password={}", password));
        }

        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(fields.join("&")))?;
        self.send(request).await
    }

    /// Logs in at `path` as [`USER`] and returns the token.
    pub async fn token_from(&self, path: &str) -> Result<String> {
        let response = self.login(path, Some(USER), Some(PASSWORD)).await?;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// GETs `path` with an optional `Authorization` header.
    pub async fn get(&self, path: &str, authorization: Option<&str>) -> Result<Response> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty())?).await
    }
}

/// Reads a response body as text.
pub async fn body_string(response: Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Returns the `WWW-Authenticate` header of `response`.
pub fn challenge(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn toml_path(path: &Path) -> String {
    format!("{:?}", path.display().to_string())
}

fn write_fixtures(root: &Path) -> Result<()> {
    let public = root.join("public");
    fs::create_dir_all(public.join("private/reports"))?;
    fs::create_dir_all(public.join("unnamed"))?;
    fs::write(public.join("index.html"), "welcome")?;
    fs::write(public.join("private/report.txt"), "private report")?;
    fs::write(public.join("private/reports/q1.txt"), "q1 figures")?;
    fs::write(public.join("unnamed/file.txt"), "unreachable")?;

    let passwd = root.join("users.passwd");
    fs::write(
        &passwd,
        format!("# test users\n{}:{}\n", USER, hash_password(PASSWORD)?),
    )?;

    let config = format!(
        r#"
document_root = {public}

[server]
signature_algorithm = "HS256"
signature_secret = "0123456789abcdef0123456789abcdef"
issuer = "tessera"
audience = "dashboard"
expiry_delay = {expiry}

[[provider]]
name = "file"
kind = "password-file"
path = {passwd}

[[location]]
path = "/login"
handler = "login"
providers = ["file"]

[[location]]
path = "/legacy-login"
handler = "login"
providers = ["file"]
signature_algorithm = "HS384"

[[location]]
path = "/empty-login"
handler = "login"

[[location]]
path = "/private"
auth_type = "jwt"
auth_name = "private area"

[[location]]
path = "/private/reports"
auth_type = "jwt"
auth_name = "reports"
audience = "reports"

[[location]]
path = "/unnamed"
auth_type = "jwt"
"#,
        public = toml_path(&public),
        passwd = toml_path(&passwd),
        expiry = EXPIRY_DELAY,
    );
    fs::write(root.join("tessera.toml"), config)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let app = TestApp::start().unwrap();

        let response = app.login("/login", Some(USER), Some(PASSWORD)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await.unwrap()).unwrap();
        assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_login_rejections() {
        let app = TestApp::start().unwrap();

        let wrong = app.login("/login", Some(USER), Some("nope")).await.unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let unknown = app.login("/login", Some("bob"), Some(PASSWORD)).await.unwrap();
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

        let missing = app.login("/login", Some(USER), None).await.unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let no_providers = app
            .login("/empty-login", Some(USER), Some(PASSWORD))
            .await
            .unwrap();
        assert_eq!(no_providers.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_without_form_body_is_unauthorized() {
        let app = TestApp::start().unwrap();

        let empty = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .body(Body::empty())
            .unwrap();
        let response = app.send(empty).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(challenge(&response).is_none());

        let json = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"user":"alice","password":"wonderland"}"#))
            .unwrap();
        let response = app.send(json).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_requires_post() {
        let app = TestApp::start().unwrap();
        let response = app.get("/login", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_public_files_need_no_token() {
        let app = TestApp::start().unwrap();
        let response = app.get("/index.html", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await.unwrap(), "welcome");
    }

    #[tokio::test]
    async fn test_protected_file_with_token() {
        let app = TestApp::start().unwrap();
        let token = app.token_from("/login").await.unwrap();

        let response = app
            .get("/private/report.txt", Some(&bearer(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await.unwrap(), "private report");
    }

    #[tokio::test]
    async fn test_protected_file_without_token() {
        let app = TestApp::start().unwrap();

        let response = app.get("/private/report.txt", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            challenge(&response).unwrap(),
            r#"Bearer realm="private area""#
        );
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_bad_request() {
        let app = TestApp::start().unwrap();

        let response = app
            .get("/private/report.txt", Some("Basic YWxpY2U6d29uZGVybGFuZA=="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            challenge(&response).unwrap(),
            r#"Bearer realm="private area", error="invalid_request", error_description="Authentication type must be Bearer""#
        );
    }

    #[tokio::test]
    async fn test_tampered_token_is_malformed() {
        let app = TestApp::start().unwrap();
        let token = app.token_from("/login").await.unwrap();
        let tampered = format!("{}x", token);

        let response = app
            .get("/private/report.txt", Some(&bearer(&tampered)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(challenge(&response)
            .unwrap()
            .ends_with(r#"error="invalid_token", error_description="Token is malformed""#));
    }

    #[tokio::test]
    async fn test_token_expires() {
        let app = TestApp::start().unwrap();
        let token = app.token_from("/login").await.unwrap();

        app.clock.advance(EXPIRY_DELAY);
        let response = app
            .get("/private/report.txt", Some(&bearer(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        app.clock.advance(1);
        let response = app
            .get("/private/report.txt", Some(&bearer(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(challenge(&response)
            .unwrap()
            .contains(r#"error_description="Token expired""#));
    }

    #[tokio::test]
    async fn test_location_audience_override() {
        let app = TestApp::start().unwrap();
        let token = app.token_from("/login").await.unwrap();

        let response = app
            .get("/private/reports/q1.txt", Some(&bearer(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            challenge(&response).unwrap(),
            r#"Bearer realm="reports", error="invalid_token", error_description="Audience is not valid""#
        );
    }

    #[tokio::test]
    async fn test_missing_realm_is_internal_error() {
        let app = TestApp::start().unwrap();
        let token = app.token_from("/login").await.unwrap();

        let response = app
            .get("/unnamed/file.txt", Some(&bearer(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(challenge(&response).is_none());
        assert!(body_string(response)
            .await
            .unwrap()
            .contains("Internal server error"));
    }

    #[tokio::test]
    async fn test_hs384_tokens_verify_under_hs256() {
        let app = TestApp::start().unwrap();
        let token = app.token_from("/legacy-login").await.unwrap();

        let response = app
            .get("/private/report.txt", Some(&bearer(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

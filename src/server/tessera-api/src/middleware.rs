//! Token gate middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use tessera_config::AuthType;

use crate::error::ApiError;
use crate::state::AppState;

/// Requires a valid bearer token on locations with `auth_type = "jwt"`.
///
/// On success the [`AuthContext`](tessera_auth::AuthContext) is inserted
/// into the request extensions. Requests outside protected locations pass
/// through untouched.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(location) = state.location_for(req.uri().path()) else {
        return Ok(next.run(req).await);
    };
    if location.auth_type != Some(AuthType::Jwt) {
        return Ok(next.run(req).await);
    }

    // Compact tokens are visible ASCII; other bytes leave the token malformed.
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    let config = state.effective(Some(location));
    let context = state.engine().authorize(
        &config,
        location.auth_name.as_deref(),
        authorization.as_deref(),
    )?;

    debug!(user = %context.user, path = %req.uri().path(), "request authorized");
    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::WWW_AUTHENTICATE, HeaderValue, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    use tessera_auth::{AuthContext, AuthEngine, ProviderRegistry};
    use tessera_config::Settings;
    use tessera_token::FixedClock;

    const SETTINGS: &str = r#"
[server]
signature_algorithm = "HS256"
signature_secret = "0123456789abcdef0123456789abcdef"

[[location]]
path = "/private"
auth_type = "jwt"
auth_name = "private area"
"#;

    async fn whoami(Extension(context): Extension<AuthContext>) -> String {
        context.user
    }

    fn app() -> (Router, AppState) {
        let settings: Settings = SETTINGS.parse().unwrap();
        let engine = AuthEngine::new(Arc::new(FixedClock::new(1_700_000_000)));
        let state = AppState::new(settings, &ProviderRegistry::new(), engine).unwrap();
        let router = Router::new()
            .route("/private/whoami", get(whoami))
            .route("/public", get(|| async { "open" }))
            .layer(from_fn_with_state(state.clone(), require_token));
        (router, state)
    }

    fn get_request(uri: &str, authorization: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_context_reaches_handler() {
        let (app, state) = app();
        let location = state.location_for("/private");
        let token = state
            .engine()
            .issue(&state.effective(location), "alice")
            .unwrap();

        let response = app
            .oneshot(get_request(
                "/private/whoami",
                Some(&format!("Bearer {}", token)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn test_missing_token_challenged() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request("/private/whoami", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            r#"Bearer realm="private area""#
        );
    }

    #[tokio::test]
    async fn test_unprotected_path_passes() {
        let (app, _) = app();
        let response = app.oneshot(get_request("/public", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_ascii_bearer_token_is_malformed() {
        let (app, _) = app();
        let request = HttpRequest::builder()
            .uri("/private/whoami")
            .header(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            r#"Bearer realm="private area", error="invalid_token", error_description="Token is malformed""#
        );
    }
}

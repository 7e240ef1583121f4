//! # Tessera API
//!
//! HTTP layer for Tessera.
//!
//! ## Endpoints
//!
//! - `POST <login location>` - exchange `user`/`password` form fields for a
//!   token (`{"token": "..."}`)
//! - everything else - static files under `document_root`, gated by a bearer
//!   token on locations with `auth_type = "jwt"`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{routing::post, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use tessera_config::Handler;

pub use error::ApiError;
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let settings = state.settings();

    let mut router = Router::new();
    for location in settings
        .locations
        .iter()
        .filter(|location| location.handler == Some(Handler::Login))
    {
        router = router.route(&location.path, post(handlers::login));
    }

    router
        .fallback_service(ServeDir::new(&settings.document_root))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_token,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Login handler.

use axum::{
    extract::{rejection::FormRejection, State},
    http::Uri,
    Form, Json,
};
use serde::Deserialize;
use tracing::debug;

use tessera_auth::LoginResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// Posted login form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    /// Username.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// `POST <login location>`: exchanges credentials for a token.
///
/// A body that is not a form carries no credentials and is answered like
/// one with missing fields. Password verification is CPU-bound, so the
/// provider chain runs on the blocking pool.
pub async fn login(
    State(state): State<AppState>,
    uri: Uri,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(error = %rejection, "login body is not a form");
            LoginForm::default()
        },
    };
    let path = uri.path().to_string();
    let response = tokio::task::spawn_blocking(move || {
        let location = state.location_for(&path);
        let config = state.effective(location);
        let chain = state.chain_for(location);
        state.engine().login(
            &config,
            &chain,
            form.user.as_deref(),
            form.password.as_deref(),
        )
    })
    .await??;

    Ok(Json(response))
}

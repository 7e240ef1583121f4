//! Authentication context types.

use serde::Serialize;

use tessera_token::claims::names;
use tessera_token::Claims;

/// Authenticated request context.
///
/// Inserted into the request after a token is accepted so handlers can see
/// who is calling and with which claims.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    /// Value of the token's `user` claim.
    pub user: String,

    /// The full verified claim set.
    pub claims: Claims,
}

impl AuthContext {
    /// Token expiration timestamp (Unix seconds), if readable.
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.time(names::EXPIRES_AT).ok().flatten()
    }
}

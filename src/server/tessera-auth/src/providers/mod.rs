//! Built-in credential providers.

mod file;
mod memory;

pub use file::PasswordFileProvider;
pub use memory::InMemoryProvider;

use tracing::warn;

use tessera_crypto::password::verify_password;

use crate::provider::Decision;

/// Checks `password` against a stored PHC hash.
fn check_hash(username: &str, password: &str, hash: &str) -> Decision {
    match verify_password(password, hash) {
        Ok(true) => Decision::Granted,
        Ok(false) => Decision::Denied,
        Err(e) => {
            warn!(user = username, error = %e, "stored password hash is unusable");
            Decision::Error(e.to_string())
        },
    }
}

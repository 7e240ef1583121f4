//! # Tessera Token
//!
//! Issues and verifies compact signed tokens (JWS, HMAC family).
//!
//! ## Token Format
//!
//! Tokens are standard three-part JWTs: `header.claims.signature`, each part
//! base64url encoded. Every token carries `user` and `iat`; `exp`, `nbf`,
//! `iss`, `sub` and `aud` are added according to configuration.
//!
//! ## Validation
//!
//! Verification enforces the exact key length for the configured algorithm,
//! rejects the unsigned `none` algorithm, compares `iss`/`aud`/`sub` only when
//! the token states them, requires `exp`, and applies a symmetric leeway to
//! `exp` and `nbf`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;

pub use claims::Claims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{Expectations, IssueRequest, TokenCodec};
pub use error::{TokenError, ValidationError};

//! # Tessera Auth
//!
//! Authentication for Tessera.
//!
//! ## Flows
//!
//! - Login: a username/password pair is checked against an ordered
//!   [`ProviderChain`] and, once granted, exchanged for a signed token.
//! - Resource access: a `Bearer` credential is verified against the
//!   effective configuration of the request and turned into an
//!   [`AuthContext`], or refused with a [`Challenge`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chain;
pub mod challenge;
pub mod context;
pub mod engine;
pub mod error;
pub mod provider;
pub mod providers;
pub mod registry;

pub use chain::ProviderChain;
pub use challenge::{Challenge, ChallengeError};
pub use context::AuthContext;
pub use engine::{AuthEngine, LoginResponse, Rejection};
pub use error::{AuthError, Outcome};
pub use provider::{CredentialChecker, Decision};
pub use providers::{InMemoryProvider, PasswordFileProvider};
pub use registry::ProviderRegistry;

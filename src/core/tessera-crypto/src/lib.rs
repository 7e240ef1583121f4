//! # Tessera Crypto
//!
//! Cryptographic building blocks shared by the Tessera crates.
//!
//! This crate provides:
//! - The supported HMAC signature algorithms and their key-length table
//! - A signing secret type with automatic zeroization
//! - Argon2id password hashing for credential providers
//! - Secure random secret generation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod password;
pub mod random;

pub use error::CryptoError;
pub use keys::{SignatureAlgorithm, SigningSecret};

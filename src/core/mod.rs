//! Core components of the `cbp-client` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`CbpClient`] transport and its builder.
//! - Credentials and the request [`Signer`].
//! - The primary [`CbpError`] type.
//! - Shared data models like [`Candle`].

/// The main client (`CbpClient`), builder, signing and retry configuration.
pub mod client;
/// Date parsing shared by history ranges and date-floor pagination.
pub mod dates;
/// The primary error type (`CbpError`) for the crate.
pub mod error;
/// Shared data models used across multiple API modules.
pub mod models;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::CbpClient`
pub use client::{Auth, CbpClient, CbpClientBuilder, Credentials, SignedRequestHeaders, Signer};
pub use dates::parse_instant;
pub use error::CbpError;
pub use models::{Candle, Side};

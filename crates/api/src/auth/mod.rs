//! Identity-provider token verification.
//!
//! - [`jwt`] -- claims, verification config, token validation.

pub mod jwt;

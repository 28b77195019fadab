//! Koda domain logic.
//!
//! Pure types and rules shared by the persistence and HTTP layers. Nothing in
//! this crate performs I/O.

pub mod cart;
pub mod catalog;
pub mod commission;
pub mod error;
pub mod error_keys;
pub mod messaging;
pub mod pagination;
pub mod payment_webhook;
pub mod profile;
pub mod readiness;
pub mod roles;
pub mod types;
pub mod validation;

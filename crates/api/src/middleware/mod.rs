//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- verified token claims only.
//! - [`auth::CurrentUser`] -- the provisioned, non-banned user row.
//! - [`rbac::RequireAdmin`] -- a current user whose stored role is `admin`.

pub mod auth;
pub mod rbac;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Input DTOs for inserts and patches

pub mod conversation;
pub mod listing;
pub mod purchase;
pub mod user;

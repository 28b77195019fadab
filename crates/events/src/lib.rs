//! Koda real-time event bus.
//!
//! - [`EventBus`] in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] the domain event envelope.
//! - [`EventLogSink`] background task that records every event in the log.

pub mod bus;
pub mod sink;

pub use bus::{EventBus, PlatformEvent};
pub use sink::EventLogSink;

/// A payment session was recorded in the purchase ledger.
pub const EVENT_PURCHASE_COMPLETED: &str = "purchase.completed";

/// A message was appended to a conversation.
pub const EVENT_MESSAGE_CREATED: &str = "message.created";

/// A seller published a new listing.
pub const EVENT_LISTING_CREATED: &str = "listing.created";

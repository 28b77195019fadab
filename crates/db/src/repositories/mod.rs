//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod cart_repo;
pub mod conversation_repo;
pub mod favorite_repo;
pub mod listing_repo;
pub mod message_repo;
pub mod purchase_repo;
pub mod user_repo;

pub use cart_repo::CartRepo;
pub use conversation_repo::ConversationRepo;
pub use favorite_repo::FavoriteRepo;
pub use listing_repo::ListingRepo;
pub use message_repo::MessageRepo;
pub use purchase_repo::PurchaseRepo;
pub use user_repo::UserRepo;

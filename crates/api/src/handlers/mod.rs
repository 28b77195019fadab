pub mod admin;
pub mod cart;
pub mod conversations;
pub mod favorites;
pub mod listings;
pub mod purchases;
pub mod users;
pub mod webhooks;

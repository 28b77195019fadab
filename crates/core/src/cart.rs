//! Client-side cart state.
//!
//! [`LocalCart`] is the ordered, duplicate-free set of listing ids a shopper
//! mutates optimistically. It is pushed to durable storage wholesale on an
//! explicit sync, where the last sync wins.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Serialized as a plain JSON array. Decoding drops repeated ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DbId>", into = "Vec<DbId>")]
pub struct LocalCart {
    items: Vec<DbId>,
}

impl From<Vec<DbId>> for LocalCart {
    fn from(ids: Vec<DbId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<LocalCart> for Vec<DbId> {
    fn from(cart: LocalCart) -> Self {
        cart.items
    }
}

impl LocalCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from `ids`, keeping the first occurrence of each id.
    pub fn from_ids(ids: impl IntoIterator<Item = DbId>) -> Self {
        let mut cart = Self::new();
        for id in ids {
            cart.add(id);
        }
        cart
    }

    /// Append `id` unless already present. Returns `true` if it was added.
    pub fn add(&mut self, id: DbId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.items.push(id);
        true
    }

    /// Remove `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: DbId) -> bool {
        let before = self.items.len();
        self.items.retain(|&item| item != id);
        self.items.len() != before
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.items.contains(&id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> &[DbId] {
        &self.items
    }
}

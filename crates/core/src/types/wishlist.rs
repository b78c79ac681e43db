//! Wishlist domain types.
//!
//! A wishlist is the insertion-ordered set of products one user saved for
//! later. Entries are keyed by `(user_id, product_id)`: adding a product that
//! is already present is a no-op, and entries are never edited in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};

/// A saved association between a user and a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Owner of the entry.
    pub user_id: UserId,
    /// The saved product.
    pub product_id: ProductId,
    /// When the product was first added.
    pub added_at: DateTime<Utc>,
}

/// All wishlist entries for one user, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    /// Owner of the wishlist.
    pub user_id: UserId,
    /// Entries in insertion order.
    pub entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// An empty wishlist for `user_id`.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            entries: Vec::new(),
        }
    }

    /// Whether `product_id` is on the wishlist.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product_id == product_id)
    }

    /// Append `product_id` unless it is already present.
    ///
    /// Returns `true` if a new entry was added.
    pub fn insert(&mut self, product_id: ProductId, added_at: DateTime<Utc>) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        self.entries.push(WishlistEntry {
            user_id: self.user_id.clone(),
            product_id,
            added_at,
        });
        true
    }

    /// Remove `product_id` if present, keeping the order of the rest.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product_id != product_id);
        self.entries.len() != before
    }

    /// Product IDs in insertion order.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.entries.iter().map(|e| &e.product_id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the wishlist has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn wishlist() -> Wishlist {
        Wishlist::empty(UserId::parse("u1").unwrap())
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut list = wishlist();
        assert!(list.insert(pid("p1"), Utc::now()));
        assert!(!list.insert(pid("p1"), Utc::now()));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_insert_keeps_first_timestamp() {
        let mut list = wishlist();
        let first = Utc::now();
        list.insert(pid("p1"), first);
        list.insert(pid("p1"), first + chrono::Duration::hours(1));
        assert_eq!(list.entries.first().unwrap().added_at, first);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut list = wishlist();
        for p in ["p2", "p1", "p3"] {
            list.insert(pid(p), Utc::now());
        }
        list.remove(&pid("p1"));
        let ids: Vec<&str> = list.product_ids().map(ProductId::as_str).collect();
        assert_eq!(ids, ["p2", "p3"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut list = wishlist();
        assert!(!list.remove(&pid("p1")));
        assert!(list.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut list = wishlist();
        list.insert(pid("p1"), Utc::now());
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["entries"][0]["productId"], "p1");
        assert_eq!(json["entries"][0]["userId"], "u1");
        assert!(json["entries"][0]["addedAt"].is_string());
    }
}

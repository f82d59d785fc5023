//! Item counts carried by the player.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Item name to count map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count held of an item.
    #[must_use]
    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Whether at least `amount` of an item is held.
    #[must_use]
    pub fn has(&self, item: &str, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Adds items.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative.
    pub fn add(&mut self, item: &str, amount: i32) {
        assert!(amount >= 0, "cannot add a negative amount ({amount}) of {item}");
        if amount == 0 {
            return;
        }
        let slot = self.items.entry(item.to_string()).or_insert(0);
        *slot = slot.saturating_add(amount.unsigned_abs());
    }

    /// Removes items, clamping at zero. Returns the amount actually removed.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative.
    pub fn remove(&mut self, item: &str, amount: i32) -> u32 {
        assert!(amount >= 0, "cannot remove a negative amount ({amount}) of {item}");
        let wanted = amount.unsigned_abs();
        let held = self.count(item);
        if wanted > held {
            warn!("Removing {wanted} {item} but only {held} held; clamping to zero");
        }
        let removed = wanted.min(held);
        if held == removed {
            self.items.remove(item);
        } else if let Some(slot) = self.items.get_mut(item) {
            *slot -= removed;
        }
        removed
    }

    /// Items held, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Number of distinct items held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

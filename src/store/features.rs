use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{ItemFeatures, ItemId, PairFeatures, UserFeatures, UserId};

/// Read-only ranking feature tables
///
/// Built once from decoded artifact rows and shared behind an `Arc`. Lookups
/// return `None` for unknown keys; imputation is the assembler's job.
#[derive(Debug, Default)]
pub struct FeatureStore {
    users: HashMap<UserId, UserFeatures>,
    items: HashMap<ItemId, ItemFeatures>,
    pairs: HashMap<(UserId, ItemId), f64>,
}

impl FeatureStore {
    /// Indexes the three feature datasets. The first row for a key wins.
    pub fn from_rows(
        users: Vec<UserFeatures>,
        items: Vec<ItemFeatures>,
        pairs: Vec<PairFeatures>,
    ) -> Self {
        let mut store = Self::default();
        let mut duplicates = 0usize;

        for row in users {
            match store.users.entry(row.user_id) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
        if duplicates > 0 {
            tracing::warn!(table = "user", duplicates, "Ignored duplicate feature rows");
        }

        duplicates = 0;
        for row in items {
            match store.items.entry(row.item_id) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
        if duplicates > 0 {
            tracing::warn!(table = "item", duplicates, "Ignored duplicate feature rows");
        }

        duplicates = 0;
        for row in pairs {
            match store.pairs.entry((row.user_id, row.item_id)) {
                Entry::Vacant(slot) => {
                    slot.insert(row.als_score);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
        if duplicates > 0 {
            tracing::warn!(table = "user_item", duplicates, "Ignored duplicate feature rows");
        }

        store
    }

    pub fn user(&self, user_id: UserId) -> Option<&UserFeatures> {
        self.users.get(&user_id)
    }

    pub fn item(&self, item_id: ItemId) -> Option<&ItemFeatures> {
        self.items.get(&item_id)
    }

    /// Interaction score for a (user, item) pair
    pub fn pair(&self, user_id: UserId, item_id: ItemId) -> Option<f64> {
        self.pairs.get(&(user_id, item_id)).copied()
    }

    /// Row counts as (users, items, pairs)
    pub fn row_counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.items.len(), self.pairs.len())
    }
}

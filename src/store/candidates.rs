use std::collections::HashMap;

use crate::models::{ItemId, PersonalRow, PopularRow, SimilarRow, UserId};

/// Number of popularity rows kept in memory
pub const POPULAR_POOL_SIZE: usize = 2000;

/// Read-only candidate tables backing the three providers
#[derive(Debug, Default)]
pub struct CandidateTables {
    pub(crate) popular: Vec<ItemId>,
    pub(crate) personal: HashMap<UserId, Vec<ItemId>>,
    pub(crate) similar: HashMap<ItemId, Vec<ItemId>>,
}

impl CandidateTables {
    /// Indexes the candidate datasets
    ///
    /// The popularity chart keeps only its first `pool_size` rows. For the
    /// per-user and per-item tables the first row for a key wins.
    pub fn from_rows(
        popular: Vec<PopularRow>,
        personal: Vec<PersonalRow>,
        similar: Vec<SimilarRow>,
        pool_size: usize,
    ) -> Self {
        let popular: Vec<ItemId> = popular
            .into_iter()
            .take(pool_size)
            .map(|row| row.item_id)
            .collect();

        let mut personal_index = HashMap::with_capacity(personal.len());
        let mut duplicates = 0usize;
        for row in personal {
            if personal_index.contains_key(&row.user_id) {
                duplicates += 1;
                continue;
            }
            personal_index.insert(row.user_id, row.item_id);
        }
        if duplicates > 0 {
            tracing::warn!(table = "personal_als", duplicates, "Ignored duplicate candidate rows");
        }

        let mut similar_index = HashMap::with_capacity(similar.len());
        duplicates = 0;
        for row in similar {
            if similar_index.contains_key(&row.item_id) {
                duplicates += 1;
                continue;
            }
            similar_index.insert(row.item_id, row.item_id_sim);
        }
        if duplicates > 0 {
            tracing::warn!(table = "similar", duplicates, "Ignored duplicate candidate rows");
        }

        Self {
            popular,
            personal: personal_index,
            similar: similar_index,
        }
    }

    /// Row counts as (popular, personal, similar)
    pub fn row_counts(&self) -> (usize, usize, usize) {
        (self.popular.len(), self.personal.len(), self.similar.len())
    }
}

use std::sync::Arc;

use crate::models::{FeatureVector, ItemId, UserId};
use crate::store::FeatureStore;

// Values the ranking model was trained with for missing rows. Changing them
// without retraining skews scores.
pub const DEFAULT_INTERACTION_SCORE: f64 = 0.0;
pub const DEFAULT_NAME_LEN: f64 = 0.0;
pub const DEFAULT_MAIN_GENRE: f64 = 0.0;
pub const DEFAULT_TOP_NUM: f64 = 99999.0;
pub const DEFAULT_INTERACTION_COUNT: f64 = 0.0;

/// Builds model inputs for (user, item) pairs
///
/// User, item and pair lookups are independent: a known user with an unknown
/// item still gets its user-side values.
#[derive(Clone)]
pub struct FeatureAssembler {
    store: Arc<FeatureStore>,
}

impl FeatureAssembler {
    pub fn new(store: Arc<FeatureStore>) -> Self {
        Self { store }
    }

    pub fn assemble(&self, user_id: UserId, item_id: ItemId) -> FeatureVector {
        let (main_genre, interaction_count) = match self.store.user(user_id) {
            Some(row) => (row.main_genre as f64, row.count as f64),
            None => (DEFAULT_MAIN_GENRE, DEFAULT_INTERACTION_COUNT),
        };

        let (top_num, name_len) = match self.store.item(item_id) {
            Some(row) => (row.top_num as f64, row.name_len as f64),
            None => (DEFAULT_TOP_NUM, DEFAULT_NAME_LEN),
        };

        let interaction_score = self
            .store
            .pair(user_id, item_id)
            .unwrap_or(DEFAULT_INTERACTION_SCORE);

        FeatureVector {
            interaction_score,
            name_len,
            main_genre,
            top_num,
            interaction_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemFeatures, PairFeatures, UserFeatures};

    fn create_test_assembler() -> FeatureAssembler {
        let store = FeatureStore::from_rows(
            vec![UserFeatures { user_id: UserId(1), main_genre: 4, count: 17 }],
            vec![ItemFeatures { item_id: ItemId(10), top_num: 3, name_len: 9 }],
            vec![PairFeatures { user_id: UserId(1), item_id: ItemId(10), als_score: 0.8 }],
        );
        FeatureAssembler::new(Arc::new(store))
    }

    #[test]
    fn test_all_rows_present() {
        let features = create_test_assembler().assemble(UserId(1), ItemId(10));
        assert_eq!(features.as_array(), [0.8, 9.0, 4.0, 3.0, 17.0]);
    }

    #[test]
    fn test_unknown_user_gets_user_defaults() {
        let features = create_test_assembler().assemble(UserId::UNKNOWN, ItemId(10));
        assert_eq!(features.main_genre, 0.0);
        assert_eq!(features.interaction_count, 0.0);
        assert_eq!(features.interaction_score, 0.0);
        // item side is still looked up
        assert_eq!(features.top_num, 3.0);
        assert_eq!(features.name_len, 9.0);
    }

    #[test]
    fn test_unknown_item_gets_item_defaults() {
        let features = create_test_assembler().assemble(UserId(1), ItemId(11));
        assert_eq!(features.top_num, 99999.0);
        assert_eq!(features.name_len, 0.0);
        assert_eq!(features.main_genre, 4.0);
        assert_eq!(features.interaction_count, 17.0);
        assert_eq!(features.interaction_score, 0.0);
    }

    #[test]
    fn test_everything_unknown() {
        let features = create_test_assembler().assemble(UserId::UNKNOWN, ItemId::NONE);
        assert_eq!(features.as_array(), [0.0, 0.0, 0.0, 99999.0, 0.0]);
    }
}

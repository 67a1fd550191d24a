use std::sync::Arc;

use super::{CandidateProvider, RequestContext};
use crate::models::{ItemId, Source, UserId};
use crate::store::CandidateTables;

/// Serves precomputed per-user (ALS) recommendations
pub struct PersonalProvider {
    tables: Arc<CandidateTables>,
}

impl PersonalProvider {
    pub fn new(tables: Arc<CandidateTables>) -> Self {
        Self { tables }
    }

    /// Stored list for the user, or empty for a cold-start user
    pub fn personalized(&self, user_id: UserId) -> Vec<ItemId> {
        self.tables
            .personal
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl CandidateProvider for PersonalProvider {
    fn source(&self) -> Source {
        Source::Personal
    }

    fn candidates(&self, ctx: &RequestContext) -> Vec<ItemId> {
        self.personalized(ctx.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalRow;
    use crate::store::POPULAR_POOL_SIZE;

    fn create_test_provider() -> PersonalProvider {
        let rows = vec![
            PersonalRow { user_id: UserId(1), item_id: vec![ItemId(20), ItemId(10)] },
            PersonalRow { user_id: UserId(2), item_id: vec![] },
        ];
        let tables = CandidateTables::from_rows(vec![], rows, vec![], POPULAR_POOL_SIZE);
        PersonalProvider::new(Arc::new(tables))
    }

    #[test]
    fn test_known_user_gets_stored_list_in_order() {
        let provider = create_test_provider();
        assert_eq!(provider.personalized(UserId(1)), vec![ItemId(20), ItemId(10)]);
    }

    #[test]
    fn test_unknown_user_gets_empty_list() {
        let provider = create_test_provider();
        assert!(provider.personalized(UserId(99)).is_empty());
        assert!(provider.personalized(UserId::UNKNOWN).is_empty());
    }

    #[test]
    fn test_known_user_with_empty_row() {
        let provider = create_test_provider();
        let ctx = RequestContext { user_id: UserId(2), item_id: ItemId::NONE };
        assert!(provider.candidates(&ctx).is_empty());
    }
}

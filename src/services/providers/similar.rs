use std::sync::Arc;

use super::{CandidateProvider, RequestContext};
use crate::models::{ItemId, Source};
use crate::store::CandidateTables;

/// Serves item-to-item neighbours of the item currently being consumed
pub struct SimilarProvider {
    tables: Arc<CandidateTables>,
}

impl SimilarProvider {
    pub fn new(tables: Arc<CandidateTables>) -> Self {
        Self { tables }
    }

    /// Neighbours of `item_id`, never including `item_id` itself
    ///
    /// Rows lead with the seed item, so the first entry is skipped. Any later
    /// occurrence of the seed is filtered out as well.
    pub fn similar(&self, item_id: ItemId) -> Vec<ItemId> {
        match self.tables.similar.get(&item_id) {
            Some(row) => row
                .iter()
                .skip(1)
                .filter(|candidate| **candidate != item_id)
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }
}

impl CandidateProvider for SimilarProvider {
    fn source(&self) -> Source {
        Source::Similar
    }

    fn candidates(&self, ctx: &RequestContext) -> Vec<ItemId> {
        self.similar(ctx.item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SimilarRow, UserId};
    use crate::store::POPULAR_POOL_SIZE;

    fn create_test_provider(rows: Vec<SimilarRow>) -> SimilarProvider {
        let tables = CandidateTables::from_rows(vec![], vec![], rows, POPULAR_POOL_SIZE);
        SimilarProvider::new(Arc::new(tables))
    }

    fn row(item_id: i64, sims: &[i64]) -> SimilarRow {
        SimilarRow {
            item_id: ItemId(item_id),
            item_id_sim: sims.iter().copied().map(ItemId).collect(),
            score: vec![],
        }
    }

    #[test]
    fn test_seed_entry_is_dropped() {
        let provider = create_test_provider(vec![row(5, &[5, 30, 40])]);
        assert_eq!(provider.similar(ItemId(5)), vec![ItemId(30), ItemId(40)]);
    }

    #[test]
    fn test_seed_never_returned_even_if_repeated() {
        let provider = create_test_provider(vec![row(5, &[5, 30, 5, 40])]);
        let result = provider.similar(ItemId(5));
        assert!(!result.contains(&ItemId(5)));
        assert_eq!(result, vec![ItemId(30), ItemId(40)]);
    }

    #[test]
    fn test_unknown_item_gets_empty_list() {
        let provider = create_test_provider(vec![row(5, &[5, 30])]);
        assert!(provider.similar(ItemId(6)).is_empty());
        assert!(provider.similar(ItemId::NONE).is_empty());
    }

    #[test]
    fn test_empty_row() {
        let provider = create_test_provider(vec![row(5, &[])]);
        let ctx = RequestContext { user_id: UserId::UNKNOWN, item_id: ItemId(5) };
        assert!(provider.candidates(&ctx).is_empty());
    }
}

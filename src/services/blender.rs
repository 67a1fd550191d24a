use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use super::aggregator::CandidatePool;
use super::features::FeatureAssembler;
use super::providers::{
    CandidateProvider, PersonalProvider, PopularProvider, RequestContext, SimilarProvider,
};
use super::ranker::Ranker;
use super::scoring::Scorer;
use crate::error::BlendError;
use crate::models::{BlendResult, ItemId, Source, UserId};
use crate::store::{CandidateTables, FeatureStore};

/// Number of recommendations returned when the caller does not ask for more
pub const DEFAULT_BEST_N: usize = 10;

/// Request-time recommendation blender
///
/// Owns everything one request needs: the providers, the feature tables and the
/// ranking model, all read-only. Share it behind an `Arc`; `recommend` takes
/// `&self` and holds no locks.
pub struct Blender {
    providers: Vec<Box<dyn CandidateProvider>>,
    ranker: Ranker,
}

impl Blender {
    pub fn new(providers: Vec<Box<dyn CandidateProvider>>, ranker: Ranker) -> Self {
        Self { providers, ranker }
    }

    /// Wires the three standard providers over loaded tables
    pub fn from_tables(
        candidates: Arc<CandidateTables>,
        features: Arc<FeatureStore>,
        scorer: Arc<dyn Scorer>,
        popular_top_n: usize,
    ) -> Self {
        let providers: Vec<Box<dyn CandidateProvider>> = vec![
            Box::new(PopularProvider::new(candidates.clone(), popular_top_n)),
            Box::new(PersonalProvider::new(candidates.clone())),
            Box::new(SimilarProvider::new(candidates)),
        ];
        let ranker = Ranker::new(FeatureAssembler::new(features), scorer);

        Self::new(providers, ranker)
    }

    /// Blends, ranks and truncates candidates for one request
    ///
    /// Unknown users and items are not errors; they simply contribute no
    /// personal or similar candidates and get default features. `best_n` of 0
    /// yields an empty list with every source counted as 0.
    #[instrument(skip(self), fields(pool_size = tracing::field::Empty))]
    pub fn recommend(
        &self,
        user_id: UserId,
        item_id: ItemId,
        best_n: usize,
    ) -> Result<BlendResult, BlendError> {
        let ctx = RequestContext { user_id, item_id };

        // 1. Gather candidates per source
        let mut lists: BTreeMap<Source, Vec<ItemId>> = BTreeMap::new();
        for provider in &self.providers {
            let candidates = provider.candidates(&ctx);
            tracing::debug!(
                source = %provider.source(),
                count = candidates.len(),
                "Provider candidates"
            );
            lists.entry(provider.source()).or_default().extend(candidates);
        }

        // 2. Union with provenance
        let pool = CandidatePool::aggregate(lists);
        let pool_size = pool.len();
        tracing::Span::current().record("pool_size", pool_size);

        // 3. Score
        let mut ranked = self.ranker.rank_all(user_id, pool.items())?;

        // 4. Lowest score first. The model was served this way from the start;
        // flip only together with a re-validated model.
        ranked.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        // 5. Truncate
        let recommendations: Vec<ItemId> = ranked
            .into_iter()
            .take(best_n)
            .map(|scored| scored.item_id)
            .collect();

        // 6. Provenance over the final list only
        let sources = pool.provenance(&recommendations);

        tracing::debug!(
            returned = recommendations.len(),
            sources = ?sources,
            "Blend complete"
        );

        Ok(BlendResult {
            recommendations,
            sources,
            pool_size,
        })
    }
}

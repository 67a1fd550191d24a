use std::sync::Arc;

use super::features::FeatureAssembler;
use super::scoring::Scorer;
use crate::error::RankError;
use crate::models::{FeatureVector, ItemId, ScoredItem, UserId};

/// Scores candidates for one user
///
/// Assembles features per candidate and delegates to the injected model.
#[derive(Clone)]
pub struct Ranker {
    assembler: FeatureAssembler,
    scorer: Arc<dyn Scorer>,
}

impl Ranker {
    pub fn new(assembler: FeatureAssembler, scorer: Arc<dyn Scorer>) -> Self {
        Self { assembler, scorer }
    }

    pub fn score(&self, features: &FeatureVector) -> Result<f64, RankError> {
        self.scorer.score_one(features)
    }

    /// Scores every candidate, in input order
    ///
    /// Fails on the first scorer error or non-finite score; a partial ranking is
    /// never returned.
    pub fn rank_all(
        &self,
        user_id: UserId,
        candidates: &[ItemId],
    ) -> Result<Vec<ScoredItem>, RankError> {
        candidates
            .iter()
            .map(|&item_id| {
                let features = self.assembler.assemble(user_id, item_id);
                let score = self.score(&features)?;
                if !score.is_finite() {
                    return Err(RankError::NonFiniteScore { item_id, score });
                }
                Ok(ScoredItem { item_id, score })
            })
            .collect()
    }
}

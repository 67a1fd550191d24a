use std::sync::Arc;

use super::{CandidateProvider, RequestContext};
use crate::models::{ItemId, Source};
use crate::store::CandidateTables;

/// Number of popularity candidates per request when not configured
pub const DEFAULT_POPULAR_TOP_N: usize = 10;

/// Serves the head of the global popularity chart, whoever is asking
pub struct PopularProvider {
    tables: Arc<CandidateTables>,
    top_n: usize,
}

impl PopularProvider {
    pub fn new(tables: Arc<CandidateTables>, top_n: usize) -> Self {
        Self { tables, top_n }
    }

    /// First `top_n` items of the chart, or the whole chart if it is shorter
    pub fn popularity(&self, top_n: usize) -> Vec<ItemId> {
        self.tables.popular.iter().take(top_n).copied().collect()
    }
}

impl CandidateProvider for PopularProvider {
    fn source(&self) -> Source {
        Source::Popular
    }

    fn candidates(&self, _ctx: &RequestContext) -> Vec<ItemId> {
        self.popularity(self.top_n)
    }
}

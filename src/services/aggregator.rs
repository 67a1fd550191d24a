use std::collections::{BTreeMap, HashSet};

use crate::models::{ItemId, Source};

/// Deduplicated union of all provider candidates for one request
///
/// `items` is in first-seen order, visiting sources in `Source` order. The
/// membership sets remember every source that listed an item, so provenance can
/// be computed after ranking without going back to the providers.
#[derive(Debug, Default)]
pub struct CandidatePool {
    items: Vec<ItemId>,
    membership: BTreeMap<Source, HashSet<ItemId>>,
}

impl CandidatePool {
    /// Unions per-source candidate lists with set semantics
    pub fn aggregate(lists: BTreeMap<Source, Vec<ItemId>>) -> Self {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut membership = BTreeMap::new();

        for (source, candidates) in lists {
            let members: &mut HashSet<ItemId> = membership.entry(source).or_default();
            for item in candidates {
                members.insert(item);
                if seen.insert(item) {
                    items.push(item);
                }
            }
        }

        Self { items, membership }
    }

    /// Pooled candidates, each exactly once
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `source` listed `item` before any truncation
    pub fn contains(&self, source: Source, item: ItemId) -> bool {
        self.membership
            .get(&source)
            .is_some_and(|members| members.contains(&item))
    }

    /// Sources that listed `item`
    pub fn sources_of(&self, item: ItemId) -> Vec<Source> {
        self.membership
            .iter()
            .filter(|(_, members)| members.contains(&item))
            .map(|(source, _)| *source)
            .collect()
    }

    /// For each aggregated source, how many of `selected` it listed
    ///
    /// Every source passed to `aggregate` appears in the result, with zero if
    /// it contributed nothing.
    pub fn provenance(&self, selected: &[ItemId]) -> BTreeMap<Source, usize> {
        self.membership
            .iter()
            .map(|(source, members)| {
                let count = selected.iter().filter(|item| members.contains(item)).count();
                (*source, count)
            })
            .collect()
    }
}

//! Candidate providers
//!
//! Each provider turns the request context into an ordered list of candidate
//! items from one precomputed table. Providers never fail: unknown users or
//! items produce an empty list.

use crate::models::{ItemId, Source, UserId};

pub mod personal;
pub mod popular;
pub mod similar;

pub use personal::PersonalProvider;
pub use popular::PopularProvider;
pub use similar::SimilarProvider;

/// Who is asking and what they are currently consuming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub item_id: ItemId,
}

/// Trait for candidate providers
///
/// Implementations must be cheap to call per request and must not mutate
/// their backing tables.
#[cfg_attr(test, mockall::automock)]
pub trait CandidateProvider: Send + Sync {
    /// Which provenance bucket this provider's candidates count towards
    fn source(&self) -> Source;

    /// Candidates for one request, in provider order
    fn candidates(&self, ctx: &RequestContext) -> Vec<ItemId>;
}

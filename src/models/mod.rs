use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

/// Identifier for a user
///
/// `-1` is the sentinel for an anonymous or new user. It is a valid input and
/// behaves exactly like any id missing from the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub const UNKNOWN: UserId = UserId(-1);
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an item (track)
///
/// `-1` is the sentinel for "no item currently being consumed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub const NONE: ItemId = ItemId(-1);
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate source, serialized under the names downstream consumers already read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "pop_rec")]
    Popular,
    #[serde(rename = "als_rec")]
    Personal,
    #[serde(rename = "sim_items")]
    Similar,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Popular => "pop_rec",
            Source::Personal => "als_rec",
            Source::Similar => "sim_items",
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Feature rows
// ============================================================================

/// Row of the user feature table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserFeatures {
    pub user_id: UserId,
    pub main_genre: i64,
    /// Number of interactions recorded for the user
    pub count: i64,
}

/// Row of the item feature table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemFeatures {
    pub item_id: ItemId,
    /// Position in the global popularity chart
    pub top_num: i64,
    pub name_len: i64,
}

/// Row of the (user, item) feature table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairFeatures {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub als_score: f64,
}

// ============================================================================
// Candidate rows
// ============================================================================

/// Row of the popularity chart. Rows are stored in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopularRow {
    pub item_id: ItemId,
}

/// Row of the personalized recommendation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRow {
    pub user_id: UserId,
    pub item_id: Vec<ItemId>,
}

/// Row of the item-to-item similarity table
///
/// The first entry of `item_id_sim` is the seed item itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarRow {
    pub item_id: ItemId,
    pub item_id_sim: Vec<ItemId>,
    #[serde(default)]
    pub score: Vec<f64>,
}

// ============================================================================
// Ranking types
// ============================================================================

/// Fixed-shape input of the ranking model
///
/// Field order is the order the model was trained with. `as_array` is the only
/// way values reach the model, so reordering fields here does not change scores,
/// but changing `as_array` does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    pub interaction_score: f64,
    pub name_len: f64,
    pub main_genre: f64,
    pub top_num: f64,
    pub interaction_count: f64,
}

impl FeatureVector {
    pub const LEN: usize = 5;

    /// Column names as the model saw them during training
    pub const NAMES: [&'static str; Self::LEN] =
        ["als_score", "name_len", "main_genre", "top_num", "count"];

    pub fn as_array(&self) -> [f64; Self::LEN] {
        [
            self.interaction_score,
            self.name_len,
            self.main_genre,
            self.top_num,
            self.interaction_count,
        ]
    }
}

/// A candidate with its model score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f64,
}

/// Final output of the blender
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendResult {
    pub recommendations: Vec<ItemId>,
    pub sources: BTreeMap<Source, usize>,
    /// Distinct candidates scored before truncation
    pub pool_size: usize,
}

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;

use super::{
    artifact_key, ArtifactSource, ITEM_FEATURES, PAIR_FEATURES, PERSONAL_ALS, RANK_MODEL,
    SIMILAR, TOP_POPULAR, USER_FEATURES,
};
use crate::{
    config::Config,
    error::ArtifactError,
    models::{
        ItemFeatures, PairFeatures, PersonalRow, PopularRow, SimilarRow, UserFeatures,
    },
    services::{Blender, OnnxModel},
    store::{CandidateTables, FeatureStore},
};

/// Fetches one artifact and decodes it as JSON
async fn fetch_json<T: DeserializeOwned>(
    source: &dyn ArtifactSource,
    key: String,
) -> Result<T, ArtifactError> {
    let bytes = source.fetch(&key).await?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Decode { key, source })
}

/// Fetches every artifact, builds the tables and the model, and wires a `Blender`
///
/// Any missing or malformed artifact aborts loading; a blender is never built
/// from partial tables.
pub async fn load_blender(
    source: &dyn ArtifactSource,
    config: &Config,
) -> Result<Blender, ArtifactError> {
    let start = Instant::now();
    let key = |name: &str| artifact_key(&config.artifact_prefix, name);

    tracing::info!(
        source = %source.describe(),
        prefix = %config.artifact_prefix,
        "Loading artifacts"
    );

    let model_key = key(RANK_MODEL);
    let (model_bytes, users, items, pairs, popular, personal, similar) = tokio::try_join!(
        source.fetch(&model_key),
        fetch_json::<Vec<UserFeatures>>(source, key(USER_FEATURES)),
        fetch_json::<Vec<ItemFeatures>>(source, key(ITEM_FEATURES)),
        fetch_json::<Vec<PairFeatures>>(source, key(PAIR_FEATURES)),
        fetch_json::<Vec<PopularRow>>(source, key(TOP_POPULAR)),
        fetch_json::<Vec<PersonalRow>>(source, key(PERSONAL_ALS)),
        fetch_json::<Vec<SimilarRow>>(source, key(SIMILAR)),
    )?;

    let model = OnnxModel::from_bytes(&model_bytes)?;
    tracing::info!(bytes = model_bytes.len(), "Ranking model ready");

    let features = FeatureStore::from_rows(users, items, pairs);
    let (user_rows, item_rows, pair_rows) = features.row_counts();
    tracing::info!(
        users = user_rows,
        items = item_rows,
        pairs = pair_rows,
        "Feature store ready"
    );

    let candidates = CandidateTables::from_rows(popular, personal, similar, config.popular_pool_size);
    let (popular_rows, personal_rows, similar_rows) = candidates.row_counts();
    tracing::info!(
        popular = popular_rows,
        personal = personal_rows,
        similar = similar_rows,
        popular_top_n = config.popular_top_n,
        "Candidate tables ready"
    );

    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "Artifacts loaded");

    Ok(Blender::from_tables(
        Arc::new(candidates),
        Arc::new(features),
        Arc::new(model),
        config.popular_top_n,
    ))
}

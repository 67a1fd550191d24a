//! Start-up artifact loading
//!
//! Everything in here runs once, before the server binds. The request path
//! only ever sees the fully built `Blender`.

use crate::{config::Config, error::ArtifactError};

pub mod loader;
pub mod source;

pub use loader::load_blender;
pub use source::{HttpSource, LocalDirSource, S3Source};

// Artifact keys, relative to the configured prefix
pub const RANK_MODEL: &str = "rank_model.onnx";
pub const USER_FEATURES: &str = "rank_features/user.json";
pub const ITEM_FEATURES: &str = "rank_features/item.json";
pub const PAIR_FEATURES: &str = "rank_features/user_item.json";
pub const TOP_POPULAR: &str = "top_popular.json";
pub const PERSONAL_ALS: &str = "personal_als.json";
pub const SIMILAR: &str = "similar.json";

/// Where artifacts are read from
#[async_trait::async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Raw bytes stored under `key`
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArtifactError>;

    /// Human-readable root for logging
    fn describe(&self) -> String;
}

/// Picks the artifact source from config: an S3 bucket, then an HTTP root,
/// then a local directory.
pub async fn source_from_config(
    config: &Config,
) -> Result<Box<dyn ArtifactSource>, ArtifactError> {
    if let Some(bucket) = &config.artifact_s3_bucket {
        let source = S3Source::from_env(
            bucket.clone(),
            config.artifact_s3_endpoint.clone(),
            config.artifact_s3_region.clone(),
        )
        .await;
        return Ok(Box::new(source));
    }

    match (&config.artifact_base_url, &config.artifact_dir) {
        (Some(url), _) => Ok(Box::new(HttpSource::new(url.clone()))),
        (None, Some(dir)) => Ok(Box::new(LocalDirSource::new(dir.clone()))),
        (None, None) => Err(ArtifactError::NoSource),
    }
}

/// Joins the configured prefix and an artifact key
pub fn artifact_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

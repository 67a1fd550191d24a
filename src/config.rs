use serde::Deserialize;

use crate::services::DEFAULT_BEST_N;
use crate::services::providers::popular::DEFAULT_POPULAR_TOP_N;
use crate::store::POPULAR_POOL_SIZE;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Local directory holding the artifacts
    #[serde(default)]
    pub artifact_dir: Option<String>,

    /// HTTP(S) root of a publicly readable object store. Wins over
    /// `artifact_dir` when both are set.
    #[serde(default)]
    pub artifact_base_url: Option<String>,

    /// S3 bucket holding the artifacts. Wins over every other root. Credentials
    /// come from the standard `AWS_*` environment.
    #[serde(default)]
    pub artifact_s3_bucket: Option<String>,

    /// S3-compatible endpoint, e.g. `https://storage.yandexcloud.net`
    #[serde(default)]
    pub artifact_s3_endpoint: Option<String>,

    /// Signing region; falls back to `AWS_REGION`
    #[serde(default)]
    pub artifact_s3_region: Option<String>,

    /// Key prefix under the artifact root
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// Rows of the popularity chart kept in memory
    #[serde(default = "default_popular_pool_size")]
    pub popular_pool_size: usize,

    /// Popularity candidates per request
    #[serde(default = "default_popular_top_n")]
    pub popular_top_n: usize,

    /// Recommendations returned when the request has no `best_n`
    #[serde(default = "default_best_n")]
    pub default_best_n: usize,

    /// Largest `best_n` a request may ask for
    #[serde(default = "default_max_best_n")]
    pub max_best_n: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_artifact_prefix() -> String {
    "recsys/recommendations".to_string()
}

fn default_popular_pool_size() -> usize {
    POPULAR_POOL_SIZE
}

fn default_popular_top_n() -> usize {
    DEFAULT_POPULAR_TOP_N
}

fn default_best_n() -> usize {
    DEFAULT_BEST_N
}

fn default_max_best_n() -> usize {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.default_best_n == 0 || config.default_best_n > config.max_best_n {
            anyhow::bail!(
                "DEFAULT_BEST_N must be between 1 and MAX_BEST_N ({}), got {}",
                config.max_best_n,
                config.default_best_n
            );
        }

        Ok(config)
    }
}

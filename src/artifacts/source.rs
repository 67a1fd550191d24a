use std::path::PathBuf;

use aws_sdk_s3::{config::Region, Client as S3Client};
use reqwest::Client as HttpClient;

use super::ArtifactSource;
use crate::error::ArtifactError;

/// Reads artifacts from a directory on local disk
pub struct LocalDirSource {
    root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl ArtifactSource for LocalDirSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.root.join(key);
        tracing::debug!(path = %path.display(), "Reading artifact");

        tokio::fs::read(&path).await.map_err(|source| ArtifactError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Downloads artifacts over plain HTTP(S)
///
/// Objects are addressed as `{base_url}/{key}` and fetched unsigned, so the
/// bucket must be readable anonymously. Private buckets go through `S3Source`.
pub struct HttpSource {
    http_client: HttpClient,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait::async_trait]
impl ArtifactSource for HttpSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArtifactError> {
        let url = self.url_for(key);
        tracing::debug!(url = %url, "Downloading artifact");

        let http_error = |source| ArtifactError::Http {
            key: key.to_string(),
            source,
        };

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;

        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads artifacts from an S3-compatible bucket with signed requests
pub struct S3Source {
    client: S3Client,
    bucket: String,
}

impl S3Source {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client from the standard AWS environment
    ///
    /// A custom endpoint switches to path-style addressing, which is what
    /// S3-compatible stores such as Yandex Object Storage expect.
    pub async fn from_env(
        bucket: impl Into<String>,
        endpoint: Option<String>,
        region: Option<String>,
    ) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let aws_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(S3Client::from_conf(builder.build()), bucket)
    }
}

#[async_trait::async_trait]
impl ArtifactSource for S3Source {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArtifactError> {
        tracing::debug!(bucket = %self.bucket, key = %key, "Downloading artifact");

        let s3_error = |source: Box<dyn std::error::Error + Send + Sync>| ArtifactError::S3 {
            key: key.to_string(),
            source,
        };

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| s3_error(e.into()))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| s3_error(e.into()))?;

        Ok(body.into_bytes().to_vec())
    }

    fn describe(&self) -> String {
        format!("s3://{}", self.bucket)
    }
}

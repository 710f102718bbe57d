use aws_config::{BehaviorVersion, Region};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Storage target resolved from the process environment once at startup.
///
/// Credentials are not held here; the SDK picks them up through its
/// default environment chain (`AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("S3_BUCKET").ok(),
            std::env::var("AWS_REGION").ok(),
            std::env::var("S3_ENDPOINT_URL").ok(),
        )
    }

    fn from_vars(
        bucket: Option<String>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: bucket.ok_or(ConfigError::MissingVar("S3_BUCKET"))?,
            region: region.ok_or(ConfigError::MissingVar("AWS_REGION"))?,
            endpoint_url,
        })
    }

    /// Builds an S3 client against the configured region/endpoint.
    pub async fn connect(&self) -> aws_sdk_s3::Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()));
        if let Some(url) = &self.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;
        aws_sdk_s3::Client::new(&sdk_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_bucket_and_region() {
        assert!(matches!(
            StorageConfig::from_vars(None, Some("eu-west-1".into()), None),
            Err(ConfigError::MissingVar("S3_BUCKET"))
        ));
        assert!(matches!(
            StorageConfig::from_vars(Some("uploads".into()), None, None),
            Err(ConfigError::MissingVar("AWS_REGION"))
        ));

        let config = StorageConfig::from_vars(
            Some("uploads".into()),
            Some("eu-west-1".into()),
            Some("https://minio.local:9000".into()),
        )
        .expect("complete config");
        assert_eq!(config.bucket, "uploads");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("https://minio.local:9000"));
    }
}

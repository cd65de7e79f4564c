//! Integration tests for the infratest S3 helpers.
//!
//! These tests require a local S3-compatible endpoint (LocalStack, MinIO) at
//! `localhost:4566`. They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p infratest-integration -- --ignored
//! ```
//!
//! Set `S3_ENDPOINT_URL` to target another endpoint, or set
//! `AWS_ENDPOINT_URL` / credentials as for any AWS tool.

use infratest_core::AwsTestConfig;
use infratest_s3::S3;

/// Endpoint used when neither `S3_ENDPOINT_URL` nor the AWS variables set one.
const DEFAULT_ENDPOINT: &str = "http://localhost:4566";

/// Configuration for the test endpoint, with local-emulator fallbacks.
#[must_use]
pub fn test_config() -> AwsTestConfig {
    let mut config = AwsTestConfig::from_env();

    if let Ok(url) = std::env::var("S3_ENDPOINT_URL") {
        config.endpoint_url = Some(url);
    }
    if config.endpoint_url.is_none() {
        config.endpoint_url = Some(DEFAULT_ENDPOINT.to_owned());
    }
    if config.static_credentials().is_none() {
        config.access_key_id = Some("test".to_owned());
        config.secret_access_key = Some("test".to_owned());
    }
    config.force_path_style = true;

    config
}

/// Connect the helpers to the test endpoint.
pub async fn s3() -> S3 {
    let config = test_config();
    S3::try_connect_with(config.default_region.clone(), &config)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to test endpoint: {e}"))
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name. Caller is responsible for cleanup.
pub async fn create_test_bucket(s3: &S3, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    s3.create_bucket(&name).await;
    name
}

/// Delete all object versions in a bucket, then delete the bucket.
pub async fn cleanup_bucket(s3: &S3, bucket: &str) {
    if let Err(e) = s3.try_empty_bucket(bucket).await {
        tracing::warn!(bucket = %bucket, error = %e, "failed to empty bucket during cleanup");
        return;
    }
    if let Err(e) = s3.try_delete_bucket(bucket).await {
        tracing::warn!(bucket = %bucket, error = %e, "failed to delete bucket during cleanup");
    }
}

mod test_bucket;
mod test_object;
mod test_upload;

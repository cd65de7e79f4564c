//! Bucket configuration helpers: tags, policy, versioning, access logging,
//! ownership controls, and the assertions built on them.

use std::collections::HashMap;

use aws_sdk_s3::operation::get_bucket_logging::GetBucketLoggingOutput;
use aws_sdk_s3::operation::get_bucket_ownership_controls::GetBucketOwnershipControlsOutput;
use aws_sdk_s3::operation::get_bucket_versioning::GetBucketVersioningOutput;
use aws_sdk_s3::types::{
    BucketLoggingStatus, BucketVersioningStatus, LoggingEnabled, MfaDelete, Tag, Tagging,
    VersioningConfiguration,
};
use tracing::info;

use crate::client::S3;
use crate::error::{Result, S3HelperError, must};

impl S3 {
    /// Fetch a bucket's tags as a key/value map.
    pub async fn try_get_bucket_tags(&self, bucket: &str) -> Result<HashMap<String, String>> {
        let out = self
            .client
            .get_bucket_tagging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| S3HelperError::api("GetBucketTagging", e))?;

        Ok(tag_map(out.tag_set()))
    }

    /// Fetch a bucket's tags, failing the test on error.
    pub async fn get_bucket_tags(&self, bucket: &str) -> HashMap<String, String> {
        must("get_bucket_tags", self.try_get_bucket_tags(bucket).await)
    }

    /// Replace a bucket's tag set.
    pub async fn try_put_bucket_tags(
        &self,
        bucket: &str,
        tags: &HashMap<String, String>,
    ) -> Result<()> {
        info!(bucket = %bucket, region = %self.region, count = tags.len(), "applying bucket tags");

        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(tagging(tags)?)
            .send()
            .await
            .map_err(|e| S3HelperError::api("PutBucketTagging", e))?;
        Ok(())
    }

    /// Replace a bucket's tag set, failing the test on error.
    pub async fn put_bucket_tags(&self, bucket: &str, tags: &HashMap<String, String>) {
        must("put_bucket_tags", self.try_put_bucket_tags(bucket, tags).await);
    }

    /// Attach a resource policy (a JSON document) to a bucket.
    pub async fn try_put_bucket_policy(&self, bucket: &str, policy_json: &str) -> Result<()> {
        info!(bucket = %bucket, region = %self.region, "applying bucket policy");

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy_json)
            .send()
            .await
            .map_err(|e| S3HelperError::api("PutBucketPolicy", e))?;
        Ok(())
    }

    /// Attach a resource policy, failing the test on error.
    pub async fn put_bucket_policy(&self, bucket: &str, policy_json: &str) {
        must(
            "put_bucket_policy",
            self.try_put_bucket_policy(bucket, policy_json).await,
        );
    }

    /// Fetch a bucket's resource policy document.
    ///
    /// S3 itself answers `NoSuchBucketPolicy` for a bucket without a policy;
    /// that surfaces as an [`S3HelperError::Api`] error.
    pub async fn try_get_bucket_policy(&self, bucket: &str) -> Result<String> {
        let out = self
            .client
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| S3HelperError::api("GetBucketPolicy", e))?;

        Ok(out.policy().unwrap_or_default().to_owned())
    }

    /// Fetch a bucket's resource policy, failing the test on error.
    pub async fn get_bucket_policy(&self, bucket: &str) -> String {
        must("get_bucket_policy", self.try_get_bucket_policy(bucket).await)
    }

    /// Enable versioning on a bucket, without MFA delete.
    pub async fn try_put_bucket_versioning(&self, bucket: &str) -> Result<()> {
        info!(bucket = %bucket, region = %self.region, "enabling bucket versioning");

        self.client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(enabled_versioning())
            .send()
            .await
            .map_err(|e| S3HelperError::api("PutBucketVersioning", e))?;
        Ok(())
    }

    /// Enable versioning on a bucket, failing the test on error.
    pub async fn put_bucket_versioning(&self, bucket: &str) {
        must(
            "put_bucket_versioning",
            self.try_put_bucket_versioning(bucket).await,
        );
    }

    /// Fetch a bucket's versioning status: `"Enabled"`, `"Suspended"`, or
    /// `""` if versioning was never configured.
    pub async fn try_get_bucket_versioning(&self, bucket: &str) -> Result<String> {
        let out = self
            .client
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| S3HelperError::api("GetBucketVersioning", e))?;

        Ok(versioning_status(&out))
    }

    /// Fetch a bucket's versioning status, failing the test on error.
    pub async fn get_bucket_versioning(&self, bucket: &str) -> String {
        must(
            "get_bucket_versioning",
            self.try_get_bucket_versioning(bucket).await,
        )
    }

    /// Send a bucket's server access logs to `target_bucket` under `target_prefix`.
    pub async fn try_put_bucket_logging(
        &self,
        bucket: &str,
        target_bucket: &str,
        target_prefix: &str,
    ) -> Result<()> {
        info!(
            bucket = %bucket,
            target_bucket = %target_bucket,
            target_prefix = %target_prefix,
            "enabling server access logging",
        );

        let status = BucketLoggingStatus::builder()
            .logging_enabled(
                LoggingEnabled::builder()
                    .target_bucket(target_bucket)
                    .target_prefix(target_prefix)
                    .build()?,
            )
            .build();

        self.client
            .put_bucket_logging()
            .bucket(bucket)
            .bucket_logging_status(status)
            .send()
            .await
            .map_err(|e| S3HelperError::api("PutBucketLogging", e))?;
        Ok(())
    }

    /// Enable server access logging, failing the test on error.
    pub async fn put_bucket_logging(&self, bucket: &str, target_bucket: &str, target_prefix: &str) {
        must(
            "put_bucket_logging",
            self.try_put_bucket_logging(bucket, target_bucket, target_prefix)
                .await,
        );
    }

    /// Fetch the bucket that receives this bucket's access logs.
    pub async fn try_get_bucket_logging_target(&self, bucket: &str) -> Result<String> {
        let out = self.fetch_bucket_logging(bucket).await?;
        let logging = self.logging_enabled(bucket, &out)?;
        Ok(logging.target_bucket().to_owned())
    }

    /// Fetch the access-log target bucket, failing the test on error.
    pub async fn get_bucket_logging_target(&self, bucket: &str) -> String {
        must(
            "get_bucket_logging_target",
            self.try_get_bucket_logging_target(bucket).await,
        )
    }

    /// Fetch the key prefix under which this bucket's access logs are written.
    pub async fn try_get_bucket_logging_target_prefix(&self, bucket: &str) -> Result<String> {
        let out = self.fetch_bucket_logging(bucket).await?;
        let logging = self.logging_enabled(bucket, &out)?;
        Ok(logging.target_prefix().to_owned())
    }

    /// Fetch the access-log key prefix, failing the test on error.
    pub async fn get_bucket_logging_target_prefix(&self, bucket: &str) -> String {
        must(
            "get_bucket_logging_target_prefix",
            self.try_get_bucket_logging_target_prefix(bucket).await,
        )
    }

    /// Fetch the object ownership setting of every ownership-controls rule.
    pub async fn try_get_bucket_ownership_controls(&self, bucket: &str) -> Result<Vec<String>> {
        let out = self
            .client
            .get_bucket_ownership_controls()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| S3HelperError::api("GetBucketOwnershipControls", e))?;

        Ok(ownership_rules(&out))
    }

    /// Fetch ownership-controls rules, failing the test on error.
    pub async fn get_bucket_ownership_controls(&self, bucket: &str) -> Vec<String> {
        must(
            "get_bucket_ownership_controls",
            self.try_get_bucket_ownership_controls(bucket).await,
        )
    }

    /// Check that versioning is enabled on a bucket.
    pub async fn try_assert_bucket_versioning_exists(&self, bucket: &str) -> Result<()> {
        let status = self.try_get_bucket_versioning(bucket).await?;
        if status == BucketVersioningStatus::Enabled.as_str() {
            return Ok(());
        }

        Err(S3HelperError::VersioningNotEnabled {
            bucket: bucket.to_owned(),
            region: self.region.to_string(),
            status,
        })
    }

    /// Check that versioning is enabled, failing the test if it is not.
    pub async fn assert_bucket_versioning_exists(&self, bucket: &str) {
        must(
            "assert_bucket_versioning_exists",
            self.try_assert_bucket_versioning_exists(bucket).await,
        );
    }

    /// Check that a bucket has a non-empty resource policy.
    pub async fn try_assert_bucket_policy_exists(&self, bucket: &str) -> Result<()> {
        let policy = self.try_get_bucket_policy(bucket).await?;
        if !policy.is_empty() {
            return Ok(());
        }

        Err(S3HelperError::NoBucketPolicy {
            bucket: bucket.to_owned(),
            region: self.region.to_string(),
        })
    }

    /// Check that a bucket has a resource policy, failing the test if it does not.
    pub async fn assert_bucket_policy_exists(&self, bucket: &str) {
        must(
            "assert_bucket_policy_exists",
            self.try_assert_bucket_policy_exists(bucket).await,
        );
    }

    async fn fetch_bucket_logging(&self, bucket: &str) -> Result<GetBucketLoggingOutput> {
        self.client
            .get_bucket_logging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| S3HelperError::api("GetBucketLogging", e))
    }

    fn logging_enabled<'a>(
        &self,
        bucket: &str,
        out: &'a GetBucketLoggingOutput,
    ) -> Result<&'a LoggingEnabled> {
        out.logging_enabled()
            .ok_or_else(|| S3HelperError::AccessLoggingNotEnabled {
                bucket: bucket.to_owned(),
                region: self.region.to_string(),
            })
    }
}

fn tag_map(tags: &[Tag]) -> HashMap<String, String> {
    tags.iter()
        .map(|tag| (tag.key().to_owned(), tag.value().to_owned()))
        .collect()
}

/// Build a tag set, ordered by key so requests are reproducible.
fn tagging(tags: &HashMap<String, String>) -> Result<Tagging> {
    let mut pairs: Vec<_> = tags.iter().collect();
    pairs.sort();

    let tag_set = pairs
        .into_iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Tagging::builder().set_tag_set(Some(tag_set)).build()?)
}

fn enabled_versioning() -> VersioningConfiguration {
    VersioningConfiguration::builder()
        .mfa_delete(MfaDelete::Disabled)
        .status(BucketVersioningStatus::Enabled)
        .build()
}

fn versioning_status(out: &GetBucketVersioningOutput) -> String {
    out.status()
        .map(|status| status.as_str().to_owned())
        .unwrap_or_default()
}

fn ownership_rules(out: &GetBucketOwnershipControlsOutput) -> Vec<String> {
    out.ownership_controls()
        .map(|controls| {
            controls
                .rules()
                .iter()
                .map(|rule| rule.object_ownership().as_str().to_owned())
                .collect()
        })
        .unwrap_or_default()
}

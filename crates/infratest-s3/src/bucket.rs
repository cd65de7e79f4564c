//! Bucket lifecycle helpers: create, delete, empty, existence, lookup by tag.

use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::operation::list_object_versions::ListObjectVersionsOutput;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
    ObjectOwnership,
};
use infratest_core::AwsRegion;
use tracing::{debug, info};

use crate::client::S3;
use crate::error::{Result, S3HelperError, must};

/// Tagging errors that mean "this bucket can't be the one", not "give up".
///
/// `ListBuckets` can still return a bucket S3 has already deleted, buckets in
/// other regions reject a request signed for ours (or redirect it with a 301
/// `PermanentRedirect`), and untagged buckets answer with `NoSuchTagSet`.
const SKIPPABLE_TAGGING_ERRORS: &[&str] = &[
    "NoSuchBucket",
    "AuthorizationHeaderMalformed",
    "BucketRegionError",
    "PermanentRedirect",
    "NoSuchTagSet",
];

impl S3 {
    /// Create a bucket owned by the object writer.
    ///
    /// Bucket names are global, so callers should randomize them.
    pub async fn try_create_bucket(&self, name: &str) -> Result<()> {
        info!(bucket = %name, region = %self.region, "creating bucket");

        self.client
            .create_bucket()
            .bucket(name)
            .object_ownership(ObjectOwnership::ObjectWriter)
            .set_create_bucket_configuration(bucket_configuration(&self.region))
            .send()
            .await
            .map_err(|e| S3HelperError::api("CreateBucket", e))?;
        Ok(())
    }

    /// Create a bucket, failing the test on error.
    pub async fn create_bucket(&self, name: &str) {
        must("create_bucket", self.try_create_bucket(name).await);
    }

    /// Delete a bucket. The bucket must already be empty.
    pub async fn try_delete_bucket(&self, name: &str) -> Result<()> {
        info!(bucket = %name, region = %self.region, "deleting bucket");

        self.client
            .delete_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| S3HelperError::api("DeleteBucket", e))?;
        Ok(())
    }

    /// Delete a bucket, failing the test on error.
    pub async fn delete_bucket(&self, name: &str) {
        must("delete_bucket", self.try_delete_bucket(name).await);
    }

    /// Delete every object version and delete marker in a bucket.
    ///
    /// Works page by page: each `ListObjectVersions` page becomes one
    /// `DeleteObjects` batch, which keeps every batch within the 1000 key
    /// limit of a bulk delete.
    pub async fn try_empty_bucket(&self, name: &str) -> Result<()> {
        info!(bucket = %name, region = %self.region, "emptying bucket");

        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;
        let mut deleted = 0_usize;

        loop {
            let page = self
                .client
                .list_object_versions()
                .bucket(name)
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_id_marker.take())
                .send()
                .await
                .map_err(|e| S3HelperError::api("ListObjectVersions", e))?;

            let objects = version_identifiers(&page)?;
            if objects.is_empty() {
                if deleted == 0 {
                    info!(bucket = %name, "bucket is already empty");
                    return Ok(());
                }
                break;
            }

            let batch = objects.len();
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()?;
            let output = self
                .client
                .delete_objects()
                .bucket(name)
                .delete(delete)
                .send()
                .await
                .map_err(|e| S3HelperError::api("DeleteObjects", e))?;
            check_delete_errors(name, &output)?;

            deleted += batch;
            debug!(bucket = %name, batch, deleted, "deleted batch");

            if page.is_truncated() == Some(true) {
                key_marker = page.next_key_marker().map(ToOwned::to_owned);
                version_id_marker = page.next_version_id_marker().map(ToOwned::to_owned);
                info!(
                    bucket = %name,
                    key_marker = ?key_marker,
                    version_id_marker = ?version_id_marker,
                    "requesting next batch",
                );
            } else {
                break;
            }
        }

        info!(bucket = %name, deleted, "bucket is now empty");
        Ok(())
    }

    /// Empty a bucket, failing the test on error.
    pub async fn empty_bucket(&self, name: &str) {
        must("empty_bucket", self.try_empty_bucket(name).await);
    }

    /// Check that a bucket exists and is reachable with our credentials.
    pub async fn try_assert_bucket_exists(&self, name: &str) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| S3HelperError::api("HeadBucket", e))?;
        Ok(())
    }

    /// Check that a bucket exists, failing the test if it does not.
    pub async fn assert_bucket_exists(&self, name: &str) {
        must(
            "assert_bucket_exists",
            self.try_assert_bucket_exists(name).await,
        );
    }

    /// Find the first bucket tagged `key=value`.
    ///
    /// Returns `Ok(None)` when no visible bucket carries the tag.
    pub async fn try_find_bucket_with_tag(&self, key: &str, value: &str) -> Result<Option<String>> {
        let mut continuation_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| S3HelperError::api("ListBuckets", e))?;

            for bucket in resp.buckets() {
                let Some(name) = bucket.name() else {
                    continue;
                };

                let tags = match self.try_get_bucket_tags(name).await {
                    Ok(tags) => tags,
                    Err(err) if is_skippable_tagging_error(&err) => {
                        debug!(bucket = %name, code = ?err.code(), "skipping bucket");
                        continue;
                    }
                    Err(err) => return Err(err),
                };

                if tags.get(key).is_some_and(|v| v == value) {
                    info!(bucket = %name, tag_key = %key, tag_value = %value, "found bucket with tag");
                    return Ok(Some(name.to_owned()));
                }
            }

            match resp.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_owned()),
                _ => return Ok(None),
            }
        }
    }

    /// Find the first bucket tagged `key=value`, failing the test on error.
    pub async fn find_bucket_with_tag(&self, key: &str, value: &str) -> Option<String> {
        must(
            "find_bucket_with_tag",
            self.try_find_bucket_with_tag(key, value).await,
        )
    }
}

/// The `CreateBucketConfiguration` for a region, if it needs one.
fn bucket_configuration(region: &AwsRegion) -> Option<CreateBucketConfiguration> {
    region.needs_location_constraint().then(|| {
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region.as_str()))
            .build()
    })
}

/// Identifiers for every version and delete marker on a listing page.
fn version_identifiers(page: &ListObjectVersionsOutput) -> Result<Vec<ObjectIdentifier>> {
    let versions = page.versions().iter().map(|v| (v.key(), v.version_id()));
    let markers = page
        .delete_markers()
        .iter()
        .map(|m| (m.key(), m.version_id()));

    versions
        .chain(markers)
        .filter_map(|(key, version_id)| {
            key.map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .set_version_id(version_id.map(ToOwned::to_owned))
                    .build()
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(S3HelperError::from)
}

/// Turn per-key failures of a bulk delete into an error.
fn check_delete_errors(bucket: &str, output: &DeleteObjectsOutput) -> Result<()> {
    let errors = output.errors();
    let Some(first) = errors.first() else {
        return Ok(());
    };

    Err(S3HelperError::PartialDelete {
        bucket: bucket.to_owned(),
        failed: errors.len(),
        first: format!(
            "{} (version {}): {} {}",
            first.key().unwrap_or_default(),
            first.version_id().unwrap_or("null"),
            first.code().unwrap_or_default(),
            first.message().unwrap_or_default(),
        ),
    })
}

fn is_skippable_tagging_error(err: &S3HelperError) -> bool {
    SKIPPABLE_TAGGING_ERRORS
        .iter()
        .any(|code| err.is_code(code))
}

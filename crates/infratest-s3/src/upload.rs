//! Multipart uploader for objects too large for a comfortable single `PutObject`.
//!
//! Bodies up to one part go out as a single request. Larger bodies are split
//! into fixed-size parts that are uploaded with bounded concurrency, then
//! stitched together with `CompleteMultipartUpload`. A failed part aborts the
//! upload so no orphaned parts are left billing in the bucket.

use std::ops::Range;

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use crate::error::{Result, S3HelperError, must};

/// Smallest part S3 accepts for every part but the last (5 MiB).
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// Parts uploaded at the same time by default.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Most parts a single multipart upload may have.
pub const MAX_PARTS: usize = 10_000;

/// Result of a completed upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutput {
    /// Entity tag of the stored object.
    pub e_tag: Option<String>,
    /// Version ID, when the bucket is versioned.
    pub version_id: Option<String>,
    /// Multipart upload ID, `None` for single-request uploads.
    pub upload_id: Option<String>,
    /// Number of parts the body was sent in.
    pub parts: usize,
}

/// Uploads objects, switching to multipart upload for large bodies.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    part_size: usize,
    concurrency: usize,
}

impl Uploader {
    /// Create an uploader with 5 MiB parts and a concurrency of 5.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            part_size: MIN_PART_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the part size, clamped to at least [`MIN_PART_SIZE`].
    #[must_use]
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size.max(MIN_PART_SIZE);
        self
    }

    /// Set how many parts are in flight at once (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Configured part size in bytes.
    #[must_use]
    pub fn part_size(&self) -> usize {
        self.part_size
    }

    /// Configured part concurrency.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Upload `body` to `bucket`/`key`.
    pub async fn try_upload(&self, bucket: &str, key: &str, body: Bytes) -> Result<UploadOutput> {
        if body.len() <= self.part_size {
            return self.put_single(bucket, key, body).await;
        }

        let ranges = part_ranges(body.len(), self.part_size);
        if ranges.len() > MAX_PARTS {
            return Err(S3HelperError::TooManyParts {
                size: body.len(),
                parts: ranges.len(),
                limit: MAX_PARTS,
            });
        }

        info!(
            bucket = %bucket,
            key = %key,
            size = body.len(),
            parts = ranges.len(),
            "starting multipart upload",
        );

        let create = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3HelperError::api("CreateMultipartUpload", e))?;
        let upload_id = create
            .upload_id()
            .ok_or(S3HelperError::MissingField {
                operation: "CreateMultipartUpload",
                field: "UploadId",
            })?
            .to_owned();

        let parts = match self
            .upload_parts(bucket, key, &upload_id, &body, ranges)
            .await
        {
            Ok(parts) => parts,
            Err(err) => {
                self.abort(bucket, key, &upload_id).await;
                return Err(err);
            }
        };
        let part_count = parts.len();

        let complete = self
            .client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await;
        let complete = match complete {
            Ok(complete) => complete,
            Err(err) => {
                self.abort(bucket, key, &upload_id).await;
                return Err(S3HelperError::api("CompleteMultipartUpload", err));
            }
        };

        info!(bucket = %bucket, key = %key, parts = part_count, "completed multipart upload");
        Ok(UploadOutput {
            e_tag: complete.e_tag().map(ToOwned::to_owned),
            version_id: complete.version_id().map(ToOwned::to_owned),
            upload_id: Some(upload_id),
            parts: part_count,
        })
    }

    /// Upload `body` to `bucket`/`key`, failing the test on error.
    pub async fn upload(&self, bucket: &str, key: &str, body: Bytes) -> UploadOutput {
        must("upload", self.try_upload(bucket, key, body).await)
    }

    async fn put_single(&self, bucket: &str, key: &str, body: Bytes) -> Result<UploadOutput> {
        debug!(bucket = %bucket, key = %key, size = body.len(), "uploading in a single request");

        let out = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| S3HelperError::api("PutObject", e))?;

        Ok(UploadOutput {
            e_tag: out.e_tag().map(ToOwned::to_owned),
            version_id: out.version_id().map(ToOwned::to_owned),
            upload_id: None,
            parts: 1,
        })
    }

    async fn upload_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        body: &Bytes,
        ranges: Vec<Range<usize>>,
    ) -> Result<Vec<CompletedPart>> {
        let mut parts: Vec<CompletedPart> = stream::iter((1_i32..).zip(ranges))
            .map(|(part_number, range)| {
                let chunk = body.slice(range);
                async move {
                    let out = self
                        .client
                        .upload_part()
                        .bucket(bucket)
                        .key(key)
                        .upload_id(upload_id)
                        .part_number(part_number)
                        .body(ByteStream::from(chunk))
                        .send()
                        .await
                        .map_err(|e| S3HelperError::api("UploadPart", e))?;

                    debug!(part_number, "uploaded part");
                    Ok::<_, S3HelperError>(
                        CompletedPart::builder()
                            .part_number(part_number)
                            .set_e_tag(out.e_tag().map(ToOwned::to_owned))
                            .build(),
                    )
                }
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        parts.sort_by_key(CompletedPart::part_number);
        Ok(parts)
    }

    async fn abort(&self, bucket: &str, key: &str, upload_id: &str) {
        let result = self
            .client
            .abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await;

        if let Err(err) = result {
            warn!(
                bucket = %bucket,
                key = %key,
                upload_id = %upload_id,
                error = %S3HelperError::api("AbortMultipartUpload", err),
                "failed to abort multipart upload",
            );
        }
    }
}

/// Split `len` bytes into consecutive ranges of at most `part_size` bytes.
fn part_ranges(len: usize, part_size: usize) -> Vec<Range<usize>> {
    (0..len)
        .step_by(part_size)
        .map(|start| start..(start + part_size).min(len))
        .collect()
}

//! Object read/write helpers.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::client::S3;
use crate::error::{Result, S3HelperError, must};

impl S3 {
    /// Read an object's full body.
    pub async fn try_get_object_bytes(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3HelperError::api("GetObject", e))?;

        let data = resp.body.collect().await.map_err(|e| S3HelperError::Body {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            message: e.to_string(),
        })?;
        Ok(data.into_bytes())
    }

    /// Read an object's full body, failing the test on error.
    pub async fn get_object_bytes(&self, bucket: &str, key: &str) -> Bytes {
        must(
            "get_object_bytes",
            self.try_get_object_bytes(bucket, key).await,
        )
    }

    /// Read an object's body as UTF-8 text.
    pub async fn try_get_object_contents(&self, bucket: &str, key: &str) -> Result<String> {
        let data = self.try_get_object_bytes(bucket, key).await?;
        let contents = decode_contents(bucket, key, &data)?;

        info!("read contents from s3://{bucket}/{key}");
        Ok(contents)
    }

    /// Read an object's body as UTF-8 text, failing the test on error.
    pub async fn get_object_contents(&self, bucket: &str, key: &str) -> String {
        must(
            "get_object_contents",
            self.try_get_object_contents(bucket, key).await,
        )
    }

    /// Write an object in a single `PutObject` request.
    ///
    /// Anything convertible to a [`ByteStream`] works as a body: `Vec<u8>`,
    /// [`Bytes`], or a stream built with `ByteStream::from_path`.
    pub async fn try_put_object_contents(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<ByteStream>,
    ) -> Result<()> {
        info!("writing contents to s3://{bucket}/{key}");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.into())
            .send()
            .await
            .map_err(|e| S3HelperError::api("PutObject", e))?;
        Ok(())
    }

    /// Write an object, failing the test on error.
    pub async fn put_object_contents(&self, bucket: &str, key: &str, body: impl Into<ByteStream>) {
        must(
            "put_object_contents",
            self.try_put_object_contents(bucket, key, body).await,
        );
    }
}

fn decode_contents(bucket: &str, key: &str, data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|source| S3HelperError::InvalidUtf8 {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
        source,
    })
}

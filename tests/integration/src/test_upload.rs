//! Uploader integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use infratest_s3::upload::MIN_PART_SIZE;

    use crate::{cleanup_bucket, create_test_bucket, s3};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_small_body_in_one_request() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "upsmall").await;

        let out = s3
            .uploader()
            .upload(&bucket, "small.txt", Bytes::from_static(b"tiny"))
            .await;
        assert_eq!(out.parts, 1);
        assert!(out.upload_id.is_none());

        assert_eq!(s3.get_object_contents(&bucket, "small.txt").await, "tiny");

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_large_body_in_parts() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "upmulti").await;

        let body: Vec<u8> = (0..2 * MIN_PART_SIZE + 1024)
            .map(|i| u8::try_from(i % 251).unwrap_or_default())
            .collect();
        let body = Bytes::from(body);

        let out = s3
            .uploader()
            .with_concurrency(2)
            .upload(&bucket, "large.bin", body.clone())
            .await;
        assert_eq!(out.parts, 3);
        assert!(out.upload_id.is_some());
        assert!(out.e_tag.is_some());

        let stored = s3.get_object_bytes(&bucket, "large.bin").await;
        assert_eq!(stored, body);

        cleanup_bucket(&s3, &bucket).await;
    }
}

//! Object read/write integration tests.

#[cfg(test)]
mod tests {
    use infratest_s3::S3HelperError;

    use crate::{cleanup_bucket, create_test_bucket, s3};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_and_get_object_contents() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "contents").await;

        s3.put_object_contents(&bucket, "dir/hello.txt", b"hello, world".to_vec())
            .await;

        let contents = s3.get_object_contents(&bucket, "dir/hello.txt").await;
        assert_eq!(contents, "hello, world");

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_no_such_key_on_get() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "nokey").await;

        let err = s3
            .try_get_object_contents(&bucket, "missing.txt")
            .await
            .expect_err("get nonexistent key should fail");
        assert_eq!(err.code(), Some("NoSuchKey"));

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_binary_contents_as_text() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "binary").await;
        s3.put_object_contents(&bucket, "blob.bin", vec![0xff, 0xfe, 0x00])
            .await;

        let bytes = s3.get_object_bytes(&bucket, "blob.bin").await;
        assert_eq!(bytes.as_ref(), &[0xff, 0xfe, 0x00]);

        let err = s3
            .try_get_object_contents(&bucket, "blob.bin")
            .await
            .expect_err("binary body is not text");
        assert!(matches!(err, S3HelperError::InvalidUtf8 { .. }));

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_put_to_nonexistent_bucket() {
        let s3 = s3().await;

        let err = s3
            .try_put_object_contents(&crate::test_bucket_name("ghost"), "file.txt", b"x".to_vec())
            .await
            .expect_err("put to nonexistent bucket should fail");
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }
}

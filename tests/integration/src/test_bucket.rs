//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_bucket, create_test_bucket, s3, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_delete_bucket() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "create").await;

        s3.assert_bucket_exists(&bucket).await;

        s3.delete_bucket(&bucket).await;

        let result = s3.try_assert_bucket_exists(&bucket).await;
        assert!(result.is_err(), "bucket should be gone after delete");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_nonexistent_bucket() {
        let s3 = s3().await;
        let name = test_bucket_name("ghost");

        let result = s3.try_assert_bucket_exists(&name).await;
        assert!(result.is_err(), "head on nonexistent bucket should fail");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    #[should_panic(expected = "delete_bucket")]
    async fn test_should_panic_deleting_nonexistent_bucket() {
        let s3 = s3().await;
        s3.delete_bucket(&test_bucket_name("nodelete")).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_delete_nonempty_bucket() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "nonempty").await;
        s3.put_object_contents(&bucket, "file.txt", b"data".to_vec())
            .await;

        let err = s3
            .try_delete_bucket(&bucket)
            .await
            .expect_err("deleting nonempty bucket should fail");
        assert!(err.is_code("BucketNotEmpty"), "unexpected error: {err}");

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_bucket_with_object_writer_ownership() {
        let s3 = s3().await;
        let bucket = create_test_bucket(&s3, "owner").await;

        let rules = s3.get_bucket_ownership_controls(&bucket).await;
        assert_eq!(rules, vec!["ObjectWriter".to_owned()]);

        cleanup_bucket(&s3, &bucket).await;
    }
}

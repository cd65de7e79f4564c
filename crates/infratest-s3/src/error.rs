//! Error types for the S3 helpers.
//!
//! [`S3HelperError`] covers SDK call failures (keeping the S3 error code so
//! callers can branch on it) and the assertion failures raised by the
//! `assert_*` helpers.

use aws_sdk_s3::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use infratest_core::InfraTestError;

/// S3 helper error type.
#[derive(Debug, thiserror::Error)]
pub enum S3HelperError {
    /// Building the authenticated session or client failed.
    #[error(transparent)]
    Session(#[from] InfraTestError),

    /// An S3 API call failed.
    #[error("{operation} failed: {message}")]
    Api {
        /// S3 operation name, e.g. `"CreateBucket"`.
        operation: &'static str,
        /// S3 error code when the service returned one, e.g. `"NoSuchBucket"`.
        code: Option<String>,
        /// Full error chain as rendered by the SDK.
        message: String,
    },

    /// A request could not be built from the given arguments.
    #[error("invalid request: {0}")]
    Build(#[from] BuildError),

    /// A response lacked a field the helper depends on.
    #[error("{operation} response is missing {field}")]
    MissingField {
        /// S3 operation name.
        operation: &'static str,
        /// Missing field name.
        field: &'static str,
    },

    /// Server access logging is not configured on the bucket.
    #[error("Server Access Logging hasn't been enabled for S3 Bucket {bucket} in region {region}")]
    AccessLoggingNotEnabled {
        /// Bucket that was inspected.
        bucket: String,
        /// Region of the bucket.
        region: String,
    },

    /// Versioning is not in the `Enabled` state.
    #[error("Versioning status for bucket {bucket} in region {region} is {status:?}, expected \"Enabled\"")]
    VersioningNotEnabled {
        /// Bucket that was inspected.
        bucket: String,
        /// Region of the bucket.
        region: String,
        /// Status actually reported, empty if versioning was never configured.
        status: String,
    },

    /// The bucket has no resource policy attached.
    #[error("No bucket policy found for bucket {bucket} in region {region}")]
    NoBucketPolicy {
        /// Bucket that was inspected.
        bucket: String,
        /// Region of the bucket.
        region: String,
    },

    /// Streaming an object body failed.
    #[error("failed to read body of s3://{bucket}/{key}: {message}")]
    Body {
        /// Bucket of the object.
        bucket: String,
        /// Key of the object.
        key: String,
        /// Stream error.
        message: String,
    },

    /// An object body was expected to be text but is not valid UTF-8.
    #[error("contents of s3://{bucket}/{key} are not valid UTF-8")]
    InvalidUtf8 {
        /// Bucket of the object.
        bucket: String,
        /// Key of the object.
        key: String,
        /// Decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// `DeleteObjects` succeeded overall but rejected some keys.
    #[error("failed to delete {failed} object(s) from bucket {bucket}, first: {first}")]
    PartialDelete {
        /// Bucket being emptied.
        bucket: String,
        /// Number of rejected keys.
        failed: usize,
        /// Description of the first rejected key.
        first: String,
    },

    /// The body needs more parts than a multipart upload allows.
    #[error("upload of {size} bytes needs {parts} parts, more than the limit of {limit}")]
    TooManyParts {
        /// Body size in bytes.
        size: usize,
        /// Parts required at the configured part size.
        parts: usize,
        /// Multipart upload part limit.
        limit: usize,
    },
}

impl S3HelperError {
    /// Wrap an SDK error, keeping its service error code.
    pub(crate) fn api<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        Self::Api {
            operation,
            code: err.code().map(ToOwned::to_owned),
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    /// The S3 error code, if this error came from the service.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether the service error code, or the rendered message, names `code`.
    ///
    /// Some endpoints answer with an empty error body (HEAD requests, region
    /// redirects), so the code only shows up in the rendered message.
    #[must_use]
    pub fn is_code(&self, code: &str) -> bool {
        match self {
            Self::Api {
                code: Some(actual), ..
            } => actual == code,
            Self::Api { message, .. } => message.contains(code),
            _ => false,
        }
    }
}

/// Convenience result type for S3 helpers.
pub type Result<T> = std::result::Result<T, S3HelperError>;

/// Unwrap a helper result, failing the calling test on error.
#[track_caller]
pub(crate) fn must<T>(helper: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{helper}: {err}"),
    }
}

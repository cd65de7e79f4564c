//! Error types for the infratest core.

/// Core error type for session and configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum InfraTestError {
    /// A configuration value is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable credentials could be resolved for the session.
    #[error("failed to resolve AWS credentials for region {region}: {message}")]
    Credentials {
        /// Region the session was being built for.
        region: String,
        /// Error reported by the credentials provider.
        message: String,
    },
}

/// Convenience result type for infratest core operations.
pub type InfraTestResult<T> = Result<T, InfraTestError>;

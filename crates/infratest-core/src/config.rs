//! Configuration for infratest helpers.
//!
//! Provides [`AwsTestConfig`], loaded from the same environment variables the
//! AWS CLI and SDKs honor, so that test suites can be pointed at real AWS or
//! at a local S3-compatible endpoint without code changes.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::AwsRegion;

/// Connection settings shared by every helper in a test run.
///
/// # Examples
///
/// ```
/// use infratest_core::AwsTestConfig;
///
/// let config = AwsTestConfig::builder()
///     .endpoint_url("http://localhost:4566".to_owned())
///     .force_path_style(true)
///     .build();
/// assert_eq!(config.default_region.as_str(), "us-east-1");
/// assert!(config.static_credentials().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct AwsTestConfig {
    /// Region used when a helper is not given one explicitly.
    #[builder(default)]
    pub default_region: AwsRegion,

    /// Endpoint override, e.g. a LocalStack or MinIO URL.
    #[builder(default, setter(strip_option))]
    pub endpoint_url: Option<String>,

    /// Static access key ID. Only used together with `secret_access_key`.
    #[builder(default, setter(strip_option))]
    pub access_key_id: Option<String>,

    /// Static secret access key. Only used together with `access_key_id`.
    #[builder(default, setter(strip_option))]
    pub secret_access_key: Option<String>,

    /// Optional session token for temporary static credentials.
    #[builder(default, setter(strip_option))]
    pub session_token: Option<String>,

    /// Whether S3 requests use path-style addressing.
    #[builder(default = false)]
    pub force_path_style: bool,

    /// Log level filter string used when `RUST_LOG` is unset.
    #[builder(default = String::from("warn"))]
    pub log_level: String,
}

impl Default for AwsTestConfig {
    fn default() -> Self {
        Self {
            default_region: AwsRegion::default(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            force_path_style: false,
            log_level: String::from("warn"),
        }
    }
}

impl AwsTestConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_REGION` / `AWS_DEFAULT_REGION` | `us-east-1` |
    /// | `AWS_ENDPOINT_URL_S3` / `AWS_ENDPOINT_URL` | *(unset)* |
    /// | `AWS_ACCESS_KEY_ID` | *(unset)* |
    /// | `AWS_SECRET_ACCESS_KEY` | *(unset)* |
    /// | `AWS_SESSION_TOKEN` | *(unset)* |
    /// | `S3_FORCE_PATH_STYLE` | `false` |
    /// | `LOG_LEVEL` | `warn` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = first_env(&["AWS_REGION", "AWS_DEFAULT_REGION"]) {
            config.default_region = AwsRegion::new(v);
        }
        config.endpoint_url = first_env(&["AWS_ENDPOINT_URL_S3", "AWS_ENDPOINT_URL"]);
        config.access_key_id = first_env(&["AWS_ACCESS_KEY_ID"]);
        config.secret_access_key = first_env(&["AWS_SECRET_ACCESS_KEY"]);
        config.session_token = first_env(&["AWS_SESSION_TOKEN"]);
        if let Some(v) = first_env(&["S3_FORCE_PATH_STYLE"]) {
            config.force_path_style = parse_bool(&v);
        }
        if let Some(v) = first_env(&["LOG_LEVEL"]) {
            config.log_level = v;
        }

        config
    }

    /// The static key pair, if both halves are configured.
    #[must_use]
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

/// First non-empty value among the given environment variables.
fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.is_empty())
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

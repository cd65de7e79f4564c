//! Common AWS type definitions shared across helpers.

use std::fmt;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region, and the only one where S3 rejects an explicit location constraint.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether bucket creation in this region must carry a location constraint.
    #[must_use]
    pub fn needs_location_constraint(&self) -> bool {
        self.0 != Self::DEFAULT
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AwsRegion {
    fn from(region: &str) -> Self {
        Self::new(region)
    }
}

impl From<String> for AwsRegion {
    fn from(region: String) -> Self {
        Self(region)
    }
}

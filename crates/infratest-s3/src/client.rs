//! S3 client construction and the [`S3`] helper handle.

use aws_sdk_s3::Client;
use infratest_core::{AwsRegion, AwsTestConfig, init_tracing, new_authenticated_session};
use tracing::debug;

use crate::error::{Result, must};
use crate::upload::Uploader;

/// Create an S3 client for `region` from an authenticated session.
///
/// Applies the endpoint override and path-style addressing from `config`.
pub async fn try_new_s3_client(region: &AwsRegion, config: &AwsTestConfig) -> Result<Client> {
    let sdk_config = new_authenticated_session(region, config).await?;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.force_path_style)
        .build();

    debug!(region = %region, force_path_style = config.force_path_style, "created S3 client");
    Ok(Client::from_conf(s3_config))
}

/// Create an S3 client for `region` using configuration from the environment.
pub async fn new_s3_client(region: impl Into<AwsRegion>) -> Client {
    let region = region.into();
    must(
        "new_s3_client",
        try_new_s3_client(&region, &AwsTestConfig::from_env()).await,
    )
}

/// An S3 client bound to the region its helpers operate in.
///
/// Cloning is cheap; the underlying SDK client is reference counted.
#[derive(Debug, Clone)]
pub struct S3 {
    pub(crate) client: Client,
    pub(crate) region: AwsRegion,
}

impl S3 {
    /// Wrap an existing SDK client.
    #[must_use]
    pub fn from_client(client: Client, region: impl Into<AwsRegion>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Connect to S3 in `region` with configuration from the environment.
    pub async fn try_connect(region: impl Into<AwsRegion>) -> Result<Self> {
        Self::try_connect_with(region, &AwsTestConfig::from_env()).await
    }

    /// Connect to S3 in `region`, failing the test on error.
    pub async fn connect(region: impl Into<AwsRegion>) -> Self {
        must("connect", Self::try_connect(region).await)
    }

    /// Connect to S3 in `region` with explicit configuration.
    ///
    /// Also installs the test tracing subscriber at `config.log_level`.
    pub async fn try_connect_with(
        region: impl Into<AwsRegion>,
        config: &AwsTestConfig,
    ) -> Result<Self> {
        init_tracing(&config.log_level);

        let region = region.into();
        let client = try_new_s3_client(&region, config).await?;
        Ok(Self { client, region })
    }

    /// The underlying SDK client, for calls no helper covers.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The region this handle operates in.
    #[must_use]
    pub fn region(&self) -> &AwsRegion {
        &self.region
    }

    /// A multipart uploader sharing this handle's client.
    #[must_use]
    pub fn uploader(&self) -> Uploader {
        Uploader::new(self.client.clone())
    }
}

//! Authenticated SDK session loading.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use tracing::debug;

use crate::config::AwsTestConfig;
use crate::error::{InfraTestError, InfraTestResult};
use crate::types::AwsRegion;

/// Provider name attached to credentials taken from [`AwsTestConfig`].
const STATIC_PROVIDER_NAME: &str = "infratest-static";

/// Load an SDK configuration for `region` and make sure it can authenticate.
///
/// Starts from the SDK default chain (environment, profile, IMDS, ...), then
/// applies the endpoint override and static key pair from `config` when
/// present. Credentials are resolved once up front so that a misconfigured
/// environment fails here instead of on the first API call.
pub async fn new_authenticated_session(
    region: &AwsRegion,
    config: &AwsTestConfig,
) -> InfraTestResult<SdkConfig> {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

    if let Some(url) = &config.endpoint_url {
        validate_endpoint(url)?;
        loader = loader.endpoint_url(url.clone());
    }
    if let Some((id, secret)) = config.static_credentials() {
        loader = loader.credentials_provider(Credentials::new(
            id,
            secret,
            config.session_token.clone(),
            None,
            STATIC_PROVIDER_NAME,
        ));
    }

    let sdk_config = loader.load().await;

    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| InfraTestError::Credentials {
            region: region.to_string(),
            message: "no credentials provider configured".to_owned(),
        })?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| InfraTestError::Credentials {
            region: region.to_string(),
            message: e.to_string(),
        })?;

    debug!(region = %region, endpoint = ?config.endpoint_url, "authenticated session ready");
    Ok(sdk_config)
}

/// An endpoint override must be an absolute `http` or `https` URL with a host.
fn validate_endpoint(url: &str) -> InfraTestResult<()> {
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            InfraTestError::Config(format!(
                "endpoint URL {url:?} must start with http:// or https://"
            ))
        })?;

    if host.is_empty() || host.starts_with('/') {
        return Err(InfraTestError::Config(format!(
            "endpoint URL {url:?} has no host"
        )));
    }
    Ok(())
}

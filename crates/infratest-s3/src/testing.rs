//! Replay-backed S3 handles for unit tests.
//!
//! Responses are served in order by a [`StaticReplayClient`]; requests are
//! recorded so tests can inspect what the helpers actually sent.

use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_runtime_api::http::{Request, Response, StatusCode};
use aws_smithy_types::body::SdkBody;

use crate::client::S3;

/// An `S3` handle in `region` that answers with `responses`, in order.
pub(crate) fn replay_s3(region: &str, responses: &[(u16, &str)]) -> (S3, StaticReplayClient) {
    let events = responses
        .iter()
        .map(|&(status, body)| {
            ReplayEvent::new(
                Request::new(SdkBody::empty()),
                Response::new(
                    StatusCode::try_from(status).expect("valid status"),
                    SdkBody::from(body.to_owned()),
                ),
            )
        })
        .collect();
    let replay = StaticReplayClient::new(events);

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.to_owned()))
        .credentials_provider(Credentials::new("test", "test", None, None, "replay"))
        .http_client(replay.clone())
        .build();

    (
        S3::from_client(aws_sdk_s3::Client::from_conf(config), region),
        replay,
    )
}

/// URIs of the requests the helpers sent, in order.
pub(crate) fn sent_uris(replay: &StaticReplayClient) -> Vec<String> {
    replay
        .actual_requests()
        .map(|req| req.uri().to_owned())
        .collect()
}

/// An S3 REST-XML error document.
pub(crate) fn error_xml(code: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Error><Code>{code}</Code><Message>{code}</Message><RequestId>req</RequestId></Error>"
    )
}

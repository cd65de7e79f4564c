//! Core types, configuration, and session management for infratest.
//!
//! This crate provides the pieces shared by every service helper crate:
//! the [`AwsRegion`] identifier, environment-driven [`AwsTestConfig`],
//! the [`new_authenticated_session`] loader that turns both into an
//! [`aws_config::SdkConfig`], and a one-shot tracing bootstrap for tests.

mod config;
mod error;
mod logging;
mod session;
mod types;

pub use config::AwsTestConfig;
pub use error::{InfraTestError, InfraTestResult};
pub use logging::init_tracing;
pub use session::new_authenticated_session;
pub use types::AwsRegion;

//! S3 helpers for infrastructure test suites.
//!
//! Every helper performs one S3 control-plane or data-plane call through the
//! AWS SDK for Rust and marshals the result into plain Rust types. Helpers
//! come in pairs:
//!
//! * `try_*` returns a [`Result`](error::Result) so the caller decides what a
//!   failure means;
//! * the unprefixed twin panics with the formatted error, failing the test
//!   that called it.
//!
//! ```no_run
//! # async fn run() {
//! use infratest_s3::S3;
//!
//! let s3 = S3::connect("eu-west-1").await;
//! s3.create_bucket("my-test-bucket-1234").await;
//! s3.put_bucket_versioning("my-test-bucket-1234").await;
//! s3.assert_bucket_versioning_exists("my-test-bucket-1234").await;
//! s3.empty_bucket("my-test-bucket-1234").await;
//! s3.delete_bucket("my-test-bucket-1234").await;
//! # }
//! ```

mod bucket;
mod bucket_config;
pub mod client;
pub mod error;
mod object;
pub mod upload;

#[cfg(test)]
mod testing;

pub use client::{S3, new_s3_client, try_new_s3_client};
pub use error::{Result, S3HelperError};
pub use upload::{UploadOutput, Uploader};

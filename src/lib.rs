//! AWS SigV4 signed HTTP requests with automatic credential detection.
//!
//! This crate is a thin convenience layer for calling AWS-fronted HTTP
//! endpoints (API Gateway, internal AWS services) without hand-building
//! SigV4 canonical requests. Credentials are discovered from the runtime
//! environment by the AWS default provider chain, so code running under an
//! IAM role (Lambda, ECS, EC2) needs no configuration at all.
//!
//! ## Overview
//!
//! - [`request`] resolves region, timeout, and TLS verification from
//!   explicit options and the environment, signs the request via `aws-sigv4`
//!   and dispatches it over `reqwest`.
//! - [`get`], [`post`], [`put`], [`delete`], and [`patch`] fix the method;
//!   [`post_json`] and [`put_json`] serialize a body and set the JSON
//!   content type.
//! - [`with_retry`] wraps any of the above with bounded
//!   retry-with-backoff keyed on status codes and transport errors.
//!
//! ## Example
//!
//! ```no_run
//! use awshttp::{with_retry, RequestOptions, RetryPolicy};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> awshttp::Result<()> {
//!     // In Lambda, credentials and region are picked up automatically.
//!     let response = awshttp::get("https://api.example.com/v1/items", RequestOptions::new()).await?;
//!     println!("{}", response.status());
//!
//!     // JSON body, explicit service and region.
//!     let options = RequestOptions::new().with_service("uxc").with_region("us-east-1");
//!     let response = awshttp::put_json(
//!         "https://uxc.us-east-1.api.aws/v1/account-color",
//!         &json!({"color": "teal"}),
//!         options,
//!     )
//!     .await?;
//!     println!("{}", response.text().await?);
//!
//!     // Retry throttled or failing calls.
//!     let response = with_retry(&RetryPolicy::new(), || {
//!         awshttp::get("https://api.example.com/v1/items", RequestOptions::new())
//!     })
//!     .await?;
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `AWS_DEFAULT_REGION` | default region if not passed explicitly |
//! | `AWS_REGION` | fallback region if the above is unset |
//! | `AWSHTTP_TIMEOUT` | default request timeout in seconds (`0` or unset means none) |
//! | `AWSHTTP_VERIFY_SSL` | overrides an explicit `verify(false)` back to `true` unless set to a non-`true` value |
//!
//! Credential environment variables (`AWS_ACCESS_KEY_ID` and friends),
//! shared config files, and metadata endpoints are handled by the default
//! provider chain in `aws-config`.

#![warn(missing_docs)]

mod constants;
mod env;

mod error;
pub use error::{Error, ErrorKind, Result};

mod options;
pub use options::RequestOptions;

mod session;
pub use session::Session;

mod sign;

mod request;
pub use request::{delete, get, patch, post, post_json, put, put_json, request};

mod retry;
pub use retry::{with_retry, RetryPolicy};

pub use http::{Method, StatusCode};
pub use reqwest::Response;

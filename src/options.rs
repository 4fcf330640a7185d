use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::constants::*;
use crate::env::Env;
use crate::error::{Error, Result};
use crate::session::Session;

/// Options for a signed request.
///
/// Everything has a sensible default; override only what the call needs:
///
/// ```
/// use std::time::Duration;
/// use awshttp::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_service("s3")
///     .with_region("eu-central-1")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// AWS service name the request is signed for (`execute-api`, `s3`, ...).
    pub(crate) service: String,
    /// `region` will be resolved from:
    ///
    /// - this field if it's set and non-empty
    /// - env value: [`AWS_DEFAULT_REGION`]
    /// - env value: [`AWS_REGION`]
    /// - default to `us-east-1`
    pub(crate) region: Option<String>,
    /// Headers sent with the request. They take part in signing.
    pub(crate) headers: HeaderMap,
    /// Verify TLS certificates.
    ///
    /// An explicit `true` always wins. A `false` is overridden back to
    /// `true` when env value [`AWSHTTP_VERIFY_SSL`] is present and equals
    /// `true` (case-insensitive).
    pub(crate) verify: bool,
    /// Follow redirects. Defaults to `false`.
    pub(crate) follow_redirects: bool,
    /// `timeout` will be resolved from:
    ///
    /// - this field if it's set
    /// - env value: [`AWSHTTP_TIMEOUT`], seconds as a float, `0` meaning none
    /// - default to no timeout
    pub(crate) timeout: Option<Duration>,
    /// Credential-resolving session. A fresh default session is loaded for
    /// the call when unset.
    pub(crate) session: Option<Session>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            region: None,
            headers: HeaderMap::new(),
            verify: true,
            follow_redirects: false,
            timeout: None,
            session: None,
        }
    }
}

impl RequestOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS service name to sign for.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = service.to_string();
        self
    }

    /// Set the signing region explicitly, skipping env resolution.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Replace all request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Insert a single request header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Enable or disable redirect following.
    pub fn with_follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.follow_redirects = follow_redirects;
        self
    }

    /// Set the request timeout, applied to every attempt independently.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an already loaded [`Session`] instead of loading a fresh one.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Resolve the final per-call values from explicit fields, the
    /// environment, and literal defaults, in that order.
    pub(crate) fn resolve(&self, env: &dyn Env) -> Result<ResolvedOptions> {
        let region = self
            .region
            .clone()
            .filter(|v| !v.is_empty())
            .or_else(|| env.var(AWS_DEFAULT_REGION).filter(|v| !v.is_empty()))
            .or_else(|| env.var(AWS_REGION).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let timeout = match self.timeout {
            Some(v) => Some(v),
            None => match env.var(AWSHTTP_TIMEOUT) {
                Some(v) => parse_timeout(&v)?,
                None => None,
            },
        };

        let mut verify = self.verify;
        if !verify {
            if let Some(v) = env.var(AWSHTTP_VERIFY_SSL) {
                verify = v.eq_ignore_ascii_case("true");
            }
        }

        Ok(ResolvedOptions {
            service: self.service.clone(),
            region,
            verify,
            follow_redirects: self.follow_redirects,
            timeout,
        })
    }
}

/// Per-call values after resolution. The environment is not consulted again
/// once this exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedOptions {
    pub service: String,
    pub region: String,
    pub verify: bool,
    pub follow_redirects: bool,
    pub timeout: Option<Duration>,
}

fn parse_timeout(value: &str) -> Result<Option<Duration>> {
    let secs: f64 = value.trim().parse().map_err(|_| {
        Error::config_invalid(format!("{AWSHTTP_TIMEOUT} is not a number: {value}"))
    })?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::config_invalid(format!(
            "{AWSHTTP_TIMEOUT} must be a non-negative number of seconds: {value}"
        )));
    }
    if secs == 0.0 {
        return Ok(None);
    }
    Ok(Some(Duration::from_secs_f64(secs)))
}

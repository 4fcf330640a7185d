//! SigV4 signing, delegated to `aws-sigv4`.

use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use bytes::Bytes;
use log::debug;

use crate::error::{Error, Result};

/// Sign `req` in place for the given service and region.
///
/// Adds the `authorization` and `x-amz-date` headers, plus
/// `x-amz-security-token` when the credentials carry a session token. The
/// canonical request and signature are computed entirely by `aws-sigv4`.
pub(crate) fn sign(
    req: &mut http::Request<Bytes>,
    credentials: &Credentials,
    service: &str,
    region: &str,
    time: SystemTime,
) -> Result<()> {
    let identity = credentials.clone().into();
    let params = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(service)
        .time(time)
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| Error::request_invalid(format!("failed to build signing params: {e}")))?;

    let headers = req
        .headers()
        .iter()
        .map(|(k, v)| Ok((k.as_str(), v.to_str()?)))
        .collect::<Result<Vec<_>>>()?;

    let signable = SignableRequest::new(
        req.method().as_str(),
        req.uri().to_string(),
        headers.into_iter(),
        SignableBody::Bytes(req.body().as_ref()),
    )?;

    let (instructions, _signature) =
        aws_sigv4::http_request::sign(signable, &params.into())?.into_parts();
    instructions.apply_to_request_http1x(req);

    debug!("signed request for service={service} region={region}");
    Ok(())
}

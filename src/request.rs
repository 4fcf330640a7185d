use std::time::SystemTime;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use log::debug;
use reqwest::{redirect, Response};
use serde::Serialize;

use crate::env::OsEnv;
use crate::error::Result;
use crate::options::{RequestOptions, ResolvedOptions};
use crate::session::Session;
use crate::sign::sign;

/// Make a signed AWS request with automatic credential detection.
///
/// Resolves region, timeout, and TLS verification from the options and the
/// environment, obtains credentials from the options' session (loading a
/// default one when none is set), signs the request for the resolved
/// service and region, and dispatches it. The response comes back
/// unmodified; HTTP error statuses are ordinary responses, not errors.
///
/// Failures in credential resolution, signing, or transport propagate with
/// the underlying error attached as source; nothing is caught here.
///
/// ```no_run
/// # async fn example() -> awshttp::Result<()> {
/// use awshttp::{Method, RequestOptions};
///
/// let response = awshttp::request(
///     "https://api.example.com/v1/items",
///     Method::GET,
///     "",
///     RequestOptions::new(),
/// )
/// .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
pub async fn request(
    uri: &str,
    method: Method,
    body: impl Into<Bytes>,
    options: RequestOptions,
) -> Result<Response> {
    let resolved = options.resolve(&OsEnv)?;
    debug!(
        "resolved options: service={} region={} verify={} follow_redirects={} timeout={:?}",
        resolved.service, resolved.region, resolved.verify, resolved.follow_redirects,
        resolved.timeout
    );

    let session = match options.session {
        Some(session) => session,
        None => Session::load().await,
    };
    let credentials = session.credentials().await?;

    let mut req = http::Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())?;
    *req.headers_mut() = options.headers;

    sign(
        &mut req,
        &credentials,
        &resolved.service,
        &resolved.region,
        SystemTime::now(),
    )?;

    dispatch(req, &resolved).await
}

/// Convenience method for GET requests.
pub async fn get(uri: &str, options: RequestOptions) -> Result<Response> {
    request(uri, Method::GET, Bytes::new(), options).await
}

/// Convenience method for POST requests.
pub async fn post(uri: &str, body: impl Into<Bytes>, options: RequestOptions) -> Result<Response> {
    request(uri, Method::POST, body, options).await
}

/// Convenience method for PUT requests.
pub async fn put(uri: &str, body: impl Into<Bytes>, options: RequestOptions) -> Result<Response> {
    request(uri, Method::PUT, body, options).await
}

/// Convenience method for DELETE requests.
pub async fn delete(uri: &str, options: RequestOptions) -> Result<Response> {
    request(uri, Method::DELETE, Bytes::new(), options).await
}

/// Convenience method for PATCH requests.
pub async fn patch(uri: &str, body: impl Into<Bytes>, options: RequestOptions) -> Result<Response> {
    request(uri, Method::PATCH, body, options).await
}

/// POST `data` as a JSON body with a `content-type: application/json`
/// header, overriding any caller-supplied content type.
pub async fn post_json<T: Serialize + ?Sized>(
    uri: &str,
    data: &T,
    options: RequestOptions,
) -> Result<Response> {
    let (body, options) = encode_json(data, options)?;
    post(uri, body, options).await
}

/// PUT `data` as a JSON body with a `content-type: application/json`
/// header, overriding any caller-supplied content type.
pub async fn put_json<T: Serialize + ?Sized>(
    uri: &str,
    data: &T,
    options: RequestOptions,
) -> Result<Response> {
    let (body, options) = encode_json(data, options)?;
    put(uri, body, options).await
}

fn encode_json<T: Serialize + ?Sized>(
    data: &T,
    mut options: RequestOptions,
) -> Result<(Bytes, RequestOptions)> {
    let body = serde_json::to_vec(data)?;
    options
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok((Bytes::from(body), options))
}

async fn dispatch(req: http::Request<Bytes>, resolved: &ResolvedOptions) -> Result<Response> {
    let redirect = if resolved.follow_redirects {
        redirect::Policy::limited(10)
    } else {
        redirect::Policy::none()
    };

    let mut builder = reqwest::Client::builder().redirect(redirect);
    if !resolved.verify {
        builder = builder.danger_accept_invalid_certs(true);
    }
    let client = builder.build()?;

    let mut req = reqwest::Request::try_from(req)?;
    if let Some(timeout) = resolved.timeout {
        *req.timeout_mut() = Some(timeout);
    }

    debug!("{} {}", req.method(), req.url());
    Ok(client.execute(req).await?)
}

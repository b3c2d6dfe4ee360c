use chrono::Utc;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method, Request, StatusCode};
use std::path::Path;
use tracing::debug;
use url::Url;

use super::client::Transport;
use super::content_type::content_type_for;
use super::error::{Result, StorageError};
use super::invocation::invocation_headers;
use super::signer::InvocationSigner;
use super::target::with_scheme;

/// File contents plus the content type they are served with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl Blob {
    /// Read a whole file into memory
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::read(e, path))?;

        Ok(Self {
            bytes,
            content_type: content_type_for(path),
        })
    }
}

/// Build a signed PUT of `blob` to `target`
///
/// The request always goes out over https, whatever scheme `target` has.
pub fn build_put_request<S: InvocationSigner>(
    blob: &Blob,
    target: &Url,
    signer: &S,
) -> Result<Request> {
    let url = with_scheme(target, "https")?;
    let method = Method::PUT;

    let invocation = invocation_headers(
        &method,
        &url,
        signer,
        blob.content_type,
        &blob.bytes,
        Utc::now(),
    );

    let mut headers = HeaderMap::with_capacity(invocation.len() + 1);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(blob.content_type));
    for (name, value) in invocation {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| StorageError::Header {
                name: name.clone(),
                message: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(&value).map_err(|e| StorageError::Header {
            name: name.clone(),
            message: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    let mut request = Request::new(method, url);
    *request.headers_mut() = headers;
    *request.body_mut() = Some(Body::from(blob.bytes.clone()));

    Ok(request)
}

/// A PUT to a collection succeeds only with 201 Created
pub fn check_put_status(status: StatusCode, url: &Url) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(StorageError::Unauthorized {
            url: url.to_string(),
        });
    }
    if status != StatusCode::CREATED {
        return Err(StorageError::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}

/// Put a blob to the target URL and require 201 Created
pub async fn put_blob<S, T>(transport: &T, signer: &S, blob: &Blob, target: &Url) -> Result<()>
where
    S: InvocationSigner,
    T: Transport,
{
    debug!(
        "start put {} ({}, {} bytes)",
        target,
        blob.content_type,
        blob.bytes.len()
    );

    let request = build_put_request(blob, target, signer)?;
    let url = request.url().clone();
    let status = transport.send(request).await?;

    debug!("response to PUT {}: {}", url, status);
    check_put_status(status, &url)
}

/// Read a local file and put it to the target URL
pub async fn upload_file<S, T>(
    transport: &T,
    signer: &S,
    local_path: &Path,
    target: &Url,
) -> Result<()>
where
    S: InvocationSigner,
    T: Transport,
{
    let blob = Blob::from_path(local_path).await?;
    put_blob(transport, signer, &blob, target).await
}

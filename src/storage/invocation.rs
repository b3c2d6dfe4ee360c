//! Capability invocation headers for HTTP requests
//!
//! A request proves it may act on a resource by invoking the root
//! capability of that resource and signing the request with a key the
//! capability was delegated to. The proof is carried in HTTP headers:
//!
//! - `capability-invocation` names the capability and the action
//! - `digest` binds the body
//! - `authorization` carries an HTTP signature over the headers above

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::Method;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use url::{Url, form_urlencoded};

use super::signer::InvocationSigner;

/// How long a signed invocation stays valid
pub const INVOCATION_TTL_SECS: i64 = 600;

/// Headers covered by the signature, in signing order
const SIGNED_HEADERS: [&str; 8] = [
    "(key-id)",
    "(created)",
    "(expires)",
    "(request-target)",
    "host",
    "capability-invocation",
    "content-type",
    "digest",
];

/// Build the headers that authorize `method` on `url`
///
/// The returned map holds `host`, `capability-invocation`, `content-type`,
/// `digest` and `authorization`, keyed by lowercase header name.
pub fn invocation_headers<S: InvocationSigner>(
    method: &Method,
    url: &Url,
    signer: &S,
    content_type: &str,
    body: &[u8],
    now: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("host".to_string(), host_header(url));
    headers.insert(
        "capability-invocation".to_string(),
        capability_invocation(url, method),
    );
    headers.insert("content-type".to_string(), content_type.to_string());
    headers.insert("digest".to_string(), body_digest(body));

    let created = now.timestamp();
    let expires = created + INVOCATION_TTL_SECS;

    let signing_string = signing_string(signer.key_id(), created, expires, method, url, &headers);
    let signature = STANDARD.encode(signer.sign(signing_string.as_bytes()));

    let authorization = format!(
        "Signature keyId=\"{}\",algorithm=\"{}\",headers=\"{}\",signature=\"{}\",created=\"{}\",expires=\"{}\"",
        signer.key_id(),
        signer.algorithm(),
        SIGNED_HEADERS.join(" "),
        signature,
        created,
        expires
    );
    headers.insert("authorization".to_string(), authorization);

    headers
}

/// Root capability id of the resource at `url`
pub fn root_capability_id(url: &Url) -> String {
    let encoded: String = form_urlencoded::byte_serialize(url.as_str().as_bytes()).collect();
    format!("urn:zcap:root:{}", encoded)
}

fn capability_invocation(url: &Url, method: &Method) -> String {
    format!(
        "zcap id=\"{}\",action=\"{}\"",
        root_capability_id(url),
        method.as_str()
    )
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn body_digest(body: &[u8]) -> String {
    format!("SHA-256={}", STANDARD.encode(Sha256::digest(body)))
}

fn request_target(method: &Method, url: &Url) -> String {
    let method = method.as_str().to_lowercase();
    match url.query() {
        Some(query) => format!("{} {}?{}", method, url.path(), query),
        None => format!("{} {}", method, url.path()),
    }
}

/// One `name: value` line per signed header, joined with '\n'
pub fn signing_string(
    key_id: &str,
    created: i64,
    expires: i64,
    method: &Method,
    url: &Url,
    headers: &BTreeMap<String, String>,
) -> String {
    SIGNED_HEADERS
        .iter()
        .map(|name| {
            let value = match *name {
                "(key-id)" => key_id.to_string(),
                "(created)" => created.to_string(),
                "(expires)" => expires.to_string(),
                "(request-target)" => request_target(method, url),
                header => headers.get(header).cloned().unwrap_or_default(),
            };
            format!("{}: {}", name, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

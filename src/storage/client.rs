use reqwest::{Request, StatusCode};

use super::error::Result;

/// Sends a prepared request and reports the response status
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: Request) -> Result<StatusCode>;
}

impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> Result<StatusCode> {
        let response = self.execute(request).await?;
        Ok(response.status())
    }
}

/// Build the HTTP client used for uploads
pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(concat!("put-website/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

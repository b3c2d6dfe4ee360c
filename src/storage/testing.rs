use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Request, StatusCode};
use std::collections::VecDeque;
use std::sync::Mutex;

use super::client::Transport;
use super::error::Result;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub content_type: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// In-memory transport that records every request
///
/// Statuses are handed out in order; once the queue is empty the fallback
/// status is returned.
pub struct RecordingTransport {
    statuses: Mutex<VecDeque<StatusCode>>,
    fallback: StatusCode,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn always(status: StatusCode) -> Self {
        Self::with_statuses(Vec::new(), status)
    }

    pub fn with_statuses(statuses: Vec<StatusCode>, fallback: StatusCode) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: Request) -> Result<StatusCode> {
        let recorded = RecordedRequest {
            method: request.method().to_string(),
            url: request.url().to_string(),
            content_type: request
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(|b| b.as_bytes())
                .map(|b| b.to_vec())
                .unwrap_or_default(),
        };
        self.requests.lock().unwrap().push(recorded);

        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        Ok(status)
    }
}

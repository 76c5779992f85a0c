//! Response sink
//!
//! Read operations answer through a [`ResponseSink`]: headers first, then
//! the body, which also completes the response.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::error::{Error, Result};

/// Response-writing capability supplied by the transport
#[async_trait]
pub trait ResponseSink: Send {
    /// Write the status line and headers
    async fn write_headers(&mut self, status: StatusCode, headers: HeaderMap) -> Result<()>;

    /// Write the body and complete the response
    async fn write_body_and_complete(&mut self, body: Bytes) -> Result<()>;
}

/// Sink that keeps the response in memory
#[derive(Debug, Default)]
pub struct BufferedSink {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Whether a body has been written
    pub fn is_complete(&self) -> bool {
        self.body.is_some()
    }

    /// Convert the captured response into an axum response
    pub fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::OK);
        let body = self.body.unwrap_or_default();
        (status, self.headers, Body::from(body)).into_response()
    }
}

#[async_trait]
impl ResponseSink for BufferedSink {
    async fn write_headers(&mut self, status: StatusCode, headers: HeaderMap) -> Result<()> {
        if self.status.is_some() {
            return Err(Error::Network("response headers already written".into()));
        }
        self.status = Some(status);
        self.headers = headers;
        Ok(())
    }

    async fn write_body_and_complete(&mut self, body: Bytes) -> Result<()> {
        if self.status.is_none() {
            return Err(Error::Network("response body written before headers".into()));
        }
        if self.body.is_some() {
            return Err(Error::Network("response already completed".into()));
        }
        self.body = Some(body);
        Ok(())
    }
}

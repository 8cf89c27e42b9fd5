//! The injectable HTTP transport.
//!
//! A [`Transport`] turns an [`HttpRequest`] into a fully drained
//! [`HttpResponse`]. It does not interpret status codes; any failure to
//! deliver a response is returned as-is and surfaces to the caller as
//! `Error::Transport`.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// [`Transport`] backed by a `reqwest::Client`, which pools connections.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, BoxError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http })
    }

    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self.http.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// The process-wide transport used by configs that do not inject their own.
///
/// Fails when the HTTP client cannot be built, e.g. when the TLS backend
/// does not initialise. A failed attempt is not cached.
pub fn default_transport() -> Result<Arc<dyn Transport>, BoxError> {
    static DEFAULT: OnceLock<Arc<dyn Transport>> = OnceLock::new();
    if let Some(transport) = DEFAULT.get() {
        return Ok(transport.clone());
    }
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
    Ok(DEFAULT.get_or_init(|| transport).clone())
}

//! The request/response engine every adapter delegates to.
//!
//! # Design
//! `TogglClient` holds only an immutable [`Config`] and carries no state
//! between calls, so one client can serve any number of concurrent tasks.
//! A call is split the same way at every level:
//!
//! - [`TogglClient::build_request`] composes the URL, encodes the body and
//!   adds `Accept`, `Authorization` and (with a body) `Content-Type`.
//! - [`TogglClient::execute`] hands the request to the configured
//!   [`Transport`](crate::Transport), racing it against the caller's
//!   [`Context`].
//! - [`TogglClient::parse_response`] classifies the status and decodes the
//!   body.
//!
//! The build and parse halves never touch the network, so a host that does
//! its own I/O can use them directly.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{decode_body, encode_body};
use crate::config::{ClientOption, Config};
use crate::context::Context;
use crate::endpoint::compose_url;
use crate::error::{ApiError, Error, Result};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, HEADER_ACCEPT, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE,
};

/// Statuses treated as success. Anything else is an [`ApiError`].
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

#[derive(Debug, Clone)]
pub struct TogglClient {
    config: Arc<Config>,
}

impl TogglClient {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_options(options: impl IntoIterator<Item = ClientOption>) -> Result<Self> {
        Config::new(options).map(Self::new)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the outgoing request for `path` under the base URL.
    ///
    /// GET and DELETE never carry a body. POST and PUT send `body` as JSON
    /// when one is given and send nothing (not even `Content-Type`) when it
    /// is `None`.
    pub fn build_request<B, Q>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let url = compose_url(self.config.base_url(), path, query)?;
        let authorization = self.config.credentials().authorization()?;
        let body = match body {
            Some(body) if method.allows_body() => Some(encode_body(body)?),
            _ => None,
        };

        let mut headers = vec![
            (HEADER_ACCEPT.to_string(), APPLICATION_JSON.to_string()),
            (HEADER_AUTHORIZATION.to_string(), authorization),
        ];
        if body.is_some() {
            headers.push((HEADER_CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send `request` through the configured transport.
    ///
    /// Returns the response whatever its status. A context that is already
    /// done fails with `Error::Cancelled` before the transport is called; one
    /// that fires while the transport is sending or draining the body aborts
    /// the call with the same error.
    pub async fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse> {
        if let Some(reason) = ctx.err() {
            tracing::trace!(%reason, "context done before dispatch");
            return Err(Error::Cancelled(reason));
        }

        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
        let transport = self.config.transport();
        tokio::select! {
            biased;
            reason = ctx.done() => {
                tracing::trace!(%reason, "request aborted in flight");
                Err(Error::Cancelled(reason))
            }
            result = transport.send(request) => {
                let response = result.map_err(Error::Transport)?;
                tracing::debug!(status = response.status, bytes = response.body.len(), "response received");
                Ok(response)
            }
        }
    }

    /// Classify `response` and decode its body.
    ///
    /// `Ok(None)` for a 204, an empty body or a literal `null`.
    pub fn parse_response<T>(&self, response: HttpResponse) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match check_status(response)? {
            Some(body) => decode_body(&body),
            None => Ok(None),
        }
    }

    /// Full round trip decoding the body into `T`.
    pub async fn send<T, B, Q>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let response = self.round_trip(ctx, method, path, body, query).await?;
        self.parse_response(response)
    }

    /// Full round trip that checks the status and discards the body.
    pub async fn send_discarding<B, Q>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let response = self.round_trip(ctx, method, path, body, query).await?;
        check_status(response).map(|_| ())
    }

    pub async fn get<T>(&self, ctx: &Context, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.send::<T, (), ()>(ctx, HttpMethod::Get, path, None, None).await
    }

    pub async fn get_with_query<T, Q>(&self, ctx: &Context, path: &str, query: Option<&Q>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send::<T, (), Q>(ctx, HttpMethod::Get, path, None, query).await
    }

    pub async fn post<T, B>(&self, ctx: &Context, path: &str, body: Option<&B>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B, ()>(ctx, HttpMethod::Post, path, body, None).await
    }

    pub async fn put<T, B>(&self, ctx: &Context, path: &str, body: Option<&B>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B, ()>(ctx, HttpMethod::Put, path, body, None).await
    }

    pub async fn delete(&self, ctx: &Context, path: &str) -> Result<()> {
        self.send_discarding::<(), ()>(ctx, HttpMethod::Delete, path, None, None)
            .await
    }

    async fn round_trip<B, Q>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<HttpResponse>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        if let Some(reason) = ctx.err() {
            return Err(Error::Cancelled(reason));
        }
        let request = self.build_request(method, path, body, query)?;
        self.execute(ctx, request).await
    }
}

/// Split a response into its body (`None` for 204) or an [`ApiError`].
pub fn check_status(response: HttpResponse) -> Result<Option<Vec<u8>>> {
    match response.status {
        204 => Ok(None),
        status if SUCCESS_STATUSES.contains(&status) => Ok(Some(response.body)),
        status => Err(Error::Api(ApiError::new(
            status,
            String::from_utf8_lossy(&response.body).into_owned(),
            response.headers,
        ))),
    }
}

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};
use tracing::debug;

use super::error::{TransportError, TransportErrorKind};

/// Executes requests over the network.
///
/// This is the only suspension point of a call: building the request,
/// applying the editors and decoding the response never wait on the network.
/// Retries, timeouts and connection reuse are the transport's business.
pub trait Transport: Send + Sync + 'static {
    /// The response returned by this transport.
    type Response: TransportResponse;

    /// Sends the request and waits for the response head.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, TransportError>> + Send;
}

/// A response whose body has not been read yet.
pub trait TransportResponse: Send + 'static {
    /// The response status code.
    fn status(&self) -> StatusCode;

    /// The response headers.
    fn headers(&self) -> &HeaderMap;

    /// Reads the whole body, consuming the response.
    ///
    /// Whatever the outcome, the underlying stream is released once this
    /// future completes or is dropped.
    fn into_body(self) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// TLS, proxies, timeouts and pooling come from the wrapped client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps a configured reqwest client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl From<reqwest::Client> for ReqwestTransport {
    fn from(client: reqwest::Client) -> Self {
        Self::new(client)
    }
}

impl Transport for ReqwestTransport {
    type Response = reqwest::Response;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, TransportError> {
        let request = reqwest::Request::try_from(request)
            .map_err(|err| TransportError::new(TransportErrorKind::Request, err))?;
        let response = self.client.execute(request).await?;
        debug!(status = %response.status(), "response head received");
        Ok(response)
    }
}

impl TransportResponse for reqwest::Response {
    fn status(&self) -> StatusCode {
        self.status()
    }

    fn headers(&self) -> &HeaderMap {
        self.headers()
    }

    async fn into_body(self) -> Result<Bytes, TransportError> {
        let body = self.bytes().await?;
        Ok(body)
    }
}

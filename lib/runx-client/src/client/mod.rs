use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::operations::OperationDescriptor;

mod api;

mod auth;
pub use self::auth::{Authentication, AuthenticationError, SecureString};

mod builder;
pub use self::builder::ClientBuilder;

mod editor;
pub use self::editor::{EditorChain, EditorFn, RequestEditor, SharedEditor, editor_fn};

mod error;
pub use self::error::{
    ApiClientError, BoxError, EditorError, EncodingError, TransportError, TransportErrorKind,
};

mod parameters;
pub use self::parameters::{CallBody, CallParams, ParamLocation, ParamSpec, ParamStyle, encode};

pub mod request;

pub mod response;

mod transport;
pub use self::transport::{ReqwestTransport, Transport, TransportResponse};

mod with_responses;
pub use self::with_responses::{ClientWithResponses, OperationResult};

#[cfg(test)]
pub(crate) mod testing;

/// Raw client of the runx API.
///
/// Each operation builds its request, runs it through the editor chain and
/// returns the transport response untouched. See [`ClientWithResponses`] for
/// decoded responses.
///
/// A client is immutable once built: clone it or share it freely between
/// concurrent calls.
///
/// # Example
///
/// ```rust,no_run
/// use runx_client::{CallContext, Client};
///
/// # async fn example() -> Result<(), runx_client::ApiClientError> {
/// let client = Client::new("https://api.runx.dev", "my-api-key")?;
///
/// let response = client.get_apps(&CallContext::default()).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
pub struct Client<T = ReqwestTransport> {
    server: Url,
    transport: Arc<T>,
    editors: EditorChain,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            server: self.server.clone(),
            transport: Arc::clone(&self.transport),
            editors: self.editors.clone(),
        }
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("server", &self.server.as_str())
            .field("editors", &self.editors)
            .finish_non_exhaustive()
    }
}

// Create
impl Client {
    /// Creates a client sending `bearer` as `Authorization: Bearer` token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::PathResolution`] if `server` is not a valid base URL.
    pub fn new(server: &str, bearer: impl Into<SecureString>) -> Result<Self, ApiClientError> {
        ClientBuilder::new(server).with_bearer(bearer).build()
    }

    /// Starts configuring a client.
    pub fn builder(server: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(server)
    }
}

impl<T> Client<T> {
    pub(in crate::client) fn from_parts(server: Url, transport: T, editors: EditorChain) -> Self {
        Self {
            server,
            transport: Arc::new(transport),
            editors,
        }
    }

    /// The normalized server URL, always ending with `/`.
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The default editors, applied to every call.
    pub fn editors(&self) -> &EditorChain {
        &self.editors
    }
}

impl<T> Client<T>
where
    T: Transport,
{
    /// Builds, edits and sends the request of an operation.
    ///
    /// Steps run in order: request building, default editors, call editors,
    /// transport. Only the transport step waits, and only that step observes
    /// the cancellation token. [`ClientWithResponses`] also observes it while
    /// reading the body.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Encoding`], [`ApiClientError::PathResolution`] or
    ///   [`ApiClientError::Editor`] before anything is sent
    /// - [`ApiClientError::Transport`] if the transport fails
    /// - [`ApiClientError::Cancelled`] if the token fires first
    pub async fn send(
        &self,
        descriptor: &OperationDescriptor,
        params: &CallParams,
        body: Option<CallBody>,
        context: &CallContext,
    ) -> Result<T::Response, ApiClientError> {
        let mut request = request::build(&self.server, descriptor, params, body)?;
        request
            .extensions_mut()
            .insert(context.cancellation.clone());
        self.editors
            .apply(&context.editors, &context.cancellation, &mut request)?;

        debug!(operation_id = descriptor.id, ?request, "sending...");
        let response = tokio::select! {
            biased;
            () = context.cancellation.cancelled() => {
                debug!(operation_id = descriptor.id, "cancelled");
                return Err(ApiClientError::Cancelled);
            }
            response = self.transport.execute(request) => response?,
        };
        debug!(operation_id = descriptor.id, status = %response.status(), "...receiving");

        Ok(response)
    }
}

/// Per call options: cancellation and additional editors.
///
/// # Example
///
/// ```rust
/// use http::HeaderValue;
/// use runx_client::{CallContext, editor_fn};
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let context = CallContext::default()
///     .with_cancellation(token.clone())
///     .with_editor(editor_fn(|_, request| {
///         request
///             .headers_mut()
///             .insert("x-request-id", HeaderValue::from_static("42"));
///         Ok(())
///     }));
/// # let _ = context;
/// ```
#[derive(Clone, Default)]
pub struct CallContext {
    cancellation: CancellationToken,
    editors: Vec<SharedEditor>,
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("cancelled", &self.cancellation.is_cancelled())
            .field("editors", &self.editors.len())
            .finish()
    }
}

impl CallContext {
    /// Uses `cancellation` to abort the call while waiting for the server.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Adds an editor applied after the client default editors.
    #[must_use]
    pub fn with_editor(mut self, editor: impl RequestEditor + 'static) -> Self {
        self.editors.push(Arc::new(editor));
        self
    }

    /// The call cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

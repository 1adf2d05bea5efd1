use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::editor::{EditorChain, RequestEditor, SharedEditor};
use super::request::normalize_server;
use super::{
    ApiClientError, Authentication, Client, ClientWithResponses, ReqwestTransport, SecureString,
    Transport,
};

/// Builder for [`Client`] and [`ClientWithResponses`].
///
/// # Default Configuration
///
/// - **Transport**: [`ReqwestTransport`] with a default `reqwest::Client`
/// - **Authentication**: none
/// - **Editors**: none
///
/// The authentication editor is appended after the editors registered with
/// [`with_request_editor`](Self::with_request_editor), whatever the call order.
///
/// # Example
///
/// ```rust
/// use runx_client::{ClientBuilder, editor_fn};
///
/// # fn example() -> Result<(), runx_client::ApiClientError> {
/// let client = ClientBuilder::new("https://api.runx.dev")
///     .with_bearer("my-api-key")
///     .with_request_editor(editor_fn(|_, _| Ok(())))
///     .build_with_responses()?;
/// assert_eq!(client.raw().server().as_str(), "https://api.runx.dev/");
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder<T = ReqwestTransport> {
    server: String,
    transport: T,
    authentication: Option<Authentication>,
    editors: Vec<SharedEditor>,
}

impl<T> fmt::Debug for ClientBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("server", &self.server)
            .field("authentication", &self.authentication)
            .field("editors", &self.editors.len())
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Starts a builder for the given server URL.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            transport: ReqwestTransport::default(),
            authentication: None,
            editors: Vec::new(),
        }
    }

    /// Sends requests with a configured reqwest client (timeouts, proxies, TLS...).
    #[must_use]
    pub fn with_reqwest_client(self, client: reqwest::Client) -> Self {
        self.with_transport(ReqwestTransport::new(client))
    }
}

impl<T> ClientBuilder<T> {
    /// Overrides the server URL.
    #[must_use]
    pub fn with_base_url(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Authenticates every call with `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_bearer(self, token: impl Into<SecureString>) -> Self {
        self.with_authentication(Authentication::Bearer(token.into()))
    }

    /// Authenticates every call with the given credentials.
    #[must_use]
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Appends a default editor, applied to every call in registration order.
    #[must_use]
    pub fn with_request_editor(mut self, editor: impl RequestEditor + 'static) -> Self {
        self.editors.push(Arc::new(editor));
        self
    }

    /// Replaces the transport.
    pub fn with_transport<U>(self, transport: U) -> ClientBuilder<U> {
        let Self {
            server,
            transport: _,
            authentication,
            editors,
        } = self;
        ClientBuilder {
            server,
            transport,
            authentication,
            editors,
        }
    }
}

impl<T> ClientBuilder<T>
where
    T: Transport,
{
    /// Builds the raw client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::PathResolution`] if the server is not a valid base URL.
    pub fn build(self) -> Result<Client<T>, ApiClientError> {
        let server = normalize_server(&self.server)?;

        let mut editors = EditorChain::default();
        for editor in self.editors {
            editors.push(editor);
        }
        if let Some(authentication) = self.authentication {
            debug!(%authentication, "installing authentication editor");
            editors.push(Arc::new(authentication));
        }

        debug!(%server, editors = editors.len(), "client ready");
        Ok(Client::from_parts(server, self.transport, editors))
    }

    /// Builds the client decoding responses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::PathResolution`] if the server is not a valid base URL.
    pub fn build_with_responses(self) -> Result<ClientWithResponses<T>, ApiClientError> {
        self.build().map(ClientWithResponses::from)
    }
}

use super::response::{TypedResult, decode};
use super::transport::TransportResponse;
use super::{
    ApiClientError, CallBody, CallContext, CallParams, Client, ReqwestTransport, SecureString,
    Transport,
};
use crate::operations::catalog::{
    AUTH, CREATE_APP, DELETE_APP, DELETE_SESSION, ENABLE_APP, GENERATE_API_KEY, GET_APP, GET_APPS,
    GET_CATALOG_APPS, ME, ME_BILLING, ME_SESSION, REGISTER, RESTART_APP, REVEAL_NUMBER, UPDATE_APP,
};
use crate::operations::models::{
    AppDetails, AppList, AuthRequest, Billing, Catalog, CreateAppRequest, CreatedApps, EnableState,
    GeneratedApiKey, PhoneNumber, Profile, Session, Sessions, StatusMessage, UpdateAppRequest,
};
use crate::operations::{Endpoint, Payload};

/// Typed result of a runx operation.
pub type OperationResult<T> = TypedResult<Payload<T>>;

async fn read<R, P>(
    endpoint: &Endpoint<P>,
    response: R,
    context: &CallContext,
) -> Result<TypedResult<P>, ApiClientError>
where
    R: TransportResponse,
    P: 'static,
{
    let cancellation = context.cancellation();
    decode(endpoint.descriptor.id, &endpoint.table, response, cancellation).await
}

/// Client decoding runx responses.
///
/// Wraps a [`Client`]: every operation performs the raw call, then reads the
/// whole body once and decodes it with the operation decode table.
///
/// A documented status yields a typed payload, any other status yields a
/// [`TypedResult`] without payload whose raw body is still available.
///
/// # Example
///
/// ```rust,no_run
/// use runx_client::{CallContext, ClientWithResponses};
///
/// # async fn example() -> Result<(), runx_client::ApiClientError> {
/// let client = ClientWithResponses::new("https://api.runx.dev", "my-api-key")?;
///
/// let result = client.get_apps(&CallContext::default()).await?;
/// if let Some(list) = result.success() {
///     for app in list.apps.iter().flatten() {
///         println!("{:?}", app.name);
///     }
/// } else if let Some(message) = result.error_message() {
///     eprintln!("{}: {message}", result.status());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ClientWithResponses<T = ReqwestTransport> {
    client: Client<T>,
}

impl<T> Clone for ClientWithResponses<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ClientWithResponses<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClientWithResponses")
            .field(&self.client)
            .finish()
    }
}

impl<T> From<Client<T>> for ClientWithResponses<T> {
    fn from(client: Client<T>) -> Self {
        Self { client }
    }
}

impl ClientWithResponses {
    /// Creates a client sending `bearer` as `Authorization: Bearer` token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::PathResolution`] if `server` is not a valid base URL.
    pub fn new(server: &str, bearer: impl Into<SecureString>) -> Result<Self, ApiClientError> {
        Client::new(server, bearer).map(Self::from)
    }
}

impl<T> ClientWithResponses<T> {
    /// The wrapped raw client.
    pub fn raw(&self) -> &Client<T> {
        &self.client
    }

    /// Unwraps the raw client.
    pub fn into_raw(self) -> Client<T> {
        self.client
    }
}

impl<T> ClientWithResponses<T>
where
    T: Transport,
{
    /// Sends a call for `endpoint` and decodes its response.
    ///
    /// # Errors
    ///
    /// See [`Client::send`], plus [`ApiClientError::Transport`] when the body
    /// cannot be read, [`ApiClientError::Cancelled`] when the token fires while
    /// reading it, and [`ApiClientError::Decode`] when a matched rule fails.
    pub async fn call<P>(
        &self,
        endpoint: &Endpoint<P>,
        params: &CallParams,
        body: Option<CallBody>,
        context: &CallContext,
    ) -> Result<TypedResult<P>, ApiClientError>
    where
        P: 'static,
    {
        let response = self
            .client
            .send(&endpoint.descriptor, params, body, context)
            .await?;
        read(endpoint, response, context).await
    }

    /// `GET /app`, see [`Client::get_apps`].
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn get_apps(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<AppList>, ApiClientError> {
        let response = self.client.get_apps(context).await?;
        read(&GET_APPS, response, context).await
    }

    /// `POST /app`, see [`Client::create_app`].
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn create_app(
        &self,
        body: &CreateAppRequest,
        context: &CallContext,
    ) -> Result<OperationResult<CreatedApps>, ApiClientError> {
        let response = self.client.create_app(body, context).await?;
        read(&CREATE_APP, response, context).await
    }

    /// `POST /app` with any body.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn create_app_with_body(
        &self,
        body: CallBody,
        context: &CallContext,
    ) -> Result<OperationResult<CreatedApps>, ApiClientError> {
        let response = self.client.create_app_with_body(body, context).await?;
        read(&CREATE_APP, response, context).await
    }

    /// `DELETE /app/{appId}`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn delete_app(
        &self,
        app_id: &str,
        context: &CallContext,
    ) -> Result<OperationResult<StatusMessage>, ApiClientError> {
        let response = self.client.delete_app(app_id, context).await?;
        read(&DELETE_APP, response, context).await
    }

    /// `GET /app/{appId}`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn get_app(
        &self,
        app_id: &str,
        context: &CallContext,
    ) -> Result<OperationResult<AppDetails>, ApiClientError> {
        let response = self.client.get_app(app_id, context).await?;
        read(&GET_APP, response, context).await
    }

    /// `PUT /app/{appId}`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn update_app(
        &self,
        app_id: &str,
        body: &UpdateAppRequest,
        context: &CallContext,
    ) -> Result<OperationResult<StatusMessage>, ApiClientError> {
        let response = self.client.update_app(app_id, body, context).await?;
        read(&UPDATE_APP, response, context).await
    }

    /// `PUT /app/{appId}` with any body.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn update_app_with_body(
        &self,
        app_id: &str,
        body: CallBody,
        context: &CallContext,
    ) -> Result<OperationResult<StatusMessage>, ApiClientError> {
        let response = self
            .client
            .update_app_with_body(app_id, body, context)
            .await?;
        read(&UPDATE_APP, response, context).await
    }

    /// `PATCH /app/{appId}/enable/{enabled}`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn enable_app(
        &self,
        app_id: &str,
        enabled: EnableState,
        context: &CallContext,
    ) -> Result<OperationResult<StatusMessage>, ApiClientError> {
        let response = self.client.enable_app(app_id, enabled, context).await?;
        read(&ENABLE_APP, response, context).await
    }

    /// `PATCH /app/{appId}/restart`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn restart_app(
        &self,
        app_id: &str,
        context: &CallContext,
    ) -> Result<OperationResult<StatusMessage>, ApiClientError> {
        let response = self.client.restart_app(app_id, context).await?;
        read(&RESTART_APP, response, context).await
    }

    /// `POST /auth`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn auth(
        &self,
        body: &AuthRequest,
        context: &CallContext,
    ) -> Result<OperationResult<Session>, ApiClientError> {
        let response = self.client.auth(body, context).await?;
        read(&AUTH, response, context).await
    }

    /// `POST /auth` with any body.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn auth_with_body(
        &self,
        body: CallBody,
        context: &CallContext,
    ) -> Result<OperationResult<Session>, ApiClientError> {
        let response = self.client.auth_with_body(body, context).await?;
        read(&AUTH, response, context).await
    }

    /// `GET /catalog`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn get_catalog_apps(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<Catalog>, ApiClientError> {
        let response = self.client.get_catalog_apps(context).await?;
        read(&GET_CATALOG_APPS, response, context).await
    }

    /// `GET /me`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn me(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<Profile>, ApiClientError> {
        let response = self.client.me(context).await?;
        read(&ME, response, context).await
    }

    /// `GET /me/billing`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn me_billing(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<Billing>, ApiClientError> {
        let response = self.client.me_billing(context).await?;
        read(&ME_BILLING, response, context).await
    }

    /// `POST /me/key/generate`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn generate_api_key(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<GeneratedApiKey>, ApiClientError> {
        let response = self.client.generate_api_key(context).await?;
        read(&GENERATE_API_KEY, response, context).await
    }

    /// `GET /me/number`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn reveal_number(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<PhoneNumber>, ApiClientError> {
        let response = self.client.reveal_number(context).await?;
        read(&REVEAL_NUMBER, response, context).await
    }

    /// `GET /me/session`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn me_session(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<Sessions>, ApiClientError> {
        let response = self.client.me_session(context).await?;
        read(&ME_SESSION, response, context).await
    }

    /// `DELETE /me/session/{sessionId}`
    ///
    /// A successful deletion has no payload, only `404` and `500` are decoded.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn delete_session(
        &self,
        session_id: &str,
        context: &CallContext,
    ) -> Result<OperationResult<()>, ApiClientError> {
        let response = self.client.delete_session(session_id, context).await?;
        read(&DELETE_SESSION, response, context).await
    }

    /// `POST /register`
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn register(
        &self,
        context: &CallContext,
    ) -> Result<OperationResult<Session>, ApiClientError> {
        let response = self.client.register(context).await?;
        read(&REGISTER, response, context).await
    }
}

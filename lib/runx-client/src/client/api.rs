use super::{ApiClientError, CallBody, CallContext, CallParams, Client, Transport};
use crate::operations::catalog::{
    AUTH, CREATE_APP, DELETE_APP, DELETE_SESSION, ENABLE_APP, GENERATE_API_KEY, GET_APP, GET_APPS,
    GET_CATALOG_APPS, ME, ME_BILLING, ME_SESSION, REGISTER, RESTART_APP, REVEAL_NUMBER, UPDATE_APP,
};
use crate::operations::models::{AuthRequest, CreateAppRequest, EnableState, UpdateAppRequest};

type RawResult<T> = Result<<T as Transport>::Response, ApiClientError>;

fn app_params(app_id: &str) -> CallParams {
    CallParams::default().add_param("appId", app_id)
}

/// Operations returning the raw transport response.
impl<T> Client<T>
where
    T: Transport,
{
    /// `GET /app`: lists the user applications.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn get_apps(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&GET_APPS.descriptor, &params, None, context).await
    }

    /// `POST /app` with a JSON body: creates applications.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Body`] if the body cannot be serialized, see
    /// [`Client::send`] otherwise.
    pub async fn create_app(&self, body: &CreateAppRequest, context: &CallContext) -> RawResult<T> {
        let body = CallBody::json(body)?;
        self.create_app_with_body(body, context).await
    }

    /// `POST /app` with any body.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn create_app_with_body(
        &self,
        body: CallBody,
        context: &CallContext,
    ) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&CREATE_APP.descriptor, &params, Some(body), context)
            .await
    }

    /// `DELETE /app/{appId}`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn delete_app(&self, app_id: &str, context: &CallContext) -> RawResult<T> {
        let params = app_params(app_id);
        self.send(&DELETE_APP.descriptor, &params, None, context)
            .await
    }

    /// `GET /app/{appId}`: application details and logs.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn get_app(&self, app_id: &str, context: &CallContext) -> RawResult<T> {
        let params = app_params(app_id);
        self.send(&GET_APP.descriptor, &params, None, context).await
    }

    /// `PUT /app/{appId}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Body`] if the body cannot be serialized, see
    /// [`Client::send`] otherwise.
    pub async fn update_app(
        &self,
        app_id: &str,
        body: &UpdateAppRequest,
        context: &CallContext,
    ) -> RawResult<T> {
        let body = CallBody::json(body)?;
        self.update_app_with_body(app_id, body, context).await
    }

    /// `PUT /app/{appId}` with any body.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn update_app_with_body(
        &self,
        app_id: &str,
        body: CallBody,
        context: &CallContext,
    ) -> RawResult<T> {
        let params = app_params(app_id);
        self.send(&UPDATE_APP.descriptor, &params, Some(body), context)
            .await
    }

    /// `PATCH /app/{appId}/enable/{enabled}`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn enable_app(
        &self,
        app_id: &str,
        enabled: EnableState,
        context: &CallContext,
    ) -> RawResult<T> {
        let params = app_params(app_id).add_param("enabled", enabled);
        self.send(&ENABLE_APP.descriptor, &params, None, context)
            .await
    }

    /// `PATCH /app/{appId}/restart`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn restart_app(&self, app_id: &str, context: &CallContext) -> RawResult<T> {
        let params = app_params(app_id);
        self.send(&RESTART_APP.descriptor, &params, None, context)
            .await
    }

    /// `POST /auth` with a JSON body: starts a session for a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Body`] if the body cannot be serialized, see
    /// [`Client::send`] otherwise.
    pub async fn auth(&self, body: &AuthRequest, context: &CallContext) -> RawResult<T> {
        let body = CallBody::json(body)?;
        self.auth_with_body(body, context).await
    }

    /// `POST /auth` with any body.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn auth_with_body(&self, body: CallBody, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&AUTH.descriptor, &params, Some(body), context)
            .await
    }

    /// `GET /catalog`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn get_catalog_apps(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&GET_CATALOG_APPS.descriptor, &params, None, context)
            .await
    }

    /// `GET /me`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn me(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&ME.descriptor, &params, None, context).await
    }

    /// `GET /me/billing`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn me_billing(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&ME_BILLING.descriptor, &params, None, context)
            .await
    }

    /// `POST /me/key/generate`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn generate_api_key(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&GENERATE_API_KEY.descriptor, &params, None, context)
            .await
    }

    /// `GET /me/number`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn reveal_number(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&REVEAL_NUMBER.descriptor, &params, None, context)
            .await
    }

    /// `GET /me/session`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn me_session(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&ME_SESSION.descriptor, &params, None, context)
            .await
    }

    /// `DELETE /me/session/{sessionId}`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn delete_session(&self, session_id: &str, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default().add_param("sessionId", session_id);
        self.send(&DELETE_SESSION.descriptor, &params, None, context)
            .await
    }

    /// `POST /register`
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub async fn register(&self, context: &CallContext) -> RawResult<T> {
        let params = CallParams::default();
        self.send(&REGISTER.descriptor, &params, None, context)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use http::header::{AUTHORIZATION, CONTENT_TYPE};
    use rstest::rstest;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::client::testing::{FakeResponse, FakeTransport};
    use crate::client::{ClientBuilder, TransportResponse, editor_fn};

    fn client(transport: FakeTransport) -> Client<FakeTransport> {
        ClientBuilder::new("https://api.runx.dev/v1")
            .with_bearer("session-token")
            .with_transport(transport)
            .build()
            .expect("valid client")
    }

    #[tokio::test]
    async fn should_send_authenticated_request() {
        let client = client(FakeTransport::ok());

        let response = client
            .get_app("my-app", &CallContext::default())
            .await
            .expect("should send");

        assert_eq!(response.status(), 200);
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri, "https://api.runx.dev/v1/app/my-app");
        assert_eq!(
            request.headers.get(AUTHORIZATION).map(|value| value.as_bytes()),
            Some(&b"Bearer session-token"[..])
        );
    }

    #[rstest]
    #[case::enable(EnableState::True, "https://api.runx.dev/v1/app/web/enable/true")]
    #[case::disable(EnableState::False, "https://api.runx.dev/v1/app/web/enable/false")]
    #[tokio::test]
    async fn should_render_enable_state_in_path(#[case] state: EnableState, #[case] uri: &str) {
        let client = client(FakeTransport::ok());

        client
            .enable_app("web", state, &CallContext::default())
            .await
            .expect("should send");

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::PATCH);
        assert_eq!(requests[0].uri.to_string(), uri);
    }

    #[tokio::test]
    async fn should_send_json_body() {
        let client = client(FakeTransport::ok());
        let body = AuthRequest {
            number: "+33612345678".to_string(),
        };

        client
            .auth(&body, &CallContext::default())
            .await
            .expect("should send");

        let requests = client.transport().requests();
        assert_eq!(
            requests[0].headers.get(CONTENT_TYPE).map(|value| value.as_bytes()),
            Some(&b"application/json"[..])
        );
        insta::assert_snapshot!(
            String::from_utf8_lossy(&requests[0].body),
            @r#"{"number":"+33612345678"}"#
        );
    }

    #[tokio::test]
    async fn should_send_raw_body_with_its_content_type() {
        let client = client(FakeTransport::ok());
        let body = CallBody::raw(
            "number=%2B33612345678",
            headers::ContentType::form_url_encoded(),
        );

        client
            .auth_with_body(body, &CallContext::default())
            .await
            .expect("should send");

        let requests = client.transport().requests();
        assert_eq!(
            requests[0].headers.get(CONTENT_TYPE).map(|value| value.as_bytes()),
            Some(&b"application/x-www-form-urlencoded"[..])
        );
        assert_eq!(requests[0].body.as_ref(), b"number=%2B33612345678");
    }

    #[tokio::test]
    async fn should_apply_call_editors_after_default_editors() {
        let client = client(FakeTransport::ok());
        let context = CallContext::default().with_editor(editor_fn(|_, request| {
            // the default bearer editor already ran
            let has_token = request.headers().contains_key(AUTHORIZATION);
            request.headers_mut().insert(
                "x-saw-token",
                http::HeaderValue::from_static(if has_token { "yes" } else { "no" }),
            );
            Ok(())
        }));

        client.me(&context).await.expect("should send");

        let requests = client.transport().requests();
        assert_eq!(
            requests[0].headers.get("x-saw-token").map(|value| value.as_bytes()),
            Some(&b"yes"[..])
        );
    }

    #[tokio::test]
    async fn should_not_send_when_an_editor_fails() {
        let client = client(FakeTransport::ok());
        let context =
            CallContext::default().with_editor(editor_fn(|_, _| Err("refused by policy".into())));

        let error = client
            .delete_session("s1", &context)
            .await
            .expect_err("editor fails");

        assert!(client.transport().requests().is_empty());
        insta::assert_snapshot!(error.to_string(), @"Request editor #1 failed: refused by policy");
    }

    #[tokio::test]
    async fn should_send_empty_path_segment() {
        let client = client(FakeTransport::ok());

        client
            .get_app("", &CallContext::default())
            .await
            .expect("an empty id is still a supplied parameter");

        assert_eq!(
            client.transport().requests()[0].uri,
            "https://api.runx.dev/v1/app/"
        );
    }

    #[rstest]
    #[case::parent("..")]
    #[case::current(".")]
    #[tokio::test]
    async fn should_not_send_dot_segment_ids(#[case] app_id: &str) {
        let client = client(FakeTransport::ok());

        let error = client
            .delete_app(app_id, &CallContext::default())
            .await
            .map(|_| ())
            .expect_err("dot segments are rejected");

        assert!(matches!(
            error,
            ApiClientError::Encoding(crate::client::EncodingError::DotSegment { .. })
        ));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn should_surface_transport_errors() {
        let transport = FakeTransport::new(|_| {
            Err(crate::client::TransportError::new(
                crate::client::TransportErrorKind::Connect,
                "connection refused",
            ))
        });
        let client = client(transport);

        let error = client
            .register(&CallContext::default())
            .await
            .expect_err("transport fails");

        insta::assert_snapshot!(error.to_string(), @"connection error: connection refused");
    }

    #[tokio::test]
    async fn should_cancel_while_waiting_for_the_server() {
        let client = Arc::new(client(FakeTransport::hanging()));
        let token = CancellationToken::new();
        let context = CallContext::default().with_cancellation(token.clone());

        let call = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.get_apps(&context).await.map(|_| ()) }
        });
        tokio::task::yield_now().await;
        token.cancel();

        let result = call.await.expect("task should not panic");
        assert!(matches!(result, Err(ApiClientError::Cancelled)));
    }

    #[tokio::test]
    async fn should_not_call_transport_when_already_cancelled() {
        let client = client(FakeTransport::ok());
        let token = CancellationToken::new();
        token.cancel();
        let context = CallContext::default().with_cancellation(token);

        let result = client.generate_api_key(&context).await;

        assert!(matches!(result, Err(ApiClientError::Cancelled)));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn should_expose_unexpected_status_untouched() {
        let client = client(FakeTransport::new(|_| {
            Ok(FakeResponse::new(418, Some("text/plain"), "teapot"))
        }));

        let response = client
            .reveal_number(&CallContext::default())
            .await
            .expect("raw calls never decode");

        assert_eq!(response.status(), 418);
    }
}

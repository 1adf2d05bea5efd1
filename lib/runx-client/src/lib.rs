//! # runx client
//!
//! Typed HTTP client for the runx application hosting API.
//!
//! Two calling surfaces are available:
//! - **[`Client`]** - builds and sends the request, returns the raw transport response
//! - **[`ClientWithResponses`]** - the same calls, with the response body read once
//!   and decoded into the payload documented for its status
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runx_client::models::{AppRequest, CreateAppRequest};
//! use runx_client::{CallContext, ClientWithResponses};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientWithResponses::new("https://api.runx.dev", "my-api-key")?;
//!
//! let request = CreateAppRequest {
//!     apps: vec![AppRequest {
//!         app: "jupyter".to_string(),
//!         name: "notebook".to_string(),
//!         gpu: Some(1),
//!         ..AppRequest::default()
//!     }],
//!     pack: None,
//! };
//! let result = client.create_app(&request, &CallContext::default()).await?;
//!
//! match result.success() {
//!     Some(created) => println!("{:?}", created.message),
//!     None => eprintln!("{}: {:?}", result.status(), result.error_message()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Call pipeline
//!
//! Each call runs these steps, strictly in order:
//!
//! 1. **Request building**: parameters are encoded and substituted into the
//!    operation path, resolved against the server URL
//! 2. **Editors**: the client default editors (authentication last), then the
//!    per call editors from [`CallContext`]
//! 3. **Transport**: sends the request and waits for the response head
//! 4. **Decoding** (typed surface only): the body is read once, then the first
//!    rule matching the status and content type decodes it
//!
//! The call cancellation token is only observed while waiting on the network:
//! during the transport step and while reading the body.
//!
//! Nothing is retried, and no timeout is applied by this crate: configure them
//! on the transport, e.g. with [`ClientBuilder::with_reqwest_client`].
//!
//! ## Customizing requests
//!
//! ```rust
//! use http::HeaderValue;
//! use runx_client::{ClientBuilder, editor_fn};
//!
//! # fn example() -> Result<(), runx_client::ApiClientError> {
//! let client = ClientBuilder::new("https://api.runx.dev")
//!     .with_bearer("my-api-key")
//!     .with_request_editor(editor_fn(|_, request| {
//!         request
//!             .headers_mut()
//!             .insert("x-client", HeaderValue::from_static("runx-cli"));
//!         Ok(())
//!     }))
//!     .build()?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is an [`ApiClientError`]. Documented error statuses are not
//! errors: they decode into [`Payload::Error`].

mod client;

pub mod operations;

pub use self::client::request;
pub use self::client::response;
pub use self::client::{
    ApiClientError, Authentication, AuthenticationError, BoxError, CallBody, CallContext,
    CallParams, Client, ClientBuilder, ClientWithResponses, EditorChain, EditorError, EditorFn,
    EncodingError, OperationResult, ParamLocation, ParamSpec, ParamStyle, ReqwestTransport,
    RequestEditor, SecureString, SharedEditor, Transport, TransportError, TransportErrorKind,
    TransportResponse, editor_fn, encode,
};
pub use self::client::response::TypedResult;
pub use self::operations::{Endpoint, OperationDescriptor, Payload, catalog, models};

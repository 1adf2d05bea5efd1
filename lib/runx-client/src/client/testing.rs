//! In-memory transport used by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};

use super::error::TransportError;
use super::transport::{Transport, TransportResponse};

/// Counts body reads and response releases.
#[derive(Debug, Clone, Default)]
pub(crate) struct BodyProbe {
    reads: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl BodyProbe {
    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub(crate) struct FakeResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    stalled: bool,
    probe: BodyProbe,
}

impl FakeResponse {
    pub(crate) fn new(
        status: u16,
        content_type: Option<&'static str>,
        body: impl Into<Bytes>,
    ) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Self {
            status: StatusCode::from_u16(status).expect("a valid status"),
            headers,
            body: body.into(),
            stalled: false,
            probe: BodyProbe::default(),
        }
    }

    /// Sends its head, then never completes the body.
    pub(crate) fn stalled(status: u16, content_type: Option<&'static str>) -> Self {
        let mut response = Self::new(status, content_type, Bytes::new());
        response.stalled = true;
        response
    }

    pub(crate) fn json(status: u16, body: &'static str) -> Self {
        Self::new(status, Some("application/json"), body)
    }

    pub(crate) fn probe(&self) -> BodyProbe {
        self.probe.clone()
    }
}

impl Drop for FakeResponse {
    fn drop(&mut self) {
        self.probe.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl TransportResponse for FakeResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn into_body(self) -> Result<Bytes, TransportError> {
        self.probe.reads.fetch_add(1, Ordering::SeqCst);
        if self.stalled {
            std::future::pending::<()>().await;
        }
        Ok(self.body.clone())
    }
}

/// What the fake transport received.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

type Responder =
    Box<dyn Fn(&RecordedRequest) -> Result<FakeResponse, TransportError> + Send + Sync>;

pub(crate) struct FakeTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Responder,
    hang: bool,
}

impl FakeTransport {
    pub(crate) fn new(
        responder: impl Fn(&RecordedRequest) -> Result<FakeResponse, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            hang: false,
        }
    }

    /// Always answers `200 {}`.
    pub(crate) fn ok() -> Self {
        Self::new(|_| Ok(FakeResponse::json(200, "{}")))
    }

    /// Never answers.
    pub(crate) fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::ok()
        }
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock poisoned").clone()
    }
}

impl Transport for FakeTransport {
    type Response = FakeResponse;

    async fn execute(&self, request: Request<Bytes>) -> Result<FakeResponse, TransportError> {
        let (parts, body) = request.into_parts();
        let recorded = RecordedRequest {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        };
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(recorded.clone());

        if self.hang {
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
        (self.responder)(&recorded)
    }
}

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Request;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::error::{BoxError, EditorError};

/// A mutator applied to every outgoing request before it is sent.
///
/// Editors only see the request: they can add headers, rewrite the URI or
/// replace the body, but never observe the response. When an editor fails the
/// request is not sent, and mutations done by the editors that already ran are
/// kept, so an editor must leave the request in a usable state when it fails
/// halfway.
///
/// Editors touching shared state (a token cache, a counter...) must provide
/// their own synchronization.
pub trait RequestEditor: Send + Sync {
    /// Edits the request.
    ///
    /// # Errors
    ///
    /// Any error aborts the call with [`ApiClientError::Editor`](super::ApiClientError::Editor).
    fn edit(&self, cancellation: &CancellationToken, request: &mut Request<Bytes>)
    -> Result<(), BoxError>;
}

/// A shared, type-erased request editor.
pub type SharedEditor = Arc<dyn RequestEditor>;

/// Adapts a closure into a [`RequestEditor`].
///
/// # Example
///
/// ```rust
/// use http::HeaderValue;
/// use runx_client::editor_fn;
///
/// let editor = editor_fn(|_cancellation, request| {
///     request
///         .headers_mut()
///         .insert("x-request-source", HeaderValue::from_static("cli"));
///     Ok(())
/// });
/// # let _ = editor;
/// ```
pub fn editor_fn<F>(f: F) -> EditorFn<F>
where
    F: Fn(&CancellationToken, &mut Request<Bytes>) -> Result<(), BoxError> + Send + Sync,
{
    EditorFn(f)
}

/// A closure used as a [`RequestEditor`], see [`editor_fn`].
#[derive(Clone)]
pub struct EditorFn<F>(F);

impl<F> fmt::Debug for EditorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EditorFn")
    }
}

impl<F> RequestEditor for EditorFn<F>
where
    F: Fn(&CancellationToken, &mut Request<Bytes>) -> Result<(), BoxError> + Send + Sync,
{
    fn edit(
        &self,
        cancellation: &CancellationToken,
        request: &mut Request<Bytes>,
    ) -> Result<(), BoxError> {
        (self.0)(cancellation, request)
    }
}

/// Ordered list of the editors registered on a client.
#[derive(Clone, Default)]
pub struct EditorChain {
    editors: Vec<SharedEditor>,
}

impl fmt::Debug for EditorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorChain")
            .field("len", &self.editors.len())
            .finish()
    }
}

impl EditorChain {
    /// Appends an editor at the end of the chain.
    pub fn push(&mut self, editor: SharedEditor) {
        self.editors.push(editor);
    }

    /// Number of registered editors.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Whether no editor is registered.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Applies the registered editors, then `extra`, strictly in order.
    ///
    /// Stops at the first failure. The failing position is counted across both
    /// groups: with two registered editors, the first `extra` editor is `#2`.
    ///
    /// # Errors
    ///
    /// Returns the [`EditorError`] of the first failing editor.
    pub fn apply(
        &self,
        extra: &[SharedEditor],
        cancellation: &CancellationToken,
        request: &mut Request<Bytes>,
    ) -> Result<(), EditorError> {
        for (index, editor) in self.editors.iter().chain(extra).enumerate() {
            trace!(index, uri = %request.uri(), "applying request editor");
            editor
                .edit(cancellation, request)
                .map_err(|source| EditorError::new(index, source))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::HeaderValue;

    use super::*;

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> SharedEditor {
        let log = Arc::clone(log);
        Arc::new(editor_fn(move |_, request| {
            log.lock().expect("lock poisoned").push(name);
            request
                .headers_mut()
                .append("x-editor", HeaderValue::from_static(name));
            Ok(())
        }))
    }

    fn failing(message: &'static str) -> SharedEditor {
        Arc::new(editor_fn(move |_, _| Err(message.into())))
    }

    fn request() -> Request<Bytes> {
        Request::new(Bytes::new())
    }

    #[test]
    fn should_apply_defaults_then_call_editors_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = EditorChain::default();
        chain.push(recording(&log, "default-1"));
        chain.push(recording(&log, "default-2"));
        let extra = [recording(&log, "call-1"), recording(&log, "call-2")];
        let mut request = request();

        chain
            .apply(&extra, &CancellationToken::new(), &mut request)
            .expect("editors should succeed");

        assert_eq!(
            *log.lock().expect("lock poisoned"),
            vec!["default-1", "default-2", "call-1", "call-2"]
        );
        let headers = request
            .headers()
            .get_all("x-editor")
            .iter()
            .map(|value| value.to_str().expect("ascii"))
            .collect::<Vec<_>>();
        assert_eq!(headers, vec!["default-1", "default-2", "call-1", "call-2"]);
    }

    #[test]
    fn should_stop_at_first_failure_without_rollback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = EditorChain::default();
        chain.push(recording(&log, "default-1"));
        let extra = [failing("token expired"), recording(&log, "never")];
        let mut request = request();

        let error = chain
            .apply(&extra, &CancellationToken::new(), &mut request)
            .expect_err("second editor fails");

        assert_eq!(error.index(), 1);
        assert_eq!(*log.lock().expect("lock poisoned"), vec!["default-1"]);
        // mutation from the first editor is kept
        assert_eq!(
            request.headers().get("x-editor"),
            Some(&HeaderValue::from_static("default-1"))
        );
        insta::assert_snapshot!(error.to_string(), @"Request editor #1 failed: token expired");
    }

    #[test]
    fn should_pass_the_call_cancellation_token() {
        let token = CancellationToken::new();
        token.cancel();
        let mut chain = EditorChain::default();
        chain.push(Arc::new(editor_fn(|cancellation, _| {
            if cancellation.is_cancelled() {
                Err("cancelled".into())
            } else {
                Ok(())
            }
        })));

        let result = chain.apply(&[], &token, &mut request());

        assert!(result.is_err());
    }

    #[test]
    fn should_succeed_with_empty_chain() {
        let chain = EditorChain::default();

        assert!(chain.is_empty());
        chain
            .apply(&[], &CancellationToken::new(), &mut request())
            .expect("nothing to apply");
    }
}

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::result::TypedResult;
use super::rule::DecodeTable;
use crate::client::ApiClientError;
use crate::client::transport::TransportResponse;

const BODY_MAX_LENGTH: usize = 1024;

/// Reads the response body once and decodes it with `table`.
///
/// The response is consumed: its stream is released when this returns,
/// whatever the outcome. Reading the body waits on the network, so it stops
/// as soon as `cancellation` fires.
///
/// # Errors
///
/// - [`ApiClientError::Transport`] if the body cannot be read
/// - [`ApiClientError::Cancelled`] if the token fires while reading the body
/// - [`ApiClientError::Decode`] if a rule matched but the body does not fit it
pub async fn decode<R, P>(
    operation_id: &'static str,
    table: &DecodeTable<P>,
    response: R,
    cancellation: &CancellationToken,
) -> Result<TypedResult<P>, ApiClientError>
where
    R: TransportResponse,
    P: 'static,
{
    let status = response.status();
    let headers = response.headers().clone();
    let body = tokio::select! {
        biased;
        () = cancellation.cancelled() => {
            debug!(operation_id, %status, "cancelled while reading the body");
            return Err(ApiClientError::Cancelled);
        }
        body = response.into_body() => body?,
    };
    decode_parts(operation_id, table, status, headers, body)
}

/// Decodes an already read response.
///
/// # Errors
///
/// Returns [`ApiClientError::Decode`] if a rule matched but the body does not fit it.
pub fn decode_parts<P: 'static>(
    operation_id: &'static str,
    table: &DecodeTable<P>,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
) -> Result<TypedResult<P>, ApiClientError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let Some(rule) = table.find(status, content_type) else {
        warn!(
            operation_id,
            %status,
            content_type,
            "no decode rule matches the response, keeping the raw body"
        );
        return Ok(TypedResult::new(status, headers, body, None));
    };

    debug!(operation_id, %status, family = %rule.family(), "decoding response");
    let payload = rule
        .decode(&body)
        .map_err(|err| ApiClientError::Decode {
            operation_id,
            status,
            path: err.path().to_string(),
            error: err.into_inner(),
            body: truncate(&body),
        })?;

    Ok(TypedResult::new(status, headers, body, Some(payload)))
}

fn truncate(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > BODY_MAX_LENGTH {
        let head = text.chars().take(BODY_MAX_LENGTH).collect::<String>();
        format!("{head}... (truncated)")
    } else {
        text.into_owned()
    }
}

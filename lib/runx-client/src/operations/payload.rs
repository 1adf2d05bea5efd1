use serde::de::DeserializeOwned;

use super::models::ErrorResponse;
use crate::client::response::{DecodeFailure, TypedResult, json};

/// Decoded body of a runx response.
///
/// The `200` rule decodes the operation success shape, every other documented
/// status decodes the shared [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    /// The `200` payload.
    Success(T),
    /// The payload of a documented error status.
    Error(ErrorResponse),
}

/// Decodes a success payload.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] if the body does not fit `T`.
pub fn success<T>(body: &[u8]) -> Result<Payload<T>, DecodeFailure>
where
    T: DeserializeOwned,
{
    json(body).map(Payload::Success)
}

/// Decodes an error payload.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] if the body is not an [`ErrorResponse`].
pub fn failure<T>(body: &[u8]) -> Result<Payload<T>, DecodeFailure> {
    json(body).map(Payload::Error)
}

impl<T> TypedResult<Payload<T>> {
    /// The success payload, if the response decoded as one.
    pub fn success(&self) -> Option<&T> {
        match self.payload() {
            Some(Payload::Success(value)) => Some(value),
            _ => None,
        }
    }

    /// The error payload, if the response decoded as one.
    pub fn error(&self) -> Option<&ErrorResponse> {
        match self.payload() {
            Some(Payload::Error(error)) => Some(error),
            _ => None,
        }
    }

    /// The error message of a documented error response.
    pub fn error_message(&self) -> Option<&str> {
        self.error().and_then(|error| error.error.as_deref())
    }

    /// Consumes the result and returns the success payload.
    pub fn into_success(self) -> Option<T> {
        match self.into_payload() {
            Some(Payload::Success(value)) => Some(value),
            _ => None,
        }
    }
}

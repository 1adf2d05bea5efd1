use bytes::Bytes;
use headers::ContentType;
use serde::Serialize;

use crate::client::ApiClientError;

/// The body of a request, with its content type.
///
/// The runx operations only send JSON bodies, but a raw body can be used with
/// the `*_with_body` operation variants.
#[derive(Clone, derive_more::Debug)]
pub struct CallBody {
    pub(in crate::client) content_type: ContentType,
    #[debug(ignore)]
    pub(in crate::client) data: Bytes,
}

impl CallBody {
    /// Creates an `application/json` body from a serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Body`] if the value cannot be serialized.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use runx_client::CallBody;
    /// # use runx_client::models::AuthRequest;
    /// # fn example() -> Result<(), runx_client::ApiClientError> {
    /// let body = CallBody::json(&AuthRequest {
    ///     number: "+33600000000".to_string(),
    /// })?;
    /// assert_eq!(body.content_type().to_string(), "application/json");
    /// # Ok(())
    /// # }
    /// ```
    pub fn json<T>(value: &T) -> Result<Self, ApiClientError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value)?;
        Ok(Self {
            content_type: ContentType::json(),
            data: Bytes::from(data),
        })
    }

    /// Creates a body with a caller supplied content type.
    pub fn raw(data: impl Into<Bytes>, content_type: ContentType) -> Self {
        Self {
            content_type,
            data: data.into(),
        }
    }

    /// Creates a `text/plain` body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::raw(text.into(), ContentType::text_utf8())
    }

    /// The body content type.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The encoded body.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct NewApp {
        name: &'static str,
        gpu: bool,
    }

    #[test]
    fn should_create_json_body() {
        let body = CallBody::json(&NewApp {
            name: "web",
            gpu: false,
        })
        .expect("should serialize");

        assert_eq!(body.content_type(), &ContentType::json());
        assert_eq!(body.data(), br#"{"name":"web","gpu":false}"#);
    }

    #[test]
    fn should_create_raw_body() {
        let body = CallBody::raw(b"<app/>".to_vec(), ContentType::xml());

        assert_eq!(body.content_type(), &ContentType::xml());
        assert_eq!(body.data(), b"<app/>");
    }

    #[test]
    fn should_not_display_body_in_debug() {
        let body = CallBody::text("secret payload");

        let debug = format!("{body:?}");

        assert!(!debug.contains("secret payload"));
        assert!(debug.contains("content_type"));
    }
}

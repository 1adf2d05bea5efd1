use std::fmt;

use http::StatusCode;
use serde::de::DeserializeOwned;

/// Error raised when a body does not fit the expected payload shape.
pub type DecodeFailure = serde_path_to_error::Error<serde_json::Error>;

/// Turns raw body bytes into a payload.
pub type Decoder<P> = fn(&[u8]) -> Result<P, DecodeFailure>;

/// Deserializes a JSON body, tracking the path of the failing field.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] if the body is not valid JSON for `T`.
pub fn json<T>(body: &[u8]) -> Result<T, DecodeFailure>
where
    T: DeserializeOwned,
{
    let deserializer = &mut serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(deserializer)
}

/// A family of media types, matched loosely against the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContentTypeFamily {
    /// Any media type mentioning `json`: `application/json`,
    /// `application/json; charset=utf-8`, `application/problem+json`...
    #[display("json")]
    Json,
}

impl ContentTypeFamily {
    fn marker(self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }

    /// Whether the header value belongs to this family.
    ///
    /// Parameters like `charset` are ignored, and so is the case.
    pub fn matches(self, content_type: &str) -> bool {
        content_type.to_ascii_lowercase().contains(self.marker())
    }
}

/// Maps a `(status, content type family)` pair to a payload decoder.
pub struct DecodeRule<P> {
    status: StatusCode,
    family: ContentTypeFamily,
    decoder: Decoder<P>,
}

impl<P> Clone for DecodeRule<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for DecodeRule<P> {}

impl<P> fmt::Debug for DecodeRule<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeRule")
            .field("status", &self.status)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl<P> DecodeRule<P> {
    /// Creates a rule.
    pub const fn new(status: StatusCode, family: ContentTypeFamily, decoder: Decoder<P>) -> Self {
        Self {
            status,
            family,
            decoder,
        }
    }

    /// Creates a rule for a JSON response.
    pub const fn json(status: StatusCode, decoder: Decoder<P>) -> Self {
        Self::new(status, ContentTypeFamily::Json, decoder)
    }

    /// The matched status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The matched content type family.
    pub fn family(&self) -> ContentTypeFamily {
        self.family
    }

    /// Whether a response with this status and content type uses this rule.
    pub fn matches(&self, status: StatusCode, content_type: &str) -> bool {
        self.status == status && self.family.matches(content_type)
    }

    /// Decodes a body with this rule.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeFailure`] if the body does not fit the payload shape.
    pub fn decode(&self, body: &[u8]) -> Result<P, DecodeFailure> {
        (self.decoder)(body)
    }
}

/// The decode rules of one operation.
///
/// Rules are static configuration; their keys are expected to be pairwise
/// disjoint, so at most one rule matches a response.
pub struct DecodeTable<P: 'static> {
    rules: &'static [DecodeRule<P>],
}

impl<P: 'static> Clone for DecodeTable<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: 'static> Copy for DecodeTable<P> {}

impl<P: 'static> fmt::Debug for DecodeTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules).finish()
    }
}

impl<P: 'static> DecodeTable<P> {
    /// Wraps a static rule list.
    pub const fn new(rules: &'static [DecodeRule<P>]) -> Self {
        Self { rules }
    }

    /// The rules, in declaration order.
    pub fn rules(&self) -> &'static [DecodeRule<P>] {
        self.rules
    }

    /// Documented statuses, in declaration order.
    pub fn statuses(&self) -> impl Iterator<Item = StatusCode> + '_ {
        self.rules.iter().map(DecodeRule::status)
    }

    /// Finds the rule for a response.
    pub fn find(&self, status: StatusCode, content_type: &str) -> Option<&'static DecodeRule<P>> {
        self.rules
            .iter()
            .find(|rule| rule.matches(status, content_type))
    }

    /// Checks that no two rules share the same `(status, family)` key.
    pub fn is_disjoint(&self) -> bool {
        self.rules.iter().enumerate().all(|(index, rule)| {
            self.rules
                .iter()
                .skip(index + 1)
                .all(|other| (other.status, other.family) != (rule.status, rule.family))
        })
    }
}

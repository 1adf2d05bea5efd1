use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::client::error::EncodingError;

/// Characters escaped inside a path segment: everything but RFC 3986 unreserved characters.
///
/// A `/` in a value is escaped, so it never splits the segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Characters escaped inside a query value.
///
/// Less strict than [`PATH_SEGMENT`]: sub-delimiters that cannot end a query
/// pair are kept as is.
const QUERY_VALUE: &AsciiSet = &PATH_SEGMENT
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b';')
    .remove(b':')
    .remove(b'@')
    .remove(b'/')
    .remove(b'?');

/// Where an encoded parameter is placed in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParamLocation {
    /// Substituted into the path template.
    #[display("path")]
    Path,
    /// Appended to the query string.
    #[display("query")]
    Query,
    /// Sent as a request header.
    #[display("header")]
    Header,
}

/// Parameter serialization styles (non-exploded).
///
/// All operations of the runx API use [`ParamStyle::Simple`]; the other styles
/// follow the OpenAPI 3 rules for their location.
///
/// | style    | location    | scalar `5`  | array `[3, 4]` |
/// |----------|-------------|-------------|----------------|
/// | `Simple` | path/header | `5`         | `3,4`          |
/// | `Label`  | path        | `.5`        | `.3,4`         |
/// | `Matrix` | path        | `;id=5`     | `;id=3,4`      |
/// | `Form`   | query       | `5`         | `3,4`          |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParamStyle {
    /// Simple style: `value1,value2`
    #[default]
    #[display("simple")]
    Simple,
    /// Label style: `.value1,value2` (path only)
    #[display("label")]
    Label,
    /// Matrix style: `;name=value1,value2` (path only)
    #[display("matrix")]
    Matrix,
    /// Form style: `name=value1,value2` (query only)
    #[display("form")]
    Form,
}

impl ParamStyle {
    fn supports(self, location: ParamLocation) -> bool {
        match self {
            Self::Simple => true,
            Self::Label | Self::Matrix => location == ParamLocation::Path,
            Self::Form => location == ParamLocation::Query,
        }
    }
}

/// Declaration of one operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, as it appears in the path template, query string or header.
    pub name: &'static str,
    /// Where the parameter goes.
    pub location: ParamLocation,
    /// How the parameter is rendered.
    pub style: ParamStyle,
    /// Whether the call fails when the parameter is missing.
    pub required: bool,
}

impl ParamSpec {
    /// A required, simple-style path parameter.
    pub const fn path(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Path,
            style: ParamStyle::Simple,
            required: true,
        }
    }

    /// An optional, form-style query parameter.
    pub const fn query(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Query,
            style: ParamStyle::Form,
            required: false,
        }
    }

    /// An optional, simple-style header parameter.
    pub const fn header(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Header,
            style: ParamStyle::Simple,
            required: false,
        }
    }

    /// Changes the serialization style.
    #[must_use]
    pub const fn with_style(mut self, style: ParamStyle) -> Self {
        self.style = style;
        self
    }

    /// Marks the parameter as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Renders `value` for this parameter.
    ///
    /// # Errors
    ///
    /// See [`encode`].
    pub fn encode(&self, value: &Value) -> Result<String, EncodingError> {
        encode(self.name, value, self.style, self.location)
    }
}

/// Encodes a parameter value into its textual request representation.
///
/// Scalars are rendered with their plain text form (`null` becomes an empty string),
/// arrays of scalars are joined with `,`. Each rendered item is percent-encoded
/// with the rules of the target location: path segments are the strictest,
/// query values keep a few sub-delimiters, header values are left untouched.
///
/// # Errors
///
/// Returns an [`EncodingError`] if the style is not allowed at `location`, if
/// the value is an object or a nested array, or if a path value renders to a
/// `.` or `..` segment.
pub fn encode(
    name: &str,
    value: &Value,
    style: ParamStyle,
    location: ParamLocation,
) -> Result<String, EncodingError> {
    if !style.supports(location) {
        return Err(EncodingError::UnsupportedStyle {
            name: name.to_string(),
            style,
            location,
        });
    }

    let items = match value {
        Value::Array(values) => values
            .iter()
            .map(|item| scalar_to_string(item).ok_or_else(|| unsupported(name, style, value)))
            .collect::<Result<Vec<_>, _>>()?,
        _ => vec![scalar_to_string(value).ok_or_else(|| unsupported(name, style, value))?],
    };

    let joined = items
        .iter()
        .map(|item| escape(item, location))
        .collect::<Vec<_>>()
        .join(",");

    let encoded = match style {
        ParamStyle::Simple | ParamStyle::Form => joined,
        ParamStyle::Label => format!(".{joined}"),
        ParamStyle::Matrix => format!(";{}={joined}", escape(name, location)),
    };
    if location == ParamLocation::Path && matches!(encoded.as_str(), "." | "..") {
        return Err(EncodingError::DotSegment {
            name: name.to_string(),
            value: encoded,
        });
    }
    Ok(encoded)
}

/// Percent-encodes a query parameter name.
pub(in crate::client) fn escape_query_name(name: &str) -> String {
    escape(name, ParamLocation::Query)
}

fn escape(raw: &str, location: ParamLocation) -> String {
    match location {
        ParamLocation::Path => utf8_percent_encode(raw, PATH_SEGMENT).to_string(),
        ParamLocation::Query => utf8_percent_encode(raw, QUERY_VALUE).to_string(),
        ParamLocation::Header => raw.to_string(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn unsupported(name: &str, style: ParamStyle, value: &Value) -> EncodingError {
    EncodingError::UnsupportedValue {
        name: name.to_string(),
        style,
        value: value.clone(),
    }
}

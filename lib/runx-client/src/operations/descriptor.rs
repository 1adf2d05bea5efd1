use std::fmt;
use std::sync::LazyLock;

use http::Method;
use regex::Regex;

use crate::client::ParamSpec;
use crate::client::response::DecodeTable;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

/// Returns the first `{name}` placeholder left in `path`, if any.
pub(crate) fn find_placeholder(path: &str) -> Option<&str> {
    PLACEHOLDER
        .captures(path)
        .and_then(|captures| captures.name("name"))
        .map(|name| name.as_str())
}

/// Immutable description of one API call.
///
/// The parameter list order follows the placeholder order of the path template.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// The operation id, like `getApp`.
    pub id: &'static str,
    /// The HTTP method.
    pub method: Method,
    /// The path template, relative to the server URL, like `/app/{appId}`.
    pub path: &'static str,
    /// The declared parameters.
    pub params: &'static [ParamSpec],
}

impl OperationDescriptor {
    /// Describes an operation.
    pub const fn new(
        id: &'static str,
        method: Method,
        path: &'static str,
        params: &'static [ParamSpec],
    ) -> Self {
        Self {
            id,
            method,
            path,
            params,
        }
    }

    /// Placeholder names of the path template, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        PLACEHOLDER
            .captures_iter(self.path)
            .filter_map(|captures| captures.name("name"))
            .map(|name| name.as_str())
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.method, self.path, self.id)
    }
}

/// An operation with the rules used to decode its responses into `P`.
pub struct Endpoint<P: 'static> {
    /// How to build the request.
    pub descriptor: OperationDescriptor,
    /// How to decode the response.
    pub table: DecodeTable<P>,
}

impl<P: 'static> fmt::Debug for Endpoint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("descriptor", &self.descriptor)
            .field("table", &self.table)
            .finish()
    }
}

impl<P: 'static> Endpoint<P> {
    /// Pairs a descriptor with its decode table.
    pub const fn new(descriptor: OperationDescriptor, table: DecodeTable<P>) -> Self {
        Self { descriptor, table }
    }
}

//! Static description of the runx API: operations, decode tables and models.

pub mod catalog;

pub(crate) mod descriptor;
pub use self::descriptor::{Endpoint, OperationDescriptor};

pub mod models;

mod payload;
pub use self::payload::{Payload, failure, success};

//! Status and content type aware response decoding.

mod decode;
pub use self::decode::{decode, decode_parts};

mod result;
pub use self::result::TypedResult;

mod rule;
pub use self::rule::{ContentTypeFamily, DecodeFailure, DecodeRule, DecodeTable, Decoder, json};

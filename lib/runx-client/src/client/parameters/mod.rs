mod body;
pub use self::body::CallBody;

mod param;
pub(in crate::client) use self::param::escape_query_name;
pub use self::param::{ParamLocation, ParamSpec, ParamStyle, encode};

mod params;
pub use self::params::CallParams;

//! Shared data structures

mod bytes_stream;
mod ordered_headers;
mod ordered_qs;

pub use self::bytes_stream::BytesStream;
pub use self::ordered_headers::OrderedHeaders;
pub use self::ordered_qs::OrderedQs;

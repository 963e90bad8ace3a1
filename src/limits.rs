//! Protocol limits

/// Maximum size of a request head (status line + headers)
pub const MAX_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size of a request body
pub const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Maximum byte length of an object key
pub const MAX_KEY_LENGTH: usize = 1024;

/// Minimum byte length of a bucket name
pub const MIN_BUCKET_LENGTH: usize = 3;

/// Maximum byte length of a bucket name
pub const MAX_BUCKET_LENGTH: usize = 63;

/// Maximum part number of a multipart upload
pub const MAX_PART_NUMBER: u32 = 10000;

/// Default and maximum `max-keys` of a `ListObjectsV2` request
pub const MAX_KEYS: usize = 1000;

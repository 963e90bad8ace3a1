//! S3 operations

pub mod abort_multipart_upload;
pub mod complete_multipart_upload;
pub mod create_bucket;
pub mod create_multipart_upload;
pub mod delete_bucket;
pub mod delete_object;
pub mod delete_objects;
pub mod get_object;
pub mod head_bucket;
pub mod head_object;
pub mod list_buckets;
pub mod list_objects_v2;
pub mod put_object;
pub mod upload_part;

use crate::dto::ByteStream;
use crate::Body;

use std::io;

use futures::stream::StreamExt;

/// transform a hyper `Body` into a `ByteStream`
pub(crate) fn transform_body_stream(body: Body) -> ByteStream {
    let stream = body.map(|try_chunk| {
        try_chunk.map_err(|e| {
            io::Error::new(io::ErrorKind::Other, format!("Error obtaining chunk: {}", e))
        })
    });
    ByteStream::new(stream)
}

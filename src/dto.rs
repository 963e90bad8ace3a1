//! Operation request and output records

use crate::headers::Range;

use std::fmt::{self, Debug};
use std::io;
use std::pin::Pin;

use futures::stream::Stream;
use hyper::body::Bytes;

/// A boxed stream of body bytes
pub struct ByteStream(Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>);

impl ByteStream {
    /// Constructs a `ByteStream`
    pub fn new(stream: impl Stream<Item = io::Result<Bytes>> + Send + 'static) -> Self {
        Self(Box::pin(stream))
    }
}

impl Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream")
    }
}

impl Stream for ByteStream {
    type Item = io::Result<Bytes>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.0.as_mut().poll_next(cx)
    }
}

/// `CreateBucket` request
#[derive(Debug)]
pub struct CreateBucketRequest {
    /// bucket name
    pub bucket: String,
}

/// `CreateBucket` output
#[derive(Debug, Default)]
pub struct CreateBucketOutput {
    /// bucket location
    pub location: Option<String>,
}

/// `DeleteBucket` request
#[derive(Debug)]
pub struct DeleteBucketRequest {
    /// bucket name
    pub bucket: String,
}

/// `DeleteBucket` output
#[derive(Debug, Clone, Copy)]
pub struct DeleteBucketOutput;

/// `HeadBucket` request
#[derive(Debug)]
pub struct HeadBucketRequest {
    /// bucket name
    pub bucket: String,
}

/// `HeadBucket` output
#[derive(Debug, Clone, Copy)]
pub struct HeadBucketOutput;

/// `ListBuckets` request
#[derive(Debug, Clone, Copy, Default)]
pub struct ListBucketsRequest;

/// A bucket entry of `ListBuckets`
#[derive(Debug)]
pub struct Bucket {
    /// bucket name
    pub name: String,
    /// creation date (ISO 8601)
    pub creation_date: Option<String>,
}

/// `ListBuckets` output
#[derive(Debug, Default)]
pub struct ListBucketsOutput {
    /// buckets
    pub buckets: Vec<Bucket>,
}

/// `ListObjectsV2` request
#[derive(Debug)]
pub struct ListObjectsV2Request {
    /// bucket name
    pub bucket: String,
    /// key prefix filter
    pub prefix: Option<String>,
    /// delimiter for grouping keys
    pub delimiter: Option<String>,
    /// maximum number of emitted entries
    pub max_keys: Option<usize>,
    /// opaque pagination cursor
    pub continuation_token: Option<String>,
}

/// An object entry of `ListObjectsV2`
#[derive(Debug)]
pub struct Object {
    /// object key
    pub key: String,
    /// last modified time (ISO 8601)
    pub last_modified: String,
    /// object size in bytes
    pub size: u64,
    /// entity tag
    pub e_tag: String,
}

/// `ListObjectsV2` output
#[derive(Debug, Default)]
pub struct ListObjectsV2Output {
    /// bucket name
    pub name: String,
    /// effective prefix
    pub prefix: Option<String>,
    /// effective delimiter
    pub delimiter: Option<String>,
    /// effective max-keys
    pub max_keys: usize,
    /// number of emitted entries
    pub key_count: usize,
    /// whether the listing was cut short
    pub is_truncated: bool,
    /// cursor for the next page
    pub next_continuation_token: Option<String>,
    /// object entries
    pub contents: Vec<Object>,
    /// grouped key prefixes
    pub common_prefixes: Vec<String>,
}

/// `PutObject` request
#[derive(Debug)]
pub struct PutObjectRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
    /// object bytes
    pub body: Option<ByteStream>,
}

/// `PutObject` output
#[derive(Debug, Default)]
pub struct PutObjectOutput {
    /// entity tag
    pub e_tag: Option<String>,
}

/// `GetObject` request
#[derive(Debug)]
pub struct GetObjectRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
    /// requested byte range
    pub range: Option<Range>,
}

/// `GetObject` output
#[derive(Debug, Default)]
pub struct GetObjectOutput {
    /// object bytes
    pub body: Option<ByteStream>,
    /// number of body bytes
    pub content_length: u64,
    /// `Content-Range` of a partial response
    pub content_range: Option<String>,
    /// last modified time (HTTP date)
    pub last_modified: Option<String>,
    /// entity tag
    pub e_tag: Option<String>,
}

/// `HeadObject` request
#[derive(Debug)]
pub struct HeadObjectRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
}

/// `HeadObject` output
#[derive(Debug, Default)]
pub struct HeadObjectOutput {
    /// object size in bytes
    pub content_length: u64,
    /// last modified time (HTTP date)
    pub last_modified: Option<String>,
    /// entity tag
    pub e_tag: Option<String>,
}

/// `DeleteObject` request
#[derive(Debug)]
pub struct DeleteObjectRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
}

/// `DeleteObject` output
#[derive(Debug, Clone, Copy)]
pub struct DeleteObjectOutput;

/// An object reference of a `DeleteObjects` request
#[derive(Debug)]
pub struct ObjectIdentifier {
    /// object key
    pub key: String,
}

/// `DeleteObjects` request
#[derive(Debug)]
pub struct DeleteObjectsRequest {
    /// bucket name
    pub bucket: String,
    /// object references
    pub objects: Vec<ObjectIdentifier>,
}

/// A deleted entry of `DeleteObjects`
#[derive(Debug)]
pub struct DeletedObject {
    /// object key
    pub key: String,
}

/// `DeleteObjects` output
#[derive(Debug, Default)]
pub struct DeleteObjectsOutput {
    /// deleted entries
    pub deleted: Vec<DeletedObject>,
}

/// `CreateMultipartUpload` request
#[derive(Debug)]
pub struct CreateMultipartUploadRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
}

/// `CreateMultipartUpload` output
#[derive(Debug, Default)]
pub struct CreateMultipartUploadOutput {
    /// target bucket
    pub bucket: String,
    /// target key
    pub key: String,
    /// generated upload id
    pub upload_id: String,
}

/// `UploadPart` request
#[derive(Debug)]
pub struct UploadPartRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
    /// upload id
    pub upload_id: String,
    /// 1-based part number
    pub part_number: u32,
    /// part bytes
    pub body: Option<ByteStream>,
}

/// `UploadPart` output
#[derive(Debug, Default)]
pub struct UploadPartOutput {
    /// entity tag of the part
    pub e_tag: Option<String>,
}

/// `CompleteMultipartUpload` request
#[derive(Debug)]
pub struct CompleteMultipartUploadRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
    /// upload id
    pub upload_id: String,
}

/// `CompleteMultipartUpload` output
#[derive(Debug, Default)]
pub struct CompleteMultipartUploadOutput {
    /// target bucket
    pub bucket: String,
    /// target key
    pub key: String,
    /// entity tag of the assembled object
    pub e_tag: Option<String>,
    /// object location
    pub location: Option<String>,
}

/// `AbortMultipartUpload` request
#[derive(Debug)]
pub struct AbortMultipartUploadRequest {
    /// bucket name
    pub bucket: String,
    /// object key
    pub key: String,
    /// upload id
    pub upload_id: String,
}

/// `AbortMultipartUpload` output
#[derive(Debug, Clone, Copy)]
pub struct AbortMultipartUploadOutput;

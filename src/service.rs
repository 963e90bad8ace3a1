//! Generic S3 service which wraps a S3 storage

use crate::auth::S3Auth;
use crate::chunked_stream::ChunkedStream;
use crate::data_structures::{OrderedHeaders, OrderedQs};
use crate::errors::{S3Error, S3Result};
use crate::headers::{
    AmzContentSha256, AmzDate, AuthorizationV4, AUTHORIZATION, CONTENT_LENGTH, SERVER,
    X_AMZ_CONTENT_SHA256, X_AMZ_DATE,
};
use crate::limits;
use crate::ops;
use crate::output::S3Output;
use crate::path::{S3Path, S3PathErrorKind};
use crate::query::{DeleteQuery, GetQuery, PostQuery, PutQuery};
use crate::signature_v4;
use crate::storage::S3Storage;
use crate::{Body, BoxStdError, Request, Response};

use std::fmt::{self, Debug};
use std::io;
use std::mem;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::StreamExt;
use hyper::header::HeaderValue;
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;
use tracing::{debug, error};

/// the `Server` response header value
const SERVER_TOKEN: &str = concat!("s3-lite/", env!("CARGO_PKG_VERSION"));

/// Generic S3 service which wraps a S3 storage
pub struct S3Service<T> {
    /// inner storage
    storage: T,
    /// authentication provider
    auth: Option<Box<dyn S3Auth + Send + Sync + 'static>>,
}

/// Shared S3 service
#[derive(Debug)]
pub struct SharedS3Service<T> {
    /// inner service
    inner: Arc<S3Service<T>>,
}

impl<T: Debug> Debug for S3Service<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Service")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl<T> S3Service<T> {
    /// Constructs a S3 service
    pub fn new(storage: T) -> Self {
        Self {
            storage,
            auth: None,
        }
    }

    /// Sets the authentication provider
    ///
    /// Without a provider every request is served anonymously.
    pub fn set_auth(&mut self, auth: impl S3Auth + Send + Sync + 'static) {
        self.auth = Some(Box::new(auth));
    }

    /// convert `S3Service<T>` to `SharedS3Service<T>`
    #[must_use]
    pub fn into_shared(self) -> SharedS3Service<T> {
        SharedS3Service {
            inner: Arc::new(self),
        }
    }
}

impl<T> Clone for SharedS3Service<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> hyper::service::Service<Request> for SharedS3Service<T>
where
    T: S3Storage + Send + Sync + 'static,
{
    type Response = Response;

    type Error = BoxStdError;

    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.inner.hyper_call(req).await) })
    }
}

/// `MethodNotAllowed`
fn method_not_allowed() -> S3Error {
    code_error!(
        MethodNotAllowed,
        "The specified method is not allowed against this resource."
    )
}

/// helper function for extracting a typed url query
fn extract_query<Q: DeserializeOwned + Default>(req: &Request) -> S3Result<Q> {
    match req.uri().query() {
        Some(q) => serde_urlencoded::from_str(q)
            .map_err(|e| invalid_argument!("Invalid query string.", e)),
        None => Ok(Q::default()),
    }
}

/// take the request body out of a request
fn take_body(req: &mut Request) -> Body {
    mem::replace(req.body_mut(), Body::empty())
}

macro_rules! op_call {
    ($op:ident with ($($arg:expr),*) by $storage:expr) => {{
        let input = ops::$op::extract($($arg),*)?;
        $storage.$op(input).await?.try_into_response()
    }};

    ($op:ident with async ($($arg:expr),*) by $storage:expr) => {{
        let input = ops::$op::extract($($arg),*).await?;
        $storage.$op(input).await?.try_into_response()
    }};
}

impl<T> S3Service<T>
where
    T: S3Storage + Send + Sync + 'static,
{
    /// Call the s3 service with `hyper::Request<hyper::Body>`
    ///
    /// Errors are rendered as XML error envelopes; this method is infallible
    /// from hyper's point of view.
    pub async fn hyper_call(&self, req: Request) -> Response {
        let method = req.method().clone();
        let uri = req.uri().clone();
        debug!(%method, %uri, "incoming request");

        let result = self.handle(req).await;
        let mut res = match result {
            Ok(res) => res,
            Err(err) => {
                error!(%method, %uri, %err, "request failed");
                err.into_xml_response().try_into_response().unwrap_or_else(|_| {
                    let mut res = Response::new(Body::empty());
                    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                    res
                })
            }
        };

        let _prev = res
            .headers_mut()
            .insert(SERVER, HeaderValue::from_static(SERVER_TOKEN));
        res
    }

    /// handle a request
    async fn handle(&self, mut req: Request) -> S3Result<Response> {
        self.check_body_bound(&req)?;

        let decoded_path = percent_encoding::percent_decode_str(req.uri().path())
            .decode_utf8()
            .map_err(|e| invalid_argument!("Invalid request path encoding.", e))?
            .into_owned();

        self.check_signature(&mut req, &decoded_path).await?;

        let path = S3Path::try_from_path(&decoded_path).map_err(|e| {
            let code = match e.kind() {
                S3PathErrorKind::InvalidBucketName => {
                    crate::errors::S3ErrorCode::InvalidBucketName
                }
                S3PathErrorKind::InvalidKey => crate::errors::S3ErrorCode::InvalidKey,
                S3PathErrorKind::InvalidPath => crate::errors::S3ErrorCode::InvalidArgument,
            };
            code_error!(code = code, "Invalid request path.", e)
        })?;

        match *req.method() {
            Method::GET => self.handle_get(&req, &path).await,
            Method::PUT => self.handle_put(&mut req, &path).await,
            Method::POST => self.handle_post(&mut req, &path).await,
            Method::DELETE => self.handle_delete(&req, &path).await,
            Method::HEAD => self.handle_head(&req, &path).await,
            _ => Err(method_not_allowed()),
        }
    }

    /// reject oversized bodies before reading them
    fn check_body_bound(&self, req: &Request) -> S3Result<()> {
        let content_length = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if let Some(len) = content_length {
            if len > limits::MAX_BODY_SIZE {
                return Err(invalid_argument!("The request body is too large."));
            }
        }
        Ok(())
    }

    /// verify the SigV4 signature of a request
    ///
    /// This is the only place that produces `AccessDenied`. On success an
    /// aws-chunked body is replaced by its decoded stream.
    async fn check_signature(&self, req: &mut Request, decoded_path: &str) -> S3Result<()> {
        let auth_provider = match self.auth {
            None => return Ok(()),
            Some(ref auth) => auth,
        };

        let headers = OrderedHeaders::from_req(req)
            .map_err(|e| invalid_argument!("Invalid header value.", e))?;

        let auth_header = headers.get(AUTHORIZATION.as_str()).ok_or_else(|| {
            code_error!(AccessDenied, "Anonymous requests are not allowed.")
        })?;

        let auth = AuthorizationV4::from_header_str(auth_header)
            .map_err(|e| code_error!(AccessDenied, "Invalid Authorization header.", e))?;

        if auth.credential.aws_service != "s3" {
            return Err(code_error!(AccessDenied, "Invalid credential scope."));
        }

        let secret_key = auth_provider
            .get_secret_access_key(auth.credential.access_key_id)
            .await
            .ok_or_else(|| code_error!(AccessDenied, "Unknown access key."))?;

        let content_sha256_str = headers.get(X_AMZ_CONTENT_SHA256.as_str()).ok_or_else(|| {
            invalid_argument!("Missing required header: x-amz-content-sha256.")
        })?;
        let content_sha256 = AmzContentSha256::from_header_str(content_sha256_str)
            .map_err(|e| invalid_argument!("Invalid header: x-amz-content-sha256.", e))?;

        let date_str = headers
            .get(X_AMZ_DATE.as_str())
            .ok_or_else(|| invalid_argument!("Missing required header: x-amz-date."))?;
        let amz_date = AmzDate::from_header_str(date_str)
            .map_err(|e| invalid_argument!("Invalid header: x-amz-date.", e))?;

        let qs = match req.uri().query() {
            Some(q) => OrderedQs::from_query(q)
                .map_err(|e| invalid_argument!("Invalid query string.", e))?,
            None => OrderedQs::default(),
        };

        let signed_headers = headers.map_signed_headers(&auth.signed_headers);

        let canonical_request = signature_v4::create_canonical_request(
            req.method(),
            decoded_path,
            qs.as_ref(),
            &signed_headers,
            content_sha256.as_str(),
        );
        let region = auth.credential.aws_region;
        let string_to_sign =
            signature_v4::create_string_to_sign(&canonical_request, &amz_date, region);
        let signature =
            signature_v4::calculate_signature(&string_to_sign, &secret_key, &amz_date, region);

        drop(signed_headers);
        drop(headers);

        if signature.as_bytes().ct_eq(auth.signature.as_bytes()).unwrap_u8() != 1 {
            return Err(signature_mismatch!());
        }

        if matches!(content_sha256, AmzContentSha256::MultipleChunks) {
            let body = take_body(req);
            let body_stream = body.map(|try_chunk| {
                try_chunk.map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::Other,
                        format!("Error obtaining chunk: {}", e),
                    )
                })
            });
            *req.body_mut() = Body::wrap_stream(ChunkedStream::new(body_stream));
        }

        Ok(())
    }

    /// handle GET request
    async fn handle_get(&self, req: &Request, path: &S3Path<'_>) -> S3Result<Response> {
        match *path {
            S3Path::Root => op_call!(list_buckets with () by self.storage),
            S3Path::Bucket { bucket } => {
                let query: GetQuery = extract_query(req)?;
                match query.list_type {
                    Some(2) => op_call!(list_objects_v2 with (query, bucket) by self.storage),
                    _ => Err(method_not_allowed()),
                }
            }
            S3Path::Object { bucket, key } => {
                let query: GetQuery = extract_query(req)?;
                if query.upload_id.is_some() {
                    return Err(method_not_allowed());
                }
                op_call!(get_object with (req, bucket, key) by self.storage)
            }
        }
    }

    /// handle PUT request
    async fn handle_put(&self, req: &mut Request, path: &S3Path<'_>) -> S3Result<Response> {
        match *path {
            S3Path::Root => Err(method_not_allowed()),
            S3Path::Bucket { bucket } => {
                op_call!(create_bucket with (bucket) by self.storage)
            }
            S3Path::Object { bucket, key } => {
                let query: PutQuery = extract_query(req)?;
                let body = take_body(req);
                match (query.upload_id, query.part_number) {
                    (Some(upload_id), Some(part_number)) => {
                        op_call!(upload_part with (bucket, key, part_number, upload_id, body) by self.storage)
                    }
                    (None, None) => {
                        op_call!(put_object with (bucket, key, body) by self.storage)
                    }
                    _ => Err(method_not_allowed()),
                }
            }
        }
    }

    /// handle POST request
    async fn handle_post(&self, req: &mut Request, path: &S3Path<'_>) -> S3Result<Response> {
        match *path {
            S3Path::Root => Err(method_not_allowed()),
            S3Path::Bucket { bucket } => {
                let query: PostQuery = extract_query(req)?;
                if query.delete.is_some() {
                    let body = take_body(req);
                    return op_call!(delete_objects with async (body, bucket) by self.storage);
                }
                Err(method_not_allowed())
            }
            S3Path::Object { bucket, key } => {
                let query: PostQuery = extract_query(req)?;
                if query.uploads.is_some() {
                    return op_call!(create_multipart_upload with (bucket, key) by self.storage);
                }
                if let Some(upload_id) = query.upload_id {
                    let body = take_body(req);
                    return op_call!(complete_multipart_upload with async (body, bucket, key, upload_id) by self.storage);
                }
                Err(method_not_allowed())
            }
        }
    }

    /// handle DELETE request
    async fn handle_delete(&self, req: &Request, path: &S3Path<'_>) -> S3Result<Response> {
        match *path {
            S3Path::Root => Err(method_not_allowed()),
            S3Path::Bucket { bucket } => {
                op_call!(delete_bucket with (bucket) by self.storage)
            }
            S3Path::Object { bucket, key } => {
                let query: DeleteQuery = extract_query(req)?;
                match query.upload_id {
                    Some(upload_id) => {
                        op_call!(abort_multipart_upload with (bucket, key, upload_id) by self.storage)
                    }
                    None => op_call!(delete_object with (bucket, key) by self.storage),
                }
            }
        }
    }

    /// handle HEAD request
    async fn handle_head(&self, _req: &Request, path: &S3Path<'_>) -> S3Result<Response> {
        match *path {
            S3Path::Root => Err(method_not_allowed()),
            S3Path::Bucket { bucket } => {
                op_call!(head_bucket with (bucket) by self.storage)
            }
            S3Path::Object { bucket, key } => {
                op_call!(head_object with (bucket, key) by self.storage)
            }
        }
    }
}

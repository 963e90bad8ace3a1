//! S3 errors

use crate::BoxStdError;

use std::error::Error;
use std::fmt::{self, Debug, Display};

use backtrace::Backtrace;
use hyper::StatusCode;
use tracing_error::SpanTrace;

/// Type representing an error response
pub(crate) struct XmlErrorResponse {
    /// code
    pub(crate) code: S3ErrorCode,
    /// message
    pub(crate) message: Option<String>,
}

/// `S3ErrorInner`
#[derive(Debug)]
struct S3ErrorInner {
    /// code
    code: S3ErrorCode,
    /// message
    message: Option<String>,
    /// error source
    source: Option<BoxStdError>,
    /// span trace
    span_trace: Option<SpanTrace>,
    /// stack trace
    backtrace: Option<Backtrace>,
}

// `S3Error` uses `Box` to avoid moving too much bytes.
// It's ok to allocate for error reports.

/// S3 error
pub struct S3Error(Box<S3ErrorInner>);

/// S3 result
pub type S3Result<T> = Result<T, S3Error>;

impl Debug for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <S3ErrorInner as Debug>::fmt(&self.0, f)
    }
}

impl Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3Error: code: {}", self.0.code)?;
        if let Some(ref msg) = self.0.message {
            write!(f, ", message: {}", msg)?;
        }
        if let Some(ref source) = self.0.source {
            write!(f, "\nsource: {}", source)?;
        }
        if let Some(ref backtrace) = self.0.backtrace {
            write!(f, "\nbacktrace:\n{:?}", backtrace)?;
        }
        Ok(())
    }
}

impl Error for S3Error {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0
            .source
            .as_deref()
            .map(|e| -> &(dyn Error + 'static) { &*e })
    }
}

impl S3Error {
    /// Constructs an `S3Error` with code and message
    pub fn new(code: S3ErrorCode, message: impl Into<String>) -> Self {
        Self::from_code(code).message(message).finish()
    }

    /// Start building an `S3Error`
    #[must_use]
    pub fn from_code(code: S3ErrorCode) -> S3ErrorBuilder {
        S3ErrorBuilder(Box::new(S3ErrorInner {
            code,
            message: None,
            source: None,
            span_trace: None,
            backtrace: None,
        }))
    }

    /// get the error code
    #[must_use]
    pub fn code(&self) -> S3ErrorCode {
        self.0.code
    }

    /// consume the error and return an xml response
    pub(crate) fn into_xml_response(self) -> XmlErrorResponse {
        XmlErrorResponse {
            code: self.0.code,
            message: self.0.message,
        }
    }
}

/// The builder of `S3Error`
#[derive(Debug)]
pub struct S3ErrorBuilder(Box<S3ErrorInner>);

impl S3ErrorBuilder {
    /// set message
    #[inline]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.0.message = Some(msg.into());
        self
    }

    /// set error source
    #[inline]
    pub fn source(mut self, e: impl Into<BoxStdError>) -> Self {
        self.0.source = Some(e.into());
        self
    }

    /// capture span trace
    #[inline]
    #[must_use]
    pub fn capture_span_trace(mut self) -> Self {
        self.0.span_trace = Some(SpanTrace::capture());
        self
    }

    /// capture backtrace
    #[inline]
    #[must_use]
    pub fn capture_backtrace(mut self) -> Self {
        self.0.backtrace = Some(Backtrace::new());
        self
    }

    /// finish the builder
    #[inline]
    #[must_use]
    pub fn finish(self) -> S3Error {
        S3Error(self.0)
    }
}

/// S3 error code enum
///
/// See [`ErrorResponses`](https://docs.aws.amazon.com/AmazonS3/latest/API/ErrorResponses.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum S3ErrorCode {
    /// Access Denied
    AccessDenied,

    /// The bucket you tried to delete is not empty.
    BucketNotEmpty,

    /// We encountered an internal error. Please try again.
    InternalError,

    /// Invalid Argument
    InvalidArgument,

    /// The specified bucket is not valid.
    InvalidBucketName,

    /// The specified key is not valid.
    InvalidKey,

    /// The specified method is not allowed against this resource.
    MethodNotAllowed,

    /// The specified bucket does not exist.
    NoSuchBucket,

    /// The specified key does not exist.
    NoSuchKey,

    /// The specified multipart upload does not exist. The upload ID might be
    /// invalid, or the multipart upload might have been aborted or completed.
    NoSuchUpload,
}

impl Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Debug>::fmt(self, f)
    }
}

impl S3ErrorCode {
    /// Returns the corresponding status code of the error code
    #[must_use]
    pub const fn as_status_code(self) -> StatusCode {
        match self {
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::BucketNotEmpty => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidArgument | Self::InvalidBucketName | Self::InvalidKey => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NoSuchBucket | Self::NoSuchKey | Self::NoSuchUpload => StatusCode::NOT_FOUND,
        }
    }

    /// Returns the corresponding string of the error code
    #[must_use]
    pub const fn as_static_str(self) -> &'static str {
        macro_rules! map_variant_to_str{
            [$($v:tt,)+]=>{
                match self {
                    $(
                        Self::$v => stringify!($v),
                    )+
                }
            }
        }

        map_variant_to_str![
            AccessDenied,
            BucketNotEmpty,
            InternalError,
            InvalidArgument,
            InvalidBucketName,
            InvalidKey,
            MethodNotAllowed,
            NoSuchBucket,
            NoSuchKey,
            NoSuchUpload,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_status_mapping() {
        let table = [
            (S3ErrorCode::AccessDenied, 403),
            (S3ErrorCode::InvalidBucketName, 400),
            (S3ErrorCode::InvalidKey, 400),
            (S3ErrorCode::InvalidArgument, 400),
            (S3ErrorCode::NoSuchKey, 404),
            (S3ErrorCode::NoSuchBucket, 404),
            (S3ErrorCode::NoSuchUpload, 404),
            (S3ErrorCode::BucketNotEmpty, 409),
            (S3ErrorCode::MethodNotAllowed, 405),
            (S3ErrorCode::InternalError, 500),
        ];
        for (code, status) in table {
            assert_eq!(code.as_status_code().as_u16(), status);
        }
    }
}

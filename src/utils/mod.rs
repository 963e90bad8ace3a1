//! utils

/// extracts the ok value of a result in a function returning `S3Result<T>`
///
/// returns a wrapped internal error to terminate the control flow
///
macro_rules! trace_try {
    ($ret:expr) => {
        match $ret {
            Ok(r) => r,
            Err(e) => return Err(internal_error!(e)),
        }
    };
}

/// asserts a predicate is true in a function returning `bool`
///
/// returns `false` to terminate the control flow
///
macro_rules! bool_try {
    ($pred:expr) => {
        if !$pred {
            return false;
        }
    };
}

/// Create a `S3Error` with code and message
macro_rules! code_error {
    ($code:ident, $msg:expr $(, $source:expr)?) => {
        code_error!(code = $crate::errors::S3ErrorCode::$code, $msg $(, $source)?)
    };
    (code = $code:expr, $msg:expr $(, $source:expr)?) => {{
        let code = $code;
        let err = $crate::errors::S3Error::from_code(code).message($msg);

        $(let err = err.source($source);)?

        let err = err.finish();

        tracing::debug!("generated s3 error: {}", err);

        err
    }};
}

/// Create an `InvalidArgument` error
macro_rules! invalid_argument {
    ($msg:expr $(, $source:expr)?) => {{
        code_error!(InvalidArgument, $msg $(, $source)?)
    }};
}

/// Create an `AccessDenied` error for a failed signature check
macro_rules! signature_mismatch {
    () => {{
        code_error!(
            AccessDenied,
            "The request signature we calculated does not match the signature you provided."
        )
    }};
}

/// Create an internal error
macro_rules! internal_error {
    ($e:expr) => {{
        let code = $crate::errors::S3ErrorCode::InternalError;
        let err = $crate::errors::S3Error::from_code(code)
            .message("We encountered an internal error. Please try again.")
            .source($e)
            .capture_backtrace()
            .capture_span_trace()
            .finish();

        tracing::error!("generated internal error: {}", err);

        err
    }};
}

mod also;
mod apply;
mod response;
mod xml;

pub use self::also::Also;
pub use self::apply::Apply;
pub use self::response::ResponseExt;
pub use self::xml::XmlWriterExt;

pub mod crypto;
pub mod time;

use crate::{Body, BoxStdError};

use serde::de::DeserializeOwned;

/// deserialize xml body
pub async fn deserialize_xml_body<T: DeserializeOwned>(body: Body) -> Result<T, BoxStdError> {
    let bytes = hyper::body::to_bytes(body).await?;
    let ans: T = quick_xml::de::from_reader(&*bytes)?;
    Ok(ans)
}

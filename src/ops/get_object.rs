//! [`GetObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html)

use crate::dto::{GetObjectOutput, GetObjectRequest};
use crate::errors::S3Result;
use crate::headers::{
    Range, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED,
    RANGE,
};
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::{Body, Request, Response};

use hyper::StatusCode;

/// extract operation request
///
/// A syntactically malformed `Range` header is ignored; bounds are checked
/// against the object size by the storage layer.
pub fn extract(req: &Request, bucket: &str, key: &str) -> S3Result<GetObjectRequest> {
    let range = req
        .headers()
        .get(RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Range::from_header_str(v).ok());

    Ok(GetObjectRequest {
        bucket: bucket.into(),
        key: key.into(),
        range,
    })
}

impl S3Output for GetObjectOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_optional_header(CONTENT_LENGTH, Some(self.content_length.to_string()))?;
            res.set_optional_header(CONTENT_TYPE, Some("application/octet-stream".to_owned()))?;
            res.set_optional_header(ACCEPT_RANGES, Some("bytes".to_owned()))?;
            res.set_optional_header(LAST_MODIFIED, self.last_modified)?;
            res.set_optional_header(ETAG, self.e_tag)?;

            if let Some(content_range) = self.content_range {
                res.set_optional_header(CONTENT_RANGE, Some(content_range))?;
                res.set_status(StatusCode::PARTIAL_CONTENT);
            }

            if let Some(body) = self.body {
                *res.body_mut() = Body::wrap_stream(body);
            }

            Ok(())
        })
    }
}

//! [`PutObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html)

use super::transform_body_stream;

use crate::dto::{PutObjectOutput, PutObjectRequest};
use crate::errors::S3Result;
use crate::headers::ETAG;
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::{Body, Response};

/// extract operation request
pub fn extract(bucket: &str, key: &str, body: Body) -> S3Result<PutObjectRequest> {
    Ok(PutObjectRequest {
        bucket: bucket.into(),
        key: key.into(),
        body: Some(transform_body_stream(body)),
    })
}

impl S3Output for PutObjectOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_optional_header(ETAG, self.e_tag)?;
            Ok(())
        })
    }
}

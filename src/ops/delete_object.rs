//! [`DeleteObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObject.html)

use crate::dto::{DeleteObjectOutput, DeleteObjectRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::Response;

use hyper::StatusCode;

/// extract operation request
pub fn extract(bucket: &str, key: &str) -> S3Result<DeleteObjectRequest> {
    Ok(DeleteObjectRequest {
        bucket: bucket.into(),
        key: key.into(),
    })
}

impl S3Output for DeleteObjectOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_status(StatusCode::NO_CONTENT);
            Ok(())
        })
    }
}

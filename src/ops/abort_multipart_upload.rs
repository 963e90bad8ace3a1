//! [`AbortMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_AbortMultipartUpload.html)

use crate::dto::{AbortMultipartUploadOutput, AbortMultipartUploadRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::Response;

use hyper::StatusCode;

/// extract operation request
pub fn extract(
    bucket: &str,
    key: &str,
    upload_id: String,
) -> S3Result<AbortMultipartUploadRequest> {
    Ok(AbortMultipartUploadRequest {
        bucket: bucket.into(),
        key: key.into(),
        upload_id,
    })
}

impl S3Output for AbortMultipartUploadOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_status(StatusCode::NO_CONTENT);
            Ok(())
        })
    }
}

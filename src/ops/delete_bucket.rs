//! [`DeleteBucket`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteBucket.html)

use crate::dto::{DeleteBucketOutput, DeleteBucketRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::Response;

use hyper::StatusCode;

/// extract operation request
pub fn extract(bucket: &str) -> S3Result<DeleteBucketRequest> {
    Ok(DeleteBucketRequest {
        bucket: bucket.into(),
    })
}

impl S3Output for DeleteBucketOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_status(StatusCode::NO_CONTENT);
            Ok(())
        })
    }
}

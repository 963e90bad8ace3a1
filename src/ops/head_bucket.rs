//! [`HeadBucket`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadBucket.html)

use crate::dto::{HeadBucketOutput, HeadBucketRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::Response;

/// extract operation request
pub fn extract(bucket: &str) -> S3Result<HeadBucketRequest> {
    Ok(HeadBucketRequest {
        bucket: bucket.into(),
    })
}

impl S3Output for HeadBucketOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|_res| Ok(()))
    }
}

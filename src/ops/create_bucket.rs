//! [`CreateBucket`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateBucket.html)

use crate::dto::{CreateBucketOutput, CreateBucketRequest};
use crate::errors::S3Result;
use crate::headers::LOCATION;
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::Response;

/// extract operation request
pub fn extract(bucket: &str) -> S3Result<CreateBucketRequest> {
    Ok(CreateBucketRequest {
        bucket: bucket.into(),
    })
}

impl S3Output for CreateBucketOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_optional_header(LOCATION, self.location)?;
            Ok(())
        })
    }
}

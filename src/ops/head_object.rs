//! [`HeadObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html)

use crate::dto::{HeadObjectOutput, HeadObjectRequest};
use crate::errors::S3Result;
use crate::headers::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::Response;

/// extract operation request
pub fn extract(bucket: &str, key: &str) -> S3Result<HeadObjectRequest> {
    Ok(HeadObjectRequest {
        bucket: bucket.into(),
        key: key.into(),
    })
}

impl S3Output for HeadObjectOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_optional_header(CONTENT_LENGTH, Some(self.content_length.to_string()))?;
            res.set_optional_header(CONTENT_TYPE, Some("application/octet-stream".to_owned()))?;
            res.set_optional_header(ACCEPT_RANGES, Some("bytes".to_owned()))?;
            res.set_optional_header(LAST_MODIFIED, self.last_modified)?;
            res.set_optional_header(ETAG, self.e_tag)?;
            Ok(())
        })
    }
}

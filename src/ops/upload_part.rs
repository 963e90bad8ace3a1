//! [`UploadPart`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html)

use super::transform_body_stream;

use crate::dto::{UploadPartOutput, UploadPartRequest};
use crate::errors::S3Result;
use crate::headers::ETAG;
use crate::limits;
use crate::output::{wrap_output, S3Output};
use crate::utils::ResponseExt;
use crate::{Body, Response};

/// extract operation request
pub fn extract(
    bucket: &str,
    key: &str,
    part_number: u32,
    upload_id: String,
    body: Body,
) -> S3Result<UploadPartRequest> {
    if !(1..=limits::MAX_PART_NUMBER).contains(&part_number) {
        return Err(invalid_argument!(
            "Part number must be an integer between 1 and 10000, inclusive."
        ));
    }

    Ok(UploadPartRequest {
        bucket: bucket.into(),
        key: key.into(),
        upload_id,
        part_number,
        body: Some(transform_body_stream(body)),
    })
}

impl S3Output for UploadPartOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_optional_header(ETAG, self.e_tag)?;
            Ok(())
        })
    }
}

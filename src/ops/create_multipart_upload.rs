//! [`CreateMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html)

use crate::dto::{CreateMultipartUploadOutput, CreateMultipartUploadRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::{ResponseExt, XmlWriterExt};
use crate::Response;

/// extract operation request
pub fn extract(bucket: &str, key: &str) -> S3Result<CreateMultipartUploadRequest> {
    Ok(CreateMultipartUploadRequest {
        bucket: bucket.into(),
        key: key.into(),
    })
}

impl S3Output for CreateMultipartUploadOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_xml_body(256, |w| {
                w.stack("InitiateMultipartUploadResult", |w| {
                    w.element("Bucket", &self.bucket)?;
                    w.element("Key", &self.key)?;
                    w.element("UploadId", &self.upload_id)?;
                    Ok(())
                })
            })?;
            Ok(())
        })
    }
}

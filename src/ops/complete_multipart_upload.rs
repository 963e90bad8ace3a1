//! [`CompleteMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html)

use crate::dto::{CompleteMultipartUploadOutput, CompleteMultipartUploadRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::{ResponseExt, XmlWriterExt};
use crate::{Body, Response};

#[allow(dead_code)] // the part list is validated, not consulted
mod xml {
    //! xml repr

    use serde::Deserialize;

    /// `CompleteMultipartUpload`
    ///
    /// The part list is checked for well-formedness only; parts are
    /// assembled in ascending part-number order of the staged files.
    #[derive(Debug, Deserialize)]
    pub struct CompleteMultipartUpload {
        /// Part
        #[serde(rename = "Part")]
        pub parts: Option<Vec<CompletedPart>>,
    }

    /// `CompletedPart`
    #[derive(Debug, Deserialize)]
    pub struct CompletedPart {
        /// ETag
        #[serde(rename = "ETag")]
        pub e_tag: Option<String>,
        /// PartNumber
        #[serde(rename = "PartNumber")]
        pub part_number: Option<u32>,
    }
}

/// extract operation request
pub async fn extract(
    body: Body,
    bucket: &str,
    key: &str,
    upload_id: String,
) -> S3Result<CompleteMultipartUploadRequest> {
    let bytes = hyper::body::to_bytes(body)
        .await
        .map_err(|e| invalid_argument!("Invalid request body.", e))?;

    if !bytes.is_empty() {
        let _parts: self::xml::CompleteMultipartUpload = quick_xml::de::from_reader(&*bytes)
            .map_err(|e| invalid_argument!("Invalid CompleteMultipartUpload body.", e))?;
    }

    Ok(CompleteMultipartUploadRequest {
        bucket: bucket.into(),
        key: key.into(),
        upload_id,
    })
}

impl S3Output for CompleteMultipartUploadOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_xml_body(256, |w| {
                w.stack("CompleteMultipartUploadResult", |w| {
                    w.opt_element("Location", self.location.as_deref())?;
                    w.element("Bucket", &self.bucket)?;
                    w.element("Key", &self.key)?;
                    w.opt_element("ETag", self.e_tag.as_deref())?;
                    Ok(())
                })
            })?;
            Ok(())
        })
    }
}

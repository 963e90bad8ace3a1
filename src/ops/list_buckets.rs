//! [`ListBuckets`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListBuckets.html)

use crate::dto::{ListBucketsOutput, ListBucketsRequest};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::{ResponseExt, XmlWriterExt};
use crate::Response;

/// extract operation request
pub fn extract() -> S3Result<ListBucketsRequest> {
    Ok(ListBucketsRequest)
}

impl S3Output for ListBucketsOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_xml_body(4096, |w| {
                w.stack("ListAllMyBucketsResult", |w| {
                    w.stack("Buckets", |w| {
                        w.iter_element(self.buckets.into_iter(), |w, bucket| {
                            w.stack("Bucket", |w| {
                                w.element("Name", &bucket.name)?;
                                w.opt_element(
                                    "CreationDate",
                                    bucket.creation_date.as_deref(),
                                )?;
                                Ok(())
                            })
                        })
                    })
                })
            })?;
            Ok(())
        })
    }
}

//! [`ListObjectsV2`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListObjectsV2.html)

use crate::dto::{ListObjectsV2Output, ListObjectsV2Request};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::query::GetQuery;
use crate::utils::{ResponseExt, XmlWriterExt};
use crate::Response;

/// extract operation request
pub fn extract(query: GetQuery, bucket: &str) -> S3Result<ListObjectsV2Request> {
    Ok(ListObjectsV2Request {
        bucket: bucket.into(),
        prefix: query.prefix,
        delimiter: query.delimiter,
        max_keys: query.max_keys,
        continuation_token: query.continuation_token,
    })
}

impl S3Output for ListObjectsV2Output {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_xml_body(4096, |w| {
                w.stack("ListBucketResult", |w| {
                    w.element("Name", &self.name)?;
                    w.opt_element("Prefix", self.prefix.as_deref().filter(|p| !p.is_empty()))?;
                    w.opt_element("Delimiter", self.delimiter.as_deref())?;
                    w.element("MaxKeys", &self.max_keys.to_string())?;
                    w.element("KeyCount", &self.key_count.to_string())?;
                    w.element("IsTruncated", if self.is_truncated { "true" } else { "false" })?;
                    w.opt_element(
                        "NextContinuationToken",
                        self.next_continuation_token.as_deref(),
                    )?;
                    w.iter_element(self.contents.iter(), |w, object| {
                        w.stack("Contents", |w| {
                            w.element("Key", &object.key)?;
                            w.element("LastModified", &object.last_modified)?;
                            w.element("Size", &object.size.to_string())?;
                            w.element("ETag", &object.e_tag)?;
                            Ok(())
                        })
                    })?;
                    w.iter_element(self.common_prefixes.iter(), |w, prefix| {
                        w.stack("CommonPrefixes", |w| w.element("Prefix", prefix))
                    })?;
                    Ok(())
                })
            })?;
            Ok(())
        })
    }
}

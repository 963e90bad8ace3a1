//! [`DeleteObjects`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObjects.html)

use crate::dto::{DeleteObjectsOutput, DeleteObjectsRequest, ObjectIdentifier};
use crate::errors::S3Result;
use crate::output::{wrap_output, S3Output};
use crate::utils::{deserialize_xml_body, ResponseExt, XmlWriterExt};
use crate::{Body, Response};

mod xml {
    //! xml repr

    use serde::Deserialize;

    /// `Delete`
    #[derive(Debug, Deserialize)]
    pub struct Delete {
        /// Object
        #[serde(rename = "Object")]
        pub objects: Vec<Object>,
    }

    /// `Object`
    #[derive(Debug, Deserialize)]
    pub struct Object {
        /// Key
        #[serde(rename = "Key")]
        pub key: String,
    }
}

/// extract operation request
pub async fn extract(body: Body, bucket: &str) -> S3Result<DeleteObjectsRequest> {
    let delete: self::xml::Delete = deserialize_xml_body(body)
        .await
        .map_err(|e| invalid_argument!("Invalid Delete request body.", e))?;

    Ok(DeleteObjectsRequest {
        bucket: bucket.into(),
        objects: delete
            .objects
            .into_iter()
            .map(|o| ObjectIdentifier { key: o.key })
            .collect(),
    })
}

impl S3Output for DeleteObjectsOutput {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_xml_body(256, |w| {
                w.stack("DeleteResult", |w| {
                    w.iter_element(self.deleted.iter(), |w, deleted| {
                        w.stack("Deleted", |w| w.element("Key", &deleted.key))
                    })
                })
            })?;
            Ok(())
        })
    }
}

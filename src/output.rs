//! Types which can be converted into a response

use crate::errors::{S3Result, XmlErrorResponse};
use crate::utils::{ResponseExt, XmlWriterExt};
use crate::{Body, BoxStdError, Response};

/// Types which can be converted into a response
pub trait S3Output {
    /// Try to convert into a response
    /// # Errors
    /// Returns an `Err` if the output can not be converted to a response
    fn try_into_response(self) -> S3Result<Response>;
}

/// helper function for constructing a response
pub(crate) fn wrap_output(
    f: impl FnOnce(&mut Response) -> Result<(), BoxStdError>,
) -> S3Result<Response> {
    let mut res = Response::new(Body::empty());
    match f(&mut res) {
        Ok(()) => Ok(res),
        Err(e) => Err(internal_error!(e)),
    }
}

impl S3Output for XmlErrorResponse {
    fn try_into_response(self) -> S3Result<Response> {
        wrap_output(|res| {
            res.set_status(self.code.as_status_code());
            res.set_xml_body(64, |w| {
                w.stack("Error", |w| {
                    w.element("Code", self.code.as_static_str())?;
                    w.opt_element("Message", self.message.as_deref())?;
                    Ok(())
                })
            })?;
            Ok(())
        })
    }
}

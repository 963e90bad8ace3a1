//! response util

use crate::Response;

use hyper::header::{self, HeaderName, HeaderValue, InvalidHeaderValue};
use hyper::{Body, StatusCode};
use xml::common::XmlVersion;
use xml::writer::{EventWriter, XmlEvent};

/// `ResponseExt`
pub trait ResponseExt {
    /// set status code
    fn set_status(&mut self, status: StatusCode);

    /// set an optional header
    fn set_optional_header(
        &mut self,
        name: HeaderName,
        value: Option<String>,
    ) -> Result<(), InvalidHeaderValue>;

    /// set an xml body and the matching `Content-Type`
    fn set_xml_body<F>(&mut self, cap: usize, f: F) -> xml::writer::Result<()>
    where
        F: FnOnce(&mut EventWriter<&mut Vec<u8>>) -> xml::writer::Result<()>;
}

impl ResponseExt for Response {
    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn set_optional_header(
        &mut self,
        name: HeaderName,
        value: Option<String>,
    ) -> Result<(), InvalidHeaderValue> {
        if let Some(value) = value {
            let val = HeaderValue::try_from(value)?;
            let _prev = self.headers_mut().insert(name, val);
        }
        Ok(())
    }

    fn set_xml_body<F>(&mut self, cap: usize, f: F) -> xml::writer::Result<()>
    where
        F: FnOnce(&mut EventWriter<&mut Vec<u8>>) -> xml::writer::Result<()>,
    {
        let mut body = Vec::with_capacity(cap);
        {
            let mut w = EventWriter::new(&mut body);
            w.write(XmlEvent::StartDocument {
                version: XmlVersion::Version10,
                encoding: Some("UTF-8"),
                standalone: None,
            })?;
            f(&mut w)?;
        }

        *self.body_mut() = Body::from(body);
        let _prev = self
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        Ok(())
    }
}

//! Ordered headers

use crate::Request;

use hyper::header::ToStrError;
use smallvec::SmallVec;

/// Immutable http header container, sorted by header name
///
/// Header names are lowercase (hyper guarantees this for parsed requests).
#[derive(Debug)]
pub struct OrderedHeaders<'a> {
    /// Ascending `(name, value)` pairs
    headers: SmallVec<[(&'a str, &'a str); 16]>,
}

impl<'a> OrderedHeaders<'a> {
    /// Constructs `OrderedHeaders` from a slice of lowercase pairs
    #[cfg(test)]
    pub fn from_slice_unchecked(slice: &[(&'a str, &'a str)]) -> Self {
        let mut headers = SmallVec::new();
        headers.extend_from_slice(slice);
        headers.sort_unstable();
        Self { headers }
    }

    /// Constructs `OrderedHeaders<'a>` from `&'a Request`
    ///
    /// # Errors
    /// Returns an `Err` if a header value is not a valid string
    pub fn from_req(req: &'a Request) -> Result<Self, ToStrError> {
        let mut headers: SmallVec<[(&'a str, &'a str); 16]> =
            SmallVec::with_capacity(req.headers().len());

        for (name, value) in req.headers() {
            headers.push((name.as_str(), value.to_str()?));
        }
        headers.sort_unstable();

        Ok(Self { headers })
    }

    /// Projects the headers named by `signed_headers`
    ///
    /// + `signed_headers` must be sorted
    pub fn map_signed_headers(&self, signed_headers: &[impl AsRef<str>]) -> Self {
        let mut headers: SmallVec<[(&'a str, &'a str); 16]> = SmallVec::new();
        for &(name, value) in &self.headers {
            if signed_headers
                .binary_search_by(|probe| probe.as_ref().cmp(name))
                .is_ok()
            {
                headers.push((name, value));
            }
        }
        Self { headers }
    }

    /// Gets a header value by lowercase name. Time `O(logn)`
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let headers = self.headers.as_slice();
        match headers.binary_search_by_key(&name, |&(n, _)| n) {
            Ok(idx) => headers.get(idx).map(|&(_, v)| v),
            Err(_) => None,
        }
    }
}

impl<'a> AsRef<[(&'a str, &'a str)]> for OrderedHeaders<'a> {
    fn as_ref(&self) -> &[(&'a str, &'a str)] {
        self.headers.as_ref()
    }
}

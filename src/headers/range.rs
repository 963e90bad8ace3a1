//! HTTP Range header
//!
//! Only the `bytes=A-B` and `bytes=A-` forms are served; everything else is
//! treated as if no range was requested.

/// HTTP byte range
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone)]
pub struct Range {
    /// first byte position
    first: u64,
    /// last byte position (inclusive), to the end of the object when absent
    last: Option<u64>,
}

/// `ParseRangeError`
#[allow(missing_copy_implementations)]
#[derive(Debug, thiserror::Error)]
#[error("ParseRangeError")]
pub struct ParseRangeError {
    /// private place holder
    _priv: (),
}

impl Range {
    /// Parses `Range` from header
    /// # Errors
    /// Returns an error if the header is invalid
    pub fn from_header_str(header: &str) -> Result<Self, ParseRangeError> {
        /// nom parser
        fn parse(input: &str) -> nom::IResult<&str, Range> {
            use nom::{
                bytes::complete::tag,
                character::complete::digit1,
                combinator::{all_consuming, map_res, opt},
                sequence::tuple,
            };

            let mut parser = all_consuming(tuple((
                tag("bytes="),
                map_res(digit1, str::parse::<u64>),
                tag("-"),
                opt(map_res(digit1, str::parse::<u64>)),
            )));

            let (input, (_, first, _, last)) = parser(input)?;

            Ok((input, Range { first, last }))
        }

        match parse(header) {
            Err(_) => Err(ParseRangeError { _priv: () }),
            Ok((_, ans)) => Ok(ans),
        }
    }

    /// Resolves the range against an object of `size` bytes
    ///
    /// Returns the inclusive `(start, end)` pair, or `None` when the range
    /// cannot be satisfied.
    #[must_use]
    pub fn resolve(&self, size: u64) -> Option<(u64, u64)> {
        let end = self.last.unwrap_or(size.checked_sub(1)?);
        if self.first > end || end >= size {
            return None;
        }
        Some((self.first, end))
    }
}

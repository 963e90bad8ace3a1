//! x-amz-date

/// x-amz-date
#[derive(Debug, Clone)]
pub struct AmzDate {
    /// year
    year: u32,
    /// month
    month: u32,
    /// day
    day: u32,
    /// hour
    hour: u32,
    /// minute
    minute: u32,
    /// second
    second: u32,
}

/// `ParseAmzDateError`
#[allow(missing_copy_implementations)]
#[derive(Debug, thiserror::Error)]
#[error("ParseAmzDateError")]
pub struct ParseAmzDateError {
    /// private place holder
    _priv: (),
}

impl AmzDate {
    /// Parses `AmzDate` from a `YYYYMMDD'T'HHMMSS'Z'` header value
    /// # Errors
    /// Returns an error if the header is invalid
    pub fn from_header_str(header: &str) -> Result<Self, ParseAmzDateError> {
        /// nom parser
        fn parse(input: &str) -> nom::IResult<&str, [&str; 6]> {
            use nom::{
                bytes::complete::{tag, take},
                combinator::{all_consuming, verify},
                sequence::tuple,
            };

            let mut parser = verify(
                all_consuming(tuple((
                    take(4_usize),
                    take(2_usize),
                    take(2_usize),
                    tag("T"),
                    take(2_usize),
                    take(2_usize),
                    take(2_usize),
                    tag("Z"),
                ))),
                |&(year, month, day, _, hour, minute, second, _): &(
                    &str,
                    &str,
                    &str,
                    &str,
                    &str,
                    &str,
                    &str,
                    &str,
                )| {
                    [year, month, day, hour, minute, second]
                        .iter()
                        .all(|s| s.bytes().all(|b| b.is_ascii_digit()))
                },
            );

            let (remain, (year, month, day, _, hour, minute, second, _)) = parser(input)?;

            Ok((remain, [year, month, day, hour, minute, second]))
        }

        /// parse u32
        fn to_u32(input: &str) -> Result<u32, ParseAmzDateError> {
            input.parse::<u32>().map_err(|_| ParseAmzDateError { _priv: () })
        }

        match parse(header) {
            Err(_) => Err(ParseAmzDateError { _priv: () }),
            Ok((_, [year, month, day, hour, minute, second])) => Ok(Self {
                year: to_u32(year)?,
                month: to_u32(month)?,
                day: to_u32(day)?,
                hour: to_u32(hour)?,
                minute: to_u32(minute)?,
                second: to_u32(second)?,
            }),
        }
    }

    /// `YYYYMMDD'T'HHMMSS'Z'`
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        format!(
            "{:04}{:02}{:02}T{:02}{:02}{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// `YYYYMMDD`
    #[must_use]
    pub fn to_date(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

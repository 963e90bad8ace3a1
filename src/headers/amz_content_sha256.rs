//! x-amz-content-sha256

use crate::utils::crypto;

/// `x-amz-content-sha256`
///
/// See [Common Request Headers](https://docs.aws.amazon.com/AmazonS3/latest/API/RESTCommonRequestHeaders.html)
#[derive(Debug)]
pub enum AmzContentSha256<'a> {
    /// `STREAMING-AWS4-HMAC-SHA256-PAYLOAD`
    MultipleChunks,
    /// single chunk
    SingleChunk {
        /// the checksum of the payload
        payload_checksum: &'a str,
    },
    /// `UNSIGNED-PAYLOAD`
    UnsignedPayload,
}

/// `ParseAmzContentSha256Error`
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("ParseAmzContentSha256Error")]
pub struct ParseAmzContentSha256Error {
    /// priv place holder
    _priv: (),
}

impl<'a> AmzContentSha256<'a> {
    /// parse `AmzContentSha256` from the `x-amz-content-sha256` header
    /// # Errors
    /// Returns an `Err` if the header is invalid
    pub fn from_header_str(header: &'a str) -> Result<Self, ParseAmzContentSha256Error> {
        Ok(match header {
            "UNSIGNED-PAYLOAD" => Self::UnsignedPayload,
            "STREAMING-AWS4-HMAC-SHA256-PAYLOAD" => Self::MultipleChunks,
            payload_checksum => {
                if !crypto::is_sha256_checksum(payload_checksum) {
                    return Err(ParseAmzContentSha256Error { _priv: () });
                }
                Self::SingleChunk { payload_checksum }
            }
        })
    }

    /// the literal header value, used as the payload-hash line of a canonical request
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        match *self {
            Self::MultipleChunks => "STREAMING-AWS4-HMAC-SHA256-PAYLOAD",
            Self::SingleChunk { payload_checksum } => payload_checksum,
            Self::UnsignedPayload => "UNSIGNED-PAYLOAD",
        }
    }
}

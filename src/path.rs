//! A path in the S3 storage
//!
//! + [Request styles](https://docs.aws.amazon.com/AmazonS3/latest/dev/RESTAPI.html#virtual-hosted-path-style-requests)
//! + [Bucket naming rules](https://docs.aws.amazon.com/AmazonS3/latest/dev/BucketRestrictions.html#bucketnamingrules)

use crate::limits;

/// A path in the S3 storage
#[derive(Debug)]
pub enum S3Path<'a> {
    /// Root path
    Root,
    /// Bucket path
    Bucket {
        /// Bucket name
        bucket: &'a str,
    },
    /// Object path
    Object {
        /// Bucket name
        bucket: &'a str,
        /// Object key
        key: &'a str,
    },
}

/// An error which can be returned when parsing a s3 path
#[allow(missing_copy_implementations)]
#[derive(Debug, thiserror::Error)]
#[error("ParseS3PathError: {:?}", .kind)]
pub struct ParseS3PathError {
    /// error kind
    kind: S3PathErrorKind,
}

impl ParseS3PathError {
    /// Returns the corresponding `S3PathErrorKind` for this error
    #[must_use]
    pub const fn kind(&self) -> &S3PathErrorKind {
        &self.kind
    }
}

/// A list of `ParseS3PathError` reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S3PathErrorKind {
    /// The request is not a valid path-style request
    InvalidPath,
    /// The bucket name is invalid
    InvalidBucketName,
    /// The object key is invalid
    InvalidKey,
}

impl<'a> S3Path<'a> {
    /// Checks a bucket name
    ///
    /// A name is valid iff it is 3 to 63 bytes of lowercase letters, digits,
    /// `-` and `.`, beginning and ending with a letter or digit.
    #[must_use]
    pub fn check_bucket_name(name: &str) -> bool {
        bool_try!(
            (limits::MIN_BUCKET_LENGTH..=limits::MAX_BUCKET_LENGTH).contains(&name.len())
        );

        bool_try!(name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-'));

        let is_boundary = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        bool_try!(name.as_bytes().first().copied().map(is_boundary) == Some(true));
        bool_try!(name.as_bytes().last().copied().map(is_boundary) == Some(true));

        true
    }

    /// Checks an object key
    ///
    /// A key is valid iff it is 1 to 1024 bytes, none of which is a control
    /// byte (`< 0x20` or `0x7F`).
    #[must_use]
    pub fn check_key(key: &str) -> bool {
        (1..=limits::MAX_KEY_LENGTH).contains(&key.len())
            && key.bytes().all(|b| b >= 0x20 && b != 0x7F)
    }

    /// Checks whether a key escapes its bucket directory
    ///
    /// Rejected before any filesystem access: absolute keys and keys with
    /// `.` or `..` segments.
    #[must_use]
    pub fn check_key_containment(key: &str) -> bool {
        bool_try!(!key.starts_with('/'));
        key.split('/').all(|segment| segment != ".." && segment != ".")
    }

    /// Parse a path-style request
    /// # Errors
    /// Returns an `Err` if the s3 path is invalid
    pub fn try_from_path(path: &'a str) -> Result<Self, ParseS3PathError> {
        let invalid = |kind| ParseS3PathError { kind };

        let remain = path
            .strip_prefix('/')
            .ok_or(invalid(S3PathErrorKind::InvalidPath))?;

        if remain.is_empty() {
            return Ok(S3Path::Root);
        }

        let (bucket, key) = match remain.split_once('/') {
            None => (remain, None),
            Some((bucket, "")) => (bucket, None),
            Some((bucket, key)) => (bucket, Some(key)),
        };

        if !Self::check_bucket_name(bucket) {
            return Err(invalid(S3PathErrorKind::InvalidBucketName));
        }

        let key = match key {
            None => return Ok(S3Path::Bucket { bucket }),
            Some(key) => key,
        };

        if !Self::check_key(key) {
            return Err(invalid(S3PathErrorKind::InvalidKey));
        }

        Ok(Self::Object { bucket, key })
    }

    /// is object
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(*self, Self::Object { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_name() {
        for name in ["mybucket", "my-bucket", "my.bucket", "abc", "0bucket9"] {
            assert!(S3Path::check_bucket_name(name), "{}", name);
        }
        for name in [
            "ab",
            "-bucket",
            "bucket-",
            ".bucket",
            "bucket.",
            "my_bucket",
            "",
            "MyBucket",
            ".uploads",
            &"a".repeat(64),
        ] {
            assert!(!S3Path::check_bucket_name(name), "{}", name);
        }
    }

    #[test]
    fn object_key() {
        assert!(S3Path::check_key("a"));
        assert!(S3Path::check_key("dir/sub/file.txt"));
        assert!(S3Path::check_key(&"k".repeat(1024)));

        assert!(!S3Path::check_key(""));
        assert!(!S3Path::check_key(&"k".repeat(1025)));
        assert!(!S3Path::check_key("a\x00b"));
        assert!(!S3Path::check_key("a\x1fb"));
        assert!(!S3Path::check_key("a\x7fb"));
    }

    #[test]
    fn key_containment() {
        assert!(S3Path::check_key_containment("a/b/c"));
        assert!(S3Path::check_key_containment("a..b"));
        assert!(S3Path::check_key_containment("folder/..hidden"));

        assert!(!S3Path::check_key_containment("../etc/passwd"));
        assert!(!S3Path::check_key_containment("folder/../../etc/passwd"));
        assert!(!S3Path::check_key_containment("/etc/passwd"));
        assert!(!S3Path::check_key_containment("a/./b"));
    }

    #[test]
    fn parse_s3_path() {
        assert!(matches!(S3Path::try_from_path("/"), Ok(S3Path::Root)));

        assert!(matches!(
            S3Path::try_from_path("/bucket"),
            Ok(S3Path::Bucket { bucket: "bucket" })
        ));

        assert!(matches!(
            S3Path::try_from_path("/bucket/"),
            Ok(S3Path::Bucket { bucket: "bucket" })
        ));

        assert!(matches!(
            S3Path::try_from_path("/bucket/dir/object"),
            Ok(S3Path::Object {
                bucket: "bucket",
                key: "dir/object"
            })
        ));

        assert_eq!(
            S3Path::try_from_path("asd").unwrap_err().kind(),
            &S3PathErrorKind::InvalidPath
        );

        assert_eq!(
            S3Path::try_from_path("/*").unwrap_err().kind(),
            &S3PathErrorKind::InvalidBucketName
        );

        let too_long_path = format!("/bucket/{}", "b".repeat(2048));
        assert_eq!(
            S3Path::try_from_path(&too_long_path).unwrap_err().kind(),
            &S3PathErrorKind::InvalidKey
        );
    }
}
